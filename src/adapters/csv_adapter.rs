//! Wide CSV price table adapter.
//!
//! Expected layout: a `date` column (`%Y-%m-%d`) followed by one column of
//! closing prices per instrument code. Empty cells are missing values and
//! get filled from neighbouring rows.

use crate::domain::error::CycleError;
use crate::domain::price_series::{ClosePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_closes(&self, codes: &[String]) -> Result<PriceSeries, CycleError> {
        let content = fs::read_to_string(&self.path).map_err(|e| CycleError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let series = parse_closes(&content, codes)?;
        info!(
            path = %self.path.display(),
            instruments = series.codes().count(),
            rows = series.dates().len(),
            "loaded price table"
        );
        Ok(series)
    }
}

/// Parse a wide close table, keeping only `codes`, and fill gaps.
pub fn parse_closes(content: &str, codes: &[String]) -> Result<PriceSeries, CycleError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| CycleError::Data {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();

    if !headers
        .get(0)
        .is_some_and(|h| h.eq_ignore_ascii_case("date"))
    {
        return Err(CycleError::Data {
            reason: "first column must be \"date\"".into(),
        });
    }

    let wanted: HashSet<String> = codes.iter().map(|c| c.to_uppercase()).collect();
    let selected: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, h)| (i, h.to_uppercase()))
        .filter(|(_, h)| wanted.contains(h))
        .collect();

    for code in codes {
        if !selected.iter().any(|(_, h)| h.eq_ignore_ascii_case(code)) {
            warn!(%code, "no column in price table, skipping");
        }
    }
    if selected.is_empty() {
        return Err(CycleError::NoData {
            codes: codes.join(","),
        });
    }

    let mut rows: Vec<(NaiveDate, csv::StringRecord)> = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| CycleError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;
        let date_str = record.get(0).ok_or_else(|| CycleError::Data {
            reason: format!("row {}: missing date column", line + 2),
        })?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            CycleError::Data {
                reason: format!("row {}: invalid date {:?}: {}", line + 2, date_str, e),
            }
        })?;
        rows.push((date, record));
    }

    rows.sort_by_key(|(date, _)| *date);
    if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(CycleError::Data {
            reason: format!("duplicate date {}", pair[0].0),
        });
    }

    let mut columns: BTreeMap<String, Vec<ClosePoint>> = BTreeMap::new();
    for (idx, code) in &selected {
        let mut points = Vec::new();
        for (date, record) in &rows {
            let cell = record.get(*idx).unwrap_or("");
            if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
                continue;
            }
            let close: f64 = cell.parse().map_err(|e| CycleError::Data {
                reason: format!("{} on {}: invalid close {:?}: {}", code, date, cell, e),
            })?;
            points.push(ClosePoint { date: *date, close });
        }
        if points.is_empty() {
            warn!(%code, "column has no values, skipping");
            continue;
        }
        columns.insert(code.clone(), points);
    }

    if columns.is_empty() {
        return Err(CycleError::NoData {
            codes: codes.join(","),
        });
    }

    Ok(PriceSeries::new(columns)?.filled())
}
