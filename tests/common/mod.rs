#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use sectorclock::domain::error::CycleError;
use sectorclock::domain::instrument::{InstrumentRegistry, InstrumentSpec};
use sectorclock::domain::price_series::{ClosePoint, PriceSeries};
use sectorclock::domain::trajectory::TrajectoryParams;
use sectorclock::domain::vector::VectorParams;
use sectorclock::ports::data_port::PriceDataPort;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;

pub struct MockPriceDataPort {
    pub columns: BTreeMap<String, Vec<ClosePoint>>,
    pub error: Option<String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            columns: BTreeMap::new(),
            error: None,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_column(mut self, code: &str, points: Vec<ClosePoint>) -> Self {
        self.columns.insert(code.to_string(), points);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_closes(&self, codes: &[String]) -> Result<PriceSeries, CycleError> {
        self.requested.borrow_mut().extend(codes.iter().cloned());
        if let Some(reason) = &self.error {
            return Err(CycleError::Data {
                reason: reason.clone(),
            });
        }
        let columns = self
            .columns
            .iter()
            .filter(|(code, _)| codes.contains(code))
            .map(|(code, points)| (code.clone(), points.clone()))
            .collect();
        Ok(PriceSeries::new(columns)?.filled())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` consecutive calendar days of the same close.
pub fn flat(start: NaiveDate, count: usize, close: f64) -> Vec<ClosePoint> {
    (0..count)
        .map(|i| ClosePoint {
            date: start + Duration::days(i as i64),
            close,
        })
        .collect()
}

/// `count` consecutive calendar days compounding by `daily` per day.
pub fn trending(start: NaiveDate, count: usize, daily: f64) -> Vec<ClosePoint> {
    (0..count)
        .map(|i| ClosePoint {
            date: start + Duration::days(i as i64),
            close: 100.0 * (1.0 + daily).powi(i as i32),
        })
        .collect()
}

/// Closes on weekdays only, from `start` through `end`.
pub fn weekdays(start: NaiveDate, end: NaiveDate, close: f64) -> Vec<ClosePoint> {
    let mut points = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            points.push(ClosePoint { date: day, close });
        }
        day += Duration::days(1);
    }
    points
}

pub fn registry(entries: &[(&str, f64)]) -> InstrumentRegistry {
    InstrumentRegistry::new(
        entries
            .iter()
            .map(|(code, clock)| InstrumentSpec::new(code, code, *clock))
            .collect(),
    )
    .unwrap()
}

pub fn params(lookback_days: i64, interval_days: i64, ma_period: usize) -> TrajectoryParams {
    TrajectoryParams {
        lookback_days,
        interval_days,
        precision: 2,
        vector: VectorParams {
            ma_period,
            scale: 3.5,
        },
    }
}

pub fn series(columns: Vec<(&str, Vec<ClosePoint>)>) -> PriceSeries {
    PriceSeries::new(
        columns
            .into_iter()
            .map(|(code, points)| (code.to_string(), points))
            .collect(),
    )
    .unwrap()
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Wide CSV body with a `date` column and one column per code.
pub fn to_csv(columns: &[(&str, Vec<ClosePoint>)]) -> String {
    let mut rows: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for (i, (_, points)) in columns.iter().enumerate() {
        for p in points {
            let row = rows
                .entry(p.date)
                .or_insert_with(|| vec![String::new(); columns.len()]);
            row[i] = format!("{}", p.close);
        }
    }

    let header: Vec<&str> = columns.iter().map(|(code, _)| *code).collect();
    let mut out = format!("date,{}\n", header.join(","));
    for (day, cells) in rows {
        out.push_str(&format!("{},{}\n", day.format("%Y-%m-%d"), cells.join(",")));
    }
    out
}
