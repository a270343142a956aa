//! Per-instrument closing price history and the unified date index.

use crate::domain::error::CycleError;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing prices keyed by instrument code. Every column is ordered by
/// strictly increasing date.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    columns: BTreeMap<String, Vec<ClosePoint>>,
    dates: Vec<NaiveDate>,
}

impl PriceSeries {
    pub fn new(columns: BTreeMap<String, Vec<ClosePoint>>) -> Result<Self, CycleError> {
        for (code, points) in &columns {
            if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
                return Err(CycleError::Data {
                    reason: format!(
                        "{}: dates not strictly increasing at {} -> {}",
                        code, pair[0].date, pair[1].date
                    ),
                });
            }
        }

        let dates: BTreeSet<NaiveDate> = columns
            .values()
            .flat_map(|points| points.iter().map(|p| p.date))
            .collect();

        Ok(Self {
            columns,
            dates: dates.into_iter().collect(),
        })
    }

    pub fn column(&self, code: &str) -> Option<&[ClosePoint]> {
        self.columns.get(code).map(|v| v.as_slice())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Unified, sorted date index across all columns.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Largest indexed date `<= target`, or `None` if every date is later.
    pub fn resolve_on_or_before(&self, target: NaiveDate) -> Option<NaiveDate> {
        let idx = self.dates.partition_point(|d| *d <= target);
        if idx == 0 {
            None
        } else {
            Some(self.dates[idx - 1])
        }
    }

    /// Align every column to the unified date index: forward-fill gaps, then
    /// back-fill the leading gap with the first known close.
    pub fn filled(&self) -> PriceSeries {
        let mut columns = BTreeMap::new();

        for (code, points) in &self.columns {
            let Some(first) = points.first() else {
                continue;
            };

            let mut filled = Vec::with_capacity(self.dates.len());
            let mut cursor = 0;
            let mut last_close = first.close;

            for &date in &self.dates {
                if cursor < points.len() && points[cursor].date == date {
                    last_close = points[cursor].close;
                    cursor += 1;
                }
                filled.push(ClosePoint {
                    date,
                    close: last_close,
                });
            }
            columns.insert(code.clone(), filled);
        }

        PriceSeries {
            columns,
            dates: self.dates.clone(),
        }
    }
}

/// Number of observations in `points` dated on or before `as_of`.
pub fn observations_until(points: &[ClosePoint], as_of: NaiveDate) -> usize {
    points.partition_point(|p| p.date <= as_of)
}
