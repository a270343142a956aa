//! Freshness gate.
//!
//! Runs are scheduled after the US close, so the latest row should be dated
//! today or yesterday (UTC). Anything older means the market was closed and
//! there is nothing new to publish.

use crate::domain::error::CycleError;
use chrono::NaiveDate;

pub const DEFAULT_MAX_LAG_DAYS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh { lag_days: i64 },
    Stale { lag_days: i64 },
}

pub fn check_freshness(latest: NaiveDate, today: NaiveDate, max_lag_days: i64) -> Freshness {
    let lag_days = (today - latest).num_days();
    if lag_days > max_lag_days {
        Freshness::Stale { lag_days }
    } else {
        Freshness::Fresh { lag_days }
    }
}

/// Like [`check_freshness`] but maps a stale result to `CycleError::StaleData`.
pub fn ensure_fresh(
    latest: NaiveDate,
    today: NaiveDate,
    max_lag_days: i64,
) -> Result<i64, CycleError> {
    match check_freshness(latest, today, max_lag_days) {
        Freshness::Fresh { lag_days } => Ok(lag_days),
        Freshness::Stale { lag_days } => Err(CycleError::StaleData {
            latest,
            today,
            lag_days,
        }),
    }
}
