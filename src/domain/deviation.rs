//! Deviation from the trailing moving average.
//!
//! deviation = (latest - SMA(n)) / SMA(n) * 100
//! latest is the last close on or before the as-of date; the SMA covers the
//! n observations ending at that close, inclusive.

use crate::domain::price_series::{observations_until, ClosePoint};
use chrono::NaiveDate;

pub const DEFAULT_MA_PERIOD: usize = 200;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviationError {
    #[error("insufficient history: have {observations} observations, need {required}")]
    InsufficientHistory { observations: usize, required: usize },

    #[error("moving average is zero")]
    ZeroMean,
}

pub fn deviation_at(
    points: &[ClosePoint],
    as_of: NaiveDate,
    period: usize,
) -> Result<f64, DeviationError> {
    let observations = observations_until(points, as_of);
    if period == 0 || observations < period {
        return Err(DeviationError::InsufficientHistory {
            observations,
            required: period,
        });
    }

    let window = &points[observations - period..observations];
    let mean = window.iter().map(|p| p.close).sum::<f64>() / period as f64;
    if mean == 0.0 {
        return Err(DeviationError::ZeroMean);
    }

    let latest = window[period - 1].close;
    Ok((latest - mean) / mean * 100.0)
}
