//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for sectorclock.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error("no price data for any of: {codes}")]
    NoData { codes: String },

    #[error("stale data: latest observation {latest} is {lag_days} days behind {today}")]
    StaleData {
        latest: NaiveDate,
        today: NaiveDate,
        lag_days: i64,
    },

    #[error("no instrument had enough history to compute a vector at {date}")]
    NoAggregateResult { date: NaiveDate },

    #[error("no phase matches vector ({x}, {y})")]
    PhaseMismatch { x: f64, y: f64 },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CycleError {
    /// Stale data is an expected non-trading-day condition, not a failure.
    pub fn is_no_update(&self) -> bool {
        matches!(self, CycleError::StaleData { .. })
    }
}

impl From<&CycleError> for std::process::ExitCode {
    fn from(err: &CycleError) -> Self {
        let code: u8 = match err {
            CycleError::StaleData { .. } => 0,
            CycleError::Io(_) | CycleError::Render { .. } => 1,
            CycleError::ConfigParse { .. }
            | CycleError::ConfigMissing { .. }
            | CycleError::ConfigInvalid { .. } => 2,
            CycleError::Data { .. } | CycleError::NoData { .. } => 3,
            CycleError::NoAggregateResult { .. } => 5,
            CycleError::PhaseMismatch { .. } => 70,
        };
        std::process::ExitCode::from(code)
    }
}
