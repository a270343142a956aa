//! Configuration validation.
//!
//! Validates all config fields before a run.

use crate::domain::error::CycleError;
use crate::domain::instrument::{parse_instrument_entry, InstrumentRegistry, RegistryError};
use crate::domain::trajectory::MAX_WINDOW_DAYS;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::fmt::Write;

pub fn validate_cycle_config(config: &dyn ConfigPort) -> Result<(), CycleError> {
    validate_prices_path(config)?;
    validate_ma_period(config)?;
    validate_scale(config)?;
    validate_lookback(config)?;
    validate_interval(config)?;
    validate_precision(config)?;
    validate_max_lag(config)?;
    validate_instruments(config)?;
    Ok(())
}

pub fn validate_output_config(config: &dyn ConfigPort) -> Result<(), CycleError> {
    for key in ["chart_path", "page_path"] {
        match config.get_string("output", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(CycleError::ConfigMissing {
                    section: "output".to_string(),
                    key: key.to_string(),
                })
            }
        }
    }
    validate_date_format(config)?;
    validate_axis_limit(config)?;
    Ok(())
}

/// The format is applied to a calendar date, so time specifiers fail here
/// as well as malformed ones.
fn validate_date_format(config: &dyn ConfigPort) -> Result<(), CycleError> {
    if let Some(fmt) = config.get_string("output", "date_format") {
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDate::default().format(&fmt)).is_err() {
            return Err(invalid(
                "output",
                "date_format",
                "not a valid strftime format for a date",
            ));
        }
    }
    Ok(())
}

fn validate_axis_limit(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let value = config.get_double("output", "axis_limit", 25.0);
    if !(value > 0.0) || !value.is_finite() {
        return Err(invalid(
            "output",
            "axis_limit",
            "axis_limit must be a positive number",
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CycleError {
    CycleError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_prices_path(config: &dyn ConfigPort) -> Result<(), CycleError> {
    match config.get_string("data", "prices_path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(CycleError::ConfigMissing {
            section: "data".to_string(),
            key: "prices_path".to_string(),
        }),
    }
}

fn validate_ma_period(config: &dyn ConfigPort) -> Result<(), CycleError> {
    if config.get_int("cycle", "ma_period", 200) < 1 {
        return Err(invalid("cycle", "ma_period", "ma_period must be at least 1"));
    }
    Ok(())
}

fn validate_scale(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let value = config.get_double("cycle", "scale", 3.5);
    if !(value > 0.0) || !value.is_finite() {
        return Err(invalid("cycle", "scale", "scale must be a positive number"));
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), CycleError> {
    if !(0..=MAX_WINDOW_DAYS).contains(&config.get_int("cycle", "lookback_days", 365)) {
        return Err(invalid(
            "cycle",
            "lookback_days",
            &format!("lookback_days must be between 0 and {}", MAX_WINDOW_DAYS),
        ));
    }
    Ok(())
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), CycleError> {
    if !(1..=MAX_WINDOW_DAYS).contains(&config.get_int("cycle", "interval_days", 10)) {
        return Err(invalid(
            "cycle",
            "interval_days",
            &format!("interval_days must be between 1 and {}", MAX_WINDOW_DAYS),
        ));
    }
    Ok(())
}

fn validate_precision(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let value = config.get_int("cycle", "precision", 2);
    if !(0..=10).contains(&value) {
        return Err(invalid("cycle", "precision", "precision must be between 0 and 10"));
    }
    Ok(())
}

fn validate_max_lag(config: &dyn ConfigPort) -> Result<(), CycleError> {
    if config.get_int("cycle", "max_lag_days", 1) < 0 {
        return Err(invalid(
            "cycle",
            "max_lag_days",
            "max_lag_days must be non-negative",
        ));
    }
    Ok(())
}

fn validate_instruments(config: &dyn ConfigPort) -> Result<(), CycleError> {
    build_registry(config).map(|_| ())
}

/// Registry from the `[instruments]` section, or the US sector table when
/// the section is absent or empty.
pub fn build_registry(config: &dyn ConfigPort) -> Result<InstrumentRegistry, CycleError> {
    let keys = config.keys("instruments");
    if keys.is_empty() {
        return Ok(InstrumentRegistry::us_sectors());
    }

    let mut specs = Vec::with_capacity(keys.len());
    for key in keys {
        let value = config.get_string("instruments", &key).unwrap_or_default();
        let spec = parse_instrument_entry(&key, &value)
            .map_err(|reason| invalid("instruments", &key, &reason))?;
        specs.push(spec);
    }

    InstrumentRegistry::new(specs).map_err(|e| {
        let key = match &e {
            RegistryError::DuplicateCode(code)
            | RegistryError::ClockOutOfRange { code, .. }
            | RegistryError::MissingName(code) => code.to_lowercase(),
            RegistryError::Empty => "instruments".to_string(),
        };
        invalid("instruments", &key, &e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const VALID: &str = r#"
[data]
prices_path = data/closes.csv

[cycle]
ma_period = 200
scale = 3.5
lookback_days = 365
interval_days = 10
precision = 2
max_lag_days = 1

[output]
chart_path = public/index.html
page_path = public/page.html
"#;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn with_cycle_value(key: &str, value: &str) -> FileConfigAdapter {
        config(&format!(
            "[data]\nprices_path = closes.csv\n\n[cycle]\n{} = {}\n",
            key, value
        ))
    }

    #[test]
    fn valid_config_passes() {
        let cfg = config(VALID);
        assert!(validate_cycle_config(&cfg).is_ok());
        assert!(validate_output_config(&cfg).is_ok());
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = config("[data]\nprices_path = closes.csv\n");
        assert!(validate_cycle_config(&cfg).is_ok());
    }

    #[test]
    fn missing_prices_path() {
        let cfg = config("[cycle]\nscale = 3.5\n");
        let err = validate_cycle_config(&cfg).unwrap_err();
        assert!(matches!(err, CycleError::ConfigMissing { key, .. } if key == "prices_path"));
    }

    #[test]
    fn zero_ma_period_rejected() {
        let err = validate_cycle_config(&with_cycle_value("ma_period", "0")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "ma_period"));
    }

    #[test]
    fn non_positive_scale_rejected() {
        let err = validate_cycle_config(&with_cycle_value("scale", "0")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "scale"));
        let err = validate_cycle_config(&with_cycle_value("scale", "-1.5")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "scale"));
    }

    #[test]
    fn zero_interval_rejected() {
        let err = validate_cycle_config(&with_cycle_value("interval_days", "0")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "interval_days"));
    }

    #[test]
    fn oversized_windows_rejected() {
        let err =
            validate_cycle_config(&with_cycle_value("lookback_days", "1000000000")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "lookback_days"));
        let err =
            validate_cycle_config(&with_cycle_value("interval_days", "1000000000")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "interval_days"));
        assert!(validate_cycle_config(&with_cycle_value("lookback_days", "36500")).is_ok());
    }

    #[test]
    fn negative_lookback_rejected() {
        let err = validate_cycle_config(&with_cycle_value("lookback_days", "-5")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "lookback_days"));
    }

    #[test]
    fn precision_out_of_range_rejected() {
        let err = validate_cycle_config(&with_cycle_value("precision", "11")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "precision"));
    }

    #[test]
    fn negative_max_lag_rejected() {
        let err = validate_cycle_config(&with_cycle_value("max_lag_days", "-1")).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "max_lag_days"));
    }

    #[test]
    fn missing_output_paths() {
        let cfg = config("[output]\nchart_path = a.html\n");
        let err = validate_output_config(&cfg).unwrap_err();
        assert!(matches!(err, CycleError::ConfigMissing { key, .. } if key == "page_path"));
    }

    #[test]
    fn bad_date_format_rejected() {
        let cfg = config("[output]\nchart_path = a.html\npage_path = b.html\ndate_format = %Y-%\n");
        let err = validate_output_config(&cfg).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "date_format"));
    }

    #[test]
    fn time_specifier_in_date_format_rejected() {
        let cfg = config(
            "[output]\nchart_path = a.html\npage_path = b.html\ndate_format = %Y-%m-%d %H:%M\n",
        );
        let err = validate_output_config(&cfg).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "date_format"));
    }

    #[test]
    fn localized_date_format_accepted() {
        let cfg = config("[output]\nchart_path = a.html\npage_path = b.html\ndate_format = %Y年%m月%d日\n");
        assert!(validate_output_config(&cfg).is_ok());
    }

    #[test]
    fn non_positive_axis_limit_rejected() {
        for value in ["0", "-25", "nan"] {
            let cfg = config(&format!(
                "[output]\nchart_path = a.html\npage_path = b.html\naxis_limit = {}\n",
                value
            ));
            let err = validate_output_config(&cfg).unwrap_err();
            assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "axis_limit"));
        }
    }

    #[test]
    fn registry_defaults_to_us_sectors() {
        let reg = build_registry(&config(VALID)).unwrap();
        assert_eq!(reg.len(), 11);
    }

    #[test]
    fn registry_from_config() {
        let cfg = config("[instruments]\nqqq = 10.5, Nasdaq\niwm = 1.5, Small caps\n");
        let reg = build_registry(&cfg).unwrap();
        assert_eq!(reg.codes(), vec!["IWM", "QQQ"]);
        assert_eq!(reg.iter().last().unwrap().name, "Nasdaq");
    }

    #[test]
    fn registry_rejects_bad_clock() {
        let cfg = config("[instruments]\nqqq = 13, Nasdaq\n");
        let err = build_registry(&cfg).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "qqq"));
    }

    #[test]
    fn registry_rejects_malformed_entry() {
        let cfg = config("[instruments]\nqqq = Nasdaq\n");
        let err = build_registry(&cfg).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "qqq"));
    }
}
