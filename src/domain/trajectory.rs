//! Trajectory sampling over a lookback window.

use crate::domain::error::CycleError;
use crate::domain::instrument::InstrumentRegistry;
use crate::domain::price_series::PriceSeries;
use crate::domain::vector::{aggregate, MomentumVector, VectorParams};
use chrono::{Duration, NaiveDate};
use tracing::debug;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
pub const DEFAULT_INTERVAL_DAYS: i64 = 10;
pub const DEFAULT_PRECISION: u32 = 2;
/// Upper bound for both the lookback window and the sampling interval.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryParams {
    pub lookback_days: i64,
    pub interval_days: i64,
    pub precision: u32,
    pub vector: VectorParams,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            interval_days: DEFAULT_INTERVAL_DAYS,
            precision: DEFAULT_PRECISION,
            vector: VectorParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub date: NaiveDate,
    pub vector: MomentumVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Rounded samples in date order, closed by the current point.
    pub points: Vec<TrajectoryPoint>,
    /// Rounded vector at the latest date.
    pub current: TrajectoryPoint,
    /// Unrounded vector at the latest date.
    pub current_raw: MomentumVector,
}

impl Trajectory {
    pub fn vectors(&self) -> Vec<MomentumVector> {
        self.points.iter().map(|p| p.vector).collect()
    }
}

/// Calendar targets `start, start + step, ...` up to and including `end`.
/// Stops early if the next target would leave chrono's date range.
pub fn sample_dates(start: NaiveDate, end: NaiveDate, interval_days: i64) -> Vec<NaiveDate> {
    let step = Duration::try_days(interval_days.max(1));
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = step.and_then(|s| date.checked_add_signed(s));
    }
    dates
}

/// Sample the momentum vector every `interval_days` across the window ending
/// at `latest`, then close the path with the vector at `latest` itself.
///
/// Targets that fall before the first indexed date, or whose aggregate is
/// empty, are dropped. An empty aggregate at `latest` is fatal.
pub fn sample_trajectory(
    series: &PriceSeries,
    latest: NaiveDate,
    registry: &InstrumentRegistry,
    params: &TrajectoryParams,
) -> Result<Trajectory, CycleError> {
    let start = Duration::try_days(params.lookback_days)
        .and_then(|window| latest.checked_sub_signed(window))
        .ok_or_else(|| CycleError::ConfigInvalid {
            section: "cycle".to_string(),
            key: "lookback_days".to_string(),
            reason: format!(
                "{} days before {} is outside the supported date range",
                params.lookback_days, latest
            ),
        })?;
    let mut points = Vec::new();

    for target in sample_dates(start, latest, params.interval_days) {
        let Some(resolved) = series.resolve_on_or_before(target) else {
            debug!(%target, "no data on or before target, skipping");
            continue;
        };

        match aggregate(series, resolved, registry, &params.vector) {
            Some(vector) => points.push(TrajectoryPoint {
                date: resolved,
                vector: vector.rounded(params.precision),
            }),
            None => debug!(%target, %resolved, "no instrument contributed, skipping"),
        }
    }

    let current_raw = aggregate(series, latest, registry, &params.vector)
        .ok_or(CycleError::NoAggregateResult { date: latest })?;
    let current = TrajectoryPoint {
        date: latest,
        vector: current_raw.rounded(params.precision),
    };
    points.push(current);

    Ok(Trajectory {
        points,
        current,
        current_raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::InstrumentSpec;
    use crate::domain::price_series::ClosePoint;
    use std::collections::BTreeMap;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Daily closes rising by 1% a day starting at `from`.
    fn rising(from: NaiveDate, days: usize) -> Vec<ClosePoint> {
        (0..days)
            .map(|i| ClosePoint {
                date: from + Duration::days(i as i64),
                close: 100.0 * 1.01f64.powi(i as i32),
            })
            .collect()
    }

    fn registry() -> InstrumentRegistry {
        InstrumentRegistry::new(vec![InstrumentSpec::new("AAA", "Alpha", 1.5)]).unwrap()
    }

    fn params(lookback: i64, interval: i64, period: usize) -> TrajectoryParams {
        TrajectoryParams {
            lookback_days: lookback,
            interval_days: interval,
            precision: 2,
            vector: VectorParams {
                ma_period: period,
                scale: 3.5,
            },
        }
    }

    #[test]
    fn sample_dates_includes_both_ends_when_aligned() {
        let dates = sample_dates(d("2024-01-01"), d("2024-01-21"), 10);
        assert_eq!(dates, vec![d("2024-01-01"), d("2024-01-11"), d("2024-01-21")]);
    }

    #[test]
    fn sample_dates_stops_before_end_when_unaligned() {
        let dates = sample_dates(d("2023-06-01"), d("2024-05-31"), 10);
        assert_eq!(dates.len(), 37);
        assert_eq!(*dates.last().unwrap(), d("2024-05-26"));
    }

    #[test]
    fn sample_dates_stops_at_end_of_date_range() {
        let dates = sample_dates(d("2024-01-01"), NaiveDate::MAX, 1_000_000_000);
        assert_eq!(dates, vec![d("2024-01-01")]);
    }

    #[test]
    fn huge_interval_yields_first_target_and_current() {
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), rising(d("2024-01-01"), 60));
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();

        let t = sample_trajectory(&series, latest, &registry(), &params(30, 1_000_000_000, 5))
            .unwrap();

        assert_eq!(t.points.len(), 2);
        assert_eq!(t.points[0].date, latest - Duration::days(30));
        assert_eq!(t.points[1].date, latest);
    }

    #[test]
    fn lookback_beyond_date_range_is_config_error() {
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), rising(d("2024-01-01"), 60));
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();

        let err = sample_trajectory(&series, latest, &registry(), &params(1_000_000_000, 10, 5))
            .unwrap_err();

        assert!(matches!(
            err,
            CycleError::ConfigInvalid { ref key, .. } if key == "lookback_days"
        ));
    }

    #[test]
    fn closes_with_current_point() {
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), rising(d("2024-01-01"), 60));
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();

        let t = sample_trajectory(&series, latest, &registry(), &params(30, 10, 5)).unwrap();

        assert_eq!(t.points.len(), 5);
        assert_eq!(*t.points.last().unwrap(), t.current);
        assert_eq!(t.current.date, latest);
        assert_eq!(t.current.vector, t.current_raw.rounded(2));
        assert!(t.points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn samples_without_history_are_skipped() {
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), rising(d("2024-01-01"), 25));
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();

        // targets 2023-12-24, 2024-01-03, 01-13, 01-23: the first has no
        // row, the rest have fewer than 24 observations
        let t = sample_trajectory(&series, latest, &registry(), &params(32, 10, 24)).unwrap();

        assert_eq!(t.points.len(), 1);
        assert_eq!(t.points[0].date, latest);
    }

    #[test]
    fn weekend_target_resolves_to_prior_friday() {
        // Weekdays only, Mon 2024-01-01 .. Fri 2024-01-12
        let mut closes = Vec::new();
        let mut date = d("2024-01-01");
        let mut price = 100.0;
        while date <= d("2024-01-12") {
            if !matches!(
                chrono::Datelike::weekday(&date),
                chrono::Weekday::Sat | chrono::Weekday::Sun
            ) {
                closes.push(ClosePoint { date, close: price });
                price += 1.0;
            }
            date += Duration::days(1);
        }
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), closes);
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();

        // lookback 6 -> targets Sat 2024-01-06 only, then current
        let t = sample_trajectory(&series, latest, &registry(), &params(6, 10, 2)).unwrap();

        assert_eq!(t.points.len(), 2);
        assert_eq!(t.points[0].date, d("2024-01-05"));
    }

    #[test]
    fn no_result_at_latest_is_fatal() {
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), rising(d("2024-01-01"), 10));
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();

        let err = sample_trajectory(&series, latest, &registry(), &params(30, 10, 200)).unwrap_err();
        assert!(matches!(err, CycleError::NoAggregateResult { date } if date == latest));
    }

    #[test]
    fn rerun_is_identical() {
        let mut cols = BTreeMap::new();
        cols.insert("AAA".to_string(), rising(d("2024-01-01"), 90));
        let series = PriceSeries::new(cols).unwrap();
        let latest = series.latest_date().unwrap();
        let p = params(60, 7, 10);

        let a = sample_trajectory(&series, latest, &registry(), &p).unwrap();
        let b = sample_trajectory(&series, latest, &registry(), &p).unwrap();
        assert_eq!(a, b);
    }
}
