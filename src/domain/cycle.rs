//! Sector cycle report: trajectory up to the latest date plus its phase.

use crate::domain::error::CycleError;
use crate::domain::instrument::InstrumentRegistry;
use crate::domain::phase::{classify, Phase};
use crate::domain::price_series::PriceSeries;
use crate::domain::trajectory::{sample_trajectory, Trajectory, TrajectoryParams};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub as_of: NaiveDate,
    pub trajectory: Trajectory,
    pub phase: Phase,
}

/// Build the report at the series' latest date. The phase is taken from the
/// unrounded current vector.
pub fn compute_cycle(
    series: &PriceSeries,
    registry: &InstrumentRegistry,
    params: &TrajectoryParams,
) -> Result<CycleReport, CycleError> {
    let as_of = series.latest_date().ok_or_else(|| CycleError::NoData {
        codes: registry.codes().join(","),
    })?;

    let trajectory = sample_trajectory(series, as_of, registry, params)?;
    let phase = classify(&trajectory.current_raw)?;

    Ok(CycleReport {
        as_of,
        trajectory,
        phase,
    })
}
