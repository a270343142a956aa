//! Momentum vector aggregation.
//!
//! Each instrument contributes its deviation projected onto its clock angle:
//! x_i = d_i * cos(theta_i), y_i = d_i * sin(theta_i). The sums are divided
//! by a fixed scale to keep the point inside the display range.

use crate::domain::angle::clock_to_radians;
use crate::domain::deviation::{deviation_at, DEFAULT_MA_PERIOD};
use crate::domain::instrument::InstrumentRegistry;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_SCALE: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumVector {
    pub x: f64,
    pub y: f64,
}

impl MomentumVector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates, ties to even, normalising -0.0.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            x: round_to(self.x, decimals),
            y: round_to(self.y, decimals),
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round_ties_even() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorParams {
    pub ma_period: usize,
    pub scale: f64,
}

impl Default for VectorParams {
    fn default() -> Self {
        Self {
            ma_period: DEFAULT_MA_PERIOD,
            scale: DEFAULT_SCALE,
        }
    }
}

/// Aggregate every instrument with a defined deviation at `as_of`.
///
/// Returns `None` when no instrument contributed. Instruments without a
/// column or without enough history are left out, not counted as zero.
pub fn aggregate(
    series: &PriceSeries,
    as_of: NaiveDate,
    registry: &InstrumentRegistry,
    params: &VectorParams,
) -> Option<MomentumVector> {
    let mut total_x = 0.0;
    let mut total_y = 0.0;
    let mut contributors = 0usize;

    for spec in registry.iter() {
        let Some(points) = series.column(&spec.code) else {
            debug!(code = %spec.code, "no price column, skipping");
            continue;
        };

        let deviation = match deviation_at(points, as_of, params.ma_period) {
            Ok(d) => d,
            Err(e) => {
                debug!(code = %spec.code, %as_of, "skipping: {e}");
                continue;
            }
        };

        let theta = clock_to_radians(spec.clock);
        total_x += deviation * theta.cos();
        total_y += deviation * theta.sin();
        contributors += 1;
    }

    if contributors == 0 {
        return None;
    }

    Some(MomentumVector::new(
        total_x / params.scale,
        total_y / params.scale,
    ))
}
