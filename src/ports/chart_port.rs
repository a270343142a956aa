//! Chart rendering port trait.

use crate::domain::cycle::CycleReport;
use crate::domain::error::CycleError;
use crate::domain::instrument::InstrumentRegistry;
use crate::domain::phase::PhaseLabels;

/// Everything a renderer needs besides the report itself.
pub struct ChartContext<'a> {
    pub title: &'a str,
    pub registry: &'a InstrumentRegistry,
    pub labels: &'a PhaseLabels,
    /// Half-width of the square plot area, in vector units.
    pub axis_limit: f64,
}

pub trait ChartPort {
    fn render(&self, report: &CycleReport, ctx: &ChartContext) -> Result<(), CycleError>;
}
