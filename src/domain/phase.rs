//! Phase classification from the sign pair of a momentum vector.

use crate::domain::error::CycleError;
use crate::domain::instrument::Area;
use crate::domain::vector::MomentumVector;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Zero (either sign) counts as positive. NaN has no sign.
    pub fn of(value: f64) -> Option<Sign> {
        if value >= 0.0 {
            Some(Sign::Positive)
        } else if value < 0.0 {
            Some(Sign::Negative)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Recovery,
    Expansion,
    Slowdown,
    Recession,
}

impl Phase {
    pub fn from_signs(x: Sign, y: Sign) -> Phase {
        match (x, y) {
            (Sign::Negative, Sign::Positive) => Phase::Recovery,
            (Sign::Positive, Sign::Positive) => Phase::Expansion,
            (Sign::Positive, Sign::Negative) => Phase::Slowdown,
            (Sign::Negative, Sign::Negative) => Phase::Recession,
        }
    }

    /// The phase whose quadrant of the clock map is `area`.
    pub fn for_area(area: Area) -> Phase {
        match area {
            Area::NorthWest => Phase::Recovery,
            Area::NorthEast => Phase::Expansion,
            Area::SouthEast => Phase::Slowdown,
            Area::SouthWest => Phase::Recession,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Recovery => "Recovery",
            Phase::Expansion => "Expansion",
            Phase::Slowdown => "Slowdown",
            Phase::Recession => "Recession",
        }
    }

    /// Config key used in the `[phases]` section.
    pub fn key(self) -> &'static str {
        match self {
            Phase::Recovery => "recovery",
            Phase::Expansion => "expansion",
            Phase::Slowdown => "slowdown",
            Phase::Recession => "recession",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A vector with a NaN coordinate matches no quadrant; that is a defect
/// upstream and surfaces as `PhaseMismatch`.
pub fn classify(vector: &MomentumVector) -> Result<Phase, CycleError> {
    match (Sign::of(vector.x), Sign::of(vector.y)) {
        (Some(x), Some(y)) => Ok(Phase::from_signs(x, y)),
        _ => Err(CycleError::PhaseMismatch {
            x: vector.x,
            y: vector.y,
        }),
    }
}

/// Display labels for the four phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseLabels {
    recovery: String,
    expansion: String,
    slowdown: String,
    recession: String,
}

impl PhaseLabels {
    pub fn new(recovery: &str, expansion: &str, slowdown: &str, recession: &str) -> Self {
        Self {
            recovery: recovery.to_string(),
            expansion: expansion.to_string(),
            slowdown: slowdown.to_string(),
            recession: recession.to_string(),
        }
    }

    pub fn label(&self, phase: Phase) -> &str {
        match phase {
            Phase::Recovery => &self.recovery,
            Phase::Expansion => &self.expansion,
            Phase::Slowdown => &self.slowdown,
            Phase::Recession => &self.recession,
        }
    }
}

impl Default for PhaseLabels {
    fn default() -> Self {
        Self::new("Recovery", "Expansion", "Slowdown", "Recession")
    }
}
