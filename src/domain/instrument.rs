//! Instrument registry.
//!
//! Each tracked instrument sits at a fixed position on a 12-hour dial. The
//! registry is built once at startup (from the built-in US sector table or
//! from the `[instruments]` config section) and passed explicitly to the
//! aggregator.

use std::collections::HashSet;
use std::fmt;

/// Quadrant of the clock map an instrument belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Area {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Area {
    /// (9, 12] NW, (0, 3] NE, (3, 6] SE, (6, 9] SW.
    pub fn from_clock(clock: f64) -> Self {
        if clock <= 3.0 {
            Area::NorthEast
        } else if clock <= 6.0 {
            Area::SouthEast
        } else if clock <= 9.0 {
            Area::SouthWest
        } else {
            Area::NorthWest
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Area::NorthWest => "NW",
            Area::NorthEast => "NE",
            Area::SouthEast => "SE",
            Area::SouthWest => "SW",
        }
    }

    pub const ALL: [Area; 4] = [
        Area::NorthWest,
        Area::NorthEast,
        Area::SouthEast,
        Area::SouthWest,
    ];
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.short_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSpec {
    pub code: String,
    pub name: String,
    pub clock: f64,
    pub area: Area,
}

impl InstrumentSpec {
    pub fn new(code: &str, name: &str, clock: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            clock,
            area: Area::from_clock(clock),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RegistryError {
    #[error("empty instrument registry")]
    Empty,

    #[error("duplicate instrument code: {0}")]
    DuplicateCode(String),

    #[error("clock position {clock} for {code} is outside (0, 12]")]
    ClockOutOfRange { code: String, clock: f64 },

    #[error("instrument {0} has no name")]
    MissingName(String),
}

/// Immutable, code-sorted list of instruments.
#[derive(Debug, Clone)]
pub struct InstrumentRegistry {
    instruments: Vec<InstrumentSpec>,
}

impl InstrumentRegistry {
    pub fn new(mut instruments: Vec<InstrumentSpec>) -> Result<Self, RegistryError> {
        if instruments.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for spec in &instruments {
            if !seen.insert(spec.code.clone()) {
                return Err(RegistryError::DuplicateCode(spec.code.clone()));
            }
            if !(spec.clock > 0.0 && spec.clock <= 12.0) {
                return Err(RegistryError::ClockOutOfRange {
                    code: spec.code.clone(),
                    clock: spec.clock,
                });
            }
            if spec.name.trim().is_empty() {
                return Err(RegistryError::MissingName(spec.code.clone()));
            }
        }

        // Fixed order keeps floating-point summation reproducible.
        instruments.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(Self { instruments })
    }

    /// The eleven S&P 500 sector SPDR ETFs.
    pub fn us_sectors() -> Self {
        Self::new(vec![
            InstrumentSpec::new("XLK", "Technology", 10.5),
            InstrumentSpec::new("XLY", "Consumer Discretionary", 11.5),
            InstrumentSpec::new("XLC", "Communication Services", 9.5),
            InstrumentSpec::new("XLI", "Industrials", 1.5),
            InstrumentSpec::new("XLB", "Materials", 0.5),
            InstrumentSpec::new("XLF", "Financials", 2.5),
            InstrumentSpec::new("XLE", "Energy", 4.5),
            InstrumentSpec::new("XLRE", "Real Estate", 5.5),
            InstrumentSpec::new("XLV", "Health Care", 7.5),
            InstrumentSpec::new("XLP", "Consumer Staples", 6.5),
            InstrumentSpec::new("XLU", "Utilities", 8.5),
        ])
        .unwrap_or_else(|_| unreachable!("built-in registry is valid"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstrumentSpec> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn codes(&self) -> Vec<String> {
        self.instruments.iter().map(|s| s.code.clone()).collect()
    }

    /// Instruments of one area, ordered clockwise.
    pub fn in_area(&self, area: Area) -> Vec<&InstrumentSpec> {
        let mut specs: Vec<&InstrumentSpec> =
            self.instruments.iter().filter(|s| s.area == area).collect();
        specs.sort_by(|a, b| a.clock.total_cmp(&b.clock));
        specs
    }
}

/// Parse an `[instruments]` entry value of the form `"<clock>, <name>"`.
pub fn parse_instrument_entry(code: &str, value: &str) -> Result<InstrumentSpec, String> {
    let (clock_str, name) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"<clock>, <name>\" for {}", code))?;
    let clock: f64 = clock_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid clock position for {}: {}", code, e))?;
    Ok(InstrumentSpec::new(
        &code.trim().to_uppercase(),
        name.trim(),
        clock,
    ))
}
