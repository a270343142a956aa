//! sectorclock: sector rotation clock.
//!
//! Turns daily closes of a fixed set of sector instruments into a momentum
//! vector on a 12-hour clock map, tracks its trailing-year trajectory and
//! names the current phase.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
