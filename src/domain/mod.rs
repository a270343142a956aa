//! Core domain types and logic.

pub mod angle;
pub mod config_validation;
pub mod cycle;
pub mod deviation;
pub mod error;
pub mod freshness;
pub mod instrument;
pub mod phase;
pub mod price_series;
pub mod trajectory;
pub mod vector;
