//! Port traits at the I/O seams.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
pub mod publish_port;
