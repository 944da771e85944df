//! Port traits for external collaborators.

pub mod config_port;
pub mod price_port;
pub mod report_port;
pub mod universe_port;
