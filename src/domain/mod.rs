//! Core domain types and logic.

pub mod analysis;
pub mod calendar;
pub mod classify;
pub mod config_validation;
pub mod error;
pub mod instrument;
pub mod partition;
pub mod period;
pub mod price_series;
pub mod ranking;
pub mod returns;
pub mod rounding;
pub mod summary;
