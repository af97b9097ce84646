//! FILENAME: pivot-model/src/lib.rs
//! Shared data contracts for the chart transformation subsystem.
//!
//! This crate defines the pre-aggregated pivot result shape that the
//! upstream aggregation step produces and the `chart-engine` crate
//! consumes. It performs no aggregation itself.
//!
//! Layers:
//! - `result`: The pre-aggregated rows and totals (WHAT was computed)
//! - `config`: The shape configuration snapshot (HOW it was requested)

pub mod config;
pub mod result;

pub use config::*;
pub use result::*;
