//! Spot Analysis core library.
//!
//! Joins spot fulfillment and interruption logs on instance id, derives
//! per-instance uptime, and computes the grouped reliability summaries:
//! - CSV loading with configurable column names and timestamp layouts
//! - Correlation, uptime derivation and the five aggregations
//! - Filter view, report rendering and memoized CSV export
//! - Logging, configuration loading and CLI exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod aggregate;
pub mod config;
pub mod correlate;
pub mod exit_codes;
pub mod export;
pub mod filter;
pub mod load;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod uptime;

pub use correlate::{correlate, EventPair};
pub use filter::{filter, observed_types, observed_zones, Filter};
pub use pipeline::{analyze, AnalysisReport, AnalysisSession, ReportOptions};
pub use uptime::with_uptime;
