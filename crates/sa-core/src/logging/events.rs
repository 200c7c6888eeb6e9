//! Structured event definitions for logging.
//!
//! Events share one schema in JSONL output: timestamp, level, event name,
//! run and host correlation IDs, and the pipeline stage.

use serde::{Deserialize, Serialize};

/// Stages of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the event tables.
    Load,
    /// Joining the two streams on instance id.
    Correlate,
    /// Deriving uptime.
    Derive,
    /// Grouped summaries.
    Aggregate,
    /// Filter view.
    Filter,
    /// CSV export.
    Export,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Correlate => "correlate",
            Stage::Derive => "derive",
            Stage::Aggregate => "aggregate",
            Stage::Filter => "filter",
            Stage::Export => "export",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const RUN_SKIPPED: &str = "run.skipped";

    // Load stage
    pub const LOAD_TABLE: &str = "load.table";
    pub const LOAD_FINISHED: &str = "load.finished";

    // Correlate / derive stages
    pub const CORRELATE_FINISHED: &str = "correlate.finished";
    pub const CORRELATE_EMPTY: &str = "correlate.empty";
    pub const DERIVE_FINISHED: &str = "derive.finished";
    pub const DERIVE_NEGATIVE_UPTIME: &str = "derive.negative_uptime";

    // Aggregate stage
    pub const AGGREGATE_FINISHED: &str = "aggregate.finished";
    pub const AGGREGATE_DROPPED_INTERRUPTIONS: &str = "aggregate.dropped_interruptions";

    // Filter stage
    pub const FILTER_APPLIED: &str = "filter.applied";

    // Export stage
    pub const EXPORT_ENCODED: &str = "export.encoded";
    pub const EXPORT_CACHE_HIT: &str = "export.cache_hit";
    pub const EXPORT_WRITTEN: &str = "export.written";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
}

/// Correlation IDs shared by every event of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
    pub host_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            host_id: host_id.into(),
        }
    }
}
