//! Error types for Spot Analysis.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Timestamp
//!   Reason: fulfillment row 3: cannot parse timestamp "yesterday"
//!   Fix: Use ISO-8601 timestamps (2024-01-01T00:00:00Z) or add the format to config.json.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 22,
//!   "category": "input",
//!   "message": "fulfillment row 3: cannot parse timestamp \"yesterday\"",
//!   "recoverable": true,
//!   "context": { "table": "fulfillment", "row": 3 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::event::EventTable;

/// Result type alias for Spot Analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Input table format errors (columns, values, timestamps).
    Input,
    /// Export encoding errors.
    Export,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Export => write!(f, "export"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Spot Analysis.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Input format errors (20-29)
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: EventTable, column: String },

    #[error("{table} row {row}: cannot parse timestamp {value:?}")]
    InvalidTimestamp {
        table: EventTable,
        row: usize,
        value: String,
    },

    #[error("malformed {table} table: {message}")]
    MalformedTable { table: EventTable, message: String },

    // Export errors (30-39)
    #[error("export failed: {0}")]
    Export(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input format errors
    /// - 30-39: Export errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::MissingColumn { .. } => 20,
            Error::InvalidTimestamp { .. } => 22,
            Error::MalformedTable { .. } => 23,
            Error::Export(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => ErrorCategory::Config,

            Error::MissingColumn { .. }
            | Error::InvalidTimestamp { .. }
            | Error::MalformedTable { .. } => ErrorCategory::Input,

            Error::Export(_) => ErrorCategory::Export,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Every input or config error is fixable by correcting the file and
    /// rerunning; the analysis itself never retries.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => true,
            Error::MissingColumn { .. }
            | Error::InvalidTimestamp { .. }
            | Error::MalformedTable { .. } => true,
            // Encoding an in-memory table should never fail.
            Error::Export(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'spot-analysis config validate' to locate the problem in config.json."
            }
            Error::InvalidConfig(_) => {
                "Fix the reported field in config.json, or remove the file to use built-in defaults."
            }
            Error::MissingColumn { .. } => {
                "Check the CSV header row, or map the column name under *_columns in config.json."
            }
            Error::InvalidTimestamp { .. } => {
                "Use ISO-8601 timestamps (2024-01-01T00:00:00Z) or add the format to timestamps.extra_formats."
            }
            Error::MalformedTable { .. } => {
                "Ensure the file is comma-separated UTF-8 with a single header row."
            }
            Error::Export(_) => "Internal export failure. Please report it with the input files.",
            Error::Io(_) => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => "Internal serialization failure. Please report it with the input files.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Configuration",
            Error::MissingColumn { .. } => "Missing Column",
            Error::InvalidTimestamp { .. } => "Invalid Timestamp",
            Error::MalformedTable { .. } => "Malformed Input Table",
            Error::Export(_) => "Export Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., table, row).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::MissingColumn { table, column } => {
                context.insert("table".to_string(), serde_json::json!(table));
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::InvalidTimestamp { table, row, .. } => {
                context.insert("table".to_string(), serde_json::json!(table));
                context.insert("row".to_string(), serde_json::json!(row));
            }
            Error::MalformedTable { table, .. } => {
                context.insert("table".to_string(), serde_json::json!(table));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
