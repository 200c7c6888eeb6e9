//! Typed representation of config.json.
//!
//! Every section defaults, so an empty object (or no file at all) yields a
//! configuration that reads the canonical column names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

/// Root analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub fulfillment_columns: FulfillmentColumns,

    #[serde(default)]
    pub interruption_columns: InterruptionColumns,

    #[serde(default)]
    pub timestamps: TimestampSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            schema_version: default_schema_version(),
            description: None,
            fulfillment_columns: FulfillmentColumns::default(),
            interruption_columns: InterruptionColumns::default(),
            timestamps: TimestampSettings::default(),
            report: ReportSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

/// Header names of the fulfillment table's required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillmentColumns {
    pub instance_id: String,
    pub time: String,
    pub instance_type: String,
    pub availability_zone: String,
}

impl Default for FulfillmentColumns {
    fn default() -> Self {
        FulfillmentColumns {
            instance_id: "instance_id".to_string(),
            time: "time".to_string(),
            instance_type: "instance_type".to_string(),
            availability_zone: "availability_zone".to_string(),
        }
    }
}

impl FulfillmentColumns {
    /// (logical name, header) pairs in declaration order.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("instance_id", self.instance_id.as_str()),
            ("time", self.time.as_str()),
            ("instance_type", self.instance_type.as_str()),
            ("availability_zone", self.availability_zone.as_str()),
        ]
    }
}

/// Header names of the interruption table's required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterruptionColumns {
    pub instance_id: String,
    pub time: String,
}

impl Default for InterruptionColumns {
    fn default() -> Self {
        InterruptionColumns {
            instance_id: "instance_id".to_string(),
            time: "time".to_string(),
        }
    }
}

impl InterruptionColumns {
    /// (logical name, header) pairs in declaration order.
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [("instance_id", self.instance_id.as_str()), ("time", self.time.as_str())]
    }
}

/// Timestamp parsing options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampSettings {
    /// Additional `chrono` format strings, tried after the built-in
    /// ISO-8601 forms. Naive formats are read as UTC.
    pub extra_formats: Vec<String>,
}

/// Knobs for the supplementary report tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Rows kept in the top-by-total-uptime table.
    pub top_n: usize,
    /// Equal-width bins in the uptime histogram.
    pub histogram_bins: usize,
    /// Filtered rows shown in the preview.
    pub preview_rows: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_n: 10,
            histogram_bins: 30,
            preview_rows: 5,
        }
    }
}

/// CSV export options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            file_name: "uptime_summary.csv".to_string(),
        }
    }
}
