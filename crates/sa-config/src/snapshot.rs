//! Configuration snapshots recorded with each analysis report.
//!
//! A snapshot captures which configuration produced a report, so two reports
//! can be checked for comparability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::{ConfigPaths, ConfigSource};
use crate::settings::AnalysisConfig;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the config was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Source of the configuration.
    pub source: String,

    /// SHA-256 of the raw config file, or of the canonical JSON of the
    /// effective config when running on defaults.
    pub content_hash: String,
}

impl ConfigSnapshot {
    /// Create a new snapshot from a loaded configuration.
    ///
    /// `raw_json` is the file content as read; `None` when defaults are used.
    pub fn new(config: &AnalysisConfig, paths: &ConfigPaths, raw_json: Option<&str>) -> Self {
        let content_hash = match raw_json {
            Some(raw) => hash_content(raw),
            None => hash_content(&serde_json::to_string(config).unwrap_or_default()),
        };

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            path: paths.config.as_ref().map(|p| p.display().to_string()),
            source: paths.source.to_string(),
            content_hash,
        }
    }

    /// Create a snapshot with only defaults (no config file loaded).
    pub fn defaults_only() -> Self {
        Self::new(
            &AnalysisConfig::default(),
            &ConfigPaths {
                config: None,
                source: ConfigSource::BuiltinDefault,
            },
            None,
        )
    }

    /// Check if this snapshot matches another (same config content).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.content_hash == other.content_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.content_hash[..12.min(self.content_hash.len())]
    }
}

/// Hex SHA-256 of a string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
