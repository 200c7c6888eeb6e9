//! CSV export of the by-type uptime summary, memoized by content.
//!
//! The encoding is UTF-8, one header row, no index column. Missing
//! statistics are written as empty fields.

use sa_common::category_label;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::aggregate::TypeSummary;
use crate::logging::event_names;

/// Column headers of the exported summary, in order.
pub const SUMMARY_HEADERS: [&str; 7] = [
    "instance_type",
    "total_uptime_hours",
    "mean_uptime_hours",
    "median_uptime_hours",
    "mode_uptime_hours",
    "std_dev_uptime_hours",
    "instance_count",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("flushing CSV buffer failed: {0}")]
    Flush(#[source] std::io::Error),

    #[error("cannot fingerprint summary table: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

impl From<ExportError> for sa_common::Error {
    fn from(err: ExportError) -> Self {
        sa_common::Error::Export(err.to_string())
    }
}

fn number(value: f64) -> String {
    format!("{value:?}")
}

fn optional(value: Option<f64>) -> String {
    value.map(number).unwrap_or_default()
}

/// Encode the summary as CSV bytes.
pub fn encode_summary_csv(summary: &[TypeSummary]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SUMMARY_HEADERS)?;
    for row in summary {
        writer.write_record([
            category_label(&row.instance_type).to_string(),
            number(row.total_uptime_hours),
            optional(row.mean_uptime_hours),
            optional(row.median_uptime_hours),
            optional(row.mode_uptime_hours),
            optional(row.std_dev_uptime_hours),
            row.instance_count.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.into_error()))
}

/// Content key of a summary table: hex SHA-256 of its JSON form.
pub fn summary_fingerprint(summary: &[TypeSummary]) -> Result<String, ExportError> {
    let json = serde_json::to_vec(summary)?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(hex::encode(hasher.finalize()))
}

/// Memoized CSV encodings keyed by table content.
///
/// Identical tables share one encoding; a cache entry never goes stale
/// because its key is derived from the table itself.
#[derive(Debug, Default)]
pub struct ExportCache {
    entries: HashMap<String, Arc<Vec<u8>>>,
    hits: u64,
    misses: u64,
}

impl ExportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// CSV bytes for `summary`, encoding only on first sight of its content.
    pub fn summary_csv(&mut self, summary: &[TypeSummary]) -> Result<Arc<Vec<u8>>, ExportError> {
        let key = summary_fingerprint(summary)?;
        if let Some(bytes) = self.entries.get(&key) {
            self.hits += 1;
            debug!(
                target: event_names::EXPORT_CACHE_HIT,
                key = &key[..12],
                bytes = bytes.len(),
                "Reusing cached summary export"
            );
            return Ok(Arc::clone(bytes));
        }

        let bytes = Arc::new(encode_summary_csv(summary)?);
        self.misses += 1;
        debug!(
            target: event_names::EXPORT_ENCODED,
            key = &key[..12],
            bytes = bytes.len(),
            "Encoded summary export"
        );
        self.entries.insert(key, Arc::clone(&bytes));
        Ok(bytes)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
