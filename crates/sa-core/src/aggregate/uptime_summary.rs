//! By-type uptime summary and its top-N view.

use sa_common::{Category, CorrelatedInstance};
use sa_math::Descriptive;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::uptime_by_type;

/// Uptime statistics for one instance type.
///
/// Field names double as the export column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypeSummary {
    pub instance_type: Category,
    pub total_uptime_hours: f64,
    pub mean_uptime_hours: Option<f64>,
    pub median_uptime_hours: Option<f64>,
    /// Smallest of the most frequent values.
    pub mode_uptime_hours: Option<f64>,
    /// Sample standard deviation; `None` for a single instance.
    pub std_dev_uptime_hours: Option<f64>,
    pub instance_count: usize,
}

/// Summarize uptime per instance type, ordered by total uptime descending.
pub fn uptime_summary(rows: &[CorrelatedInstance]) -> Vec<TypeSummary> {
    let mut summary: Vec<TypeSummary> = uptime_by_type(rows)
        .into_iter()
        .map(|(instance_type, samples)| {
            let stats = Descriptive::of(&samples);
            TypeSummary {
                instance_type,
                total_uptime_hours: stats.sum,
                mean_uptime_hours: stats.mean,
                median_uptime_hours: stats.median,
                mode_uptime_hours: stats.mode,
                std_dev_uptime_hours: stats.std_dev,
                instance_count: samples.len(),
            }
        })
        .collect();

    summary.sort_by(|a, b| b.total_uptime_hours.total_cmp(&a.total_uptime_hours));
    summary
}

/// The first `n` rows of an already sorted summary.
pub fn top_by_total_uptime(summary: &[TypeSummary], n: usize) -> Vec<TypeSummary> {
    summary.iter().take(n).cloned().collect()
}
