//! Instance types ranked by mean uptime.

use sa_common::{Category, CorrelatedInstance};
use sa_math::{sample_std_dev, stable_mean};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::uptime_by_type;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypeRanking {
    pub instance_type: Category,
    pub mean_uptime_hours: Option<f64>,
    pub std_dev_uptime_hours: Option<f64>,
    pub instance_count: usize,
}

/// Mean, sample standard deviation and count per type, by mean descending.
pub fn uptime_ranking(rows: &[CorrelatedInstance]) -> Vec<TypeRanking> {
    let mut ranking: Vec<TypeRanking> = uptime_by_type(rows)
        .into_iter()
        .map(|(instance_type, samples)| TypeRanking {
            instance_type,
            mean_uptime_hours: stable_mean(&samples),
            std_dev_uptime_hours: sample_std_dev(&samples),
            instance_count: samples.len(),
        })
        .collect();

    ranking.sort_by(|a, b| descending_mean(a.mean_uptime_hours, b.mean_uptime_hours));
    ranking
}

// Undefined means rank last.
fn descending_mean(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
