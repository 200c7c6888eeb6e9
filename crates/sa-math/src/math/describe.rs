//! One-shot descriptive summary of a sample.

use serde::{Deserialize, Serialize};

use super::mode::mode;
use super::stable::{count_present, present, sample_std_dev, stable_mean, stable_sum};

/// Median of the non-missing values.
///
/// Even-length samples average the two middle values. `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = present(values).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Descriptive statistics of one sample.
///
/// Degenerate statistics stay `None` instead of becoming NaN: an empty sample
/// has no mean, median or mode, and a single observation has no sample
/// standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptive {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub std_dev: Option<f64>,
}

impl Descriptive {
    /// Summarize a sample. NaN entries are treated as missing and skipped.
    pub fn of(values: &[f64]) -> Self {
        Descriptive {
            count: count_present(values),
            sum: stable_sum(values),
            mean: stable_mean(values),
            median: median(values),
            mode: mode(values),
            std_dev: sample_std_dev(values),
        }
    }
}
