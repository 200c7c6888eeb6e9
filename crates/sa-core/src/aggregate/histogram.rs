//! Equal-width uptime distribution, split by instance type.

use sa_common::{Category, CorrelatedInstance};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count of one instance type inside one bin. Only non-empty cells are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistogramBin {
    pub bin: usize,
    pub lower_hours: f64,
    pub upper_hours: f64,
    pub instance_type: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UptimeHistogram {
    /// Requested bin count.
    pub bins: usize,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
    pub cells: Vec<HistogramBin>,
}

impl UptimeHistogram {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total rows across all cells.
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }
}

/// Bin uptime over `[min, max]` into `bins` equal-width bins.
///
/// The maximum lands in the last bin. When every value is equal the whole
/// sample goes to bin 0. A `bins` of zero is treated as one.
pub fn uptime_histogram(rows: &[CorrelatedInstance], bins: usize) -> UptimeHistogram {
    let bins = bins.max(1);
    let bounds = rows.iter().map(|r| r.uptime_hours).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    });
    let Some((min, max)) = bounds else {
        return UptimeHistogram {
            bins,
            min_hours: None,
            max_hours: None,
            cells: Vec::new(),
        };
    };

    let width = (max - min) / bins as f64;
    let mut counts: BTreeMap<(usize, &Category), usize> = BTreeMap::new();
    for row in rows {
        let idx = if width > 0.0 {
            (((row.uptime_hours - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        *counts.entry((idx, &row.instance_type)).or_default() += 1;
    }

    let edge = |i: usize| if width > 0.0 { min + width * i as f64 } else { min };
    let cells = counts
        .into_iter()
        .map(|((bin, instance_type), count)| HistogramBin {
            bin,
            lower_hours: edge(bin),
            upper_hours: if width > 0.0 && bin + 1 < bins {
                edge(bin + 1)
            } else {
                max
            },
            instance_type: instance_type.clone(),
            count,
        })
        .collect();

    UptimeHistogram {
        bins,
        min_hours: Some(min),
        max_hours: Some(max),
        cells,
    }
}
