//! Grouped summaries over correlated instances.
//!
//! Every aggregation is a pure reduction: zero input rows yield an empty
//! table, and a missing grouping value forms its own group. Groups are
//! collected in a `BTreeMap`, so ties left by the primary sort key always
//! resolve in ascending key order with missing values first.

pub mod availability;
pub mod histogram;
pub mod interruptions;
pub mod overview;
pub mod ranking;
pub mod uptime_summary;

pub use availability::{most_available_per_zone, zone_type_availability, ZoneTypeCount};
pub use histogram::{uptime_histogram, HistogramBin, UptimeHistogram};
pub use interruptions::{interruption_frequency, InterruptionAttribution, InterruptionFrequency};
pub use overview::{overview, Overview};
pub use ranking::{uptime_ranking, TypeRanking};
pub use uptime_summary::{top_by_total_uptime, uptime_summary, TypeSummary};

use sa_common::{Category, CorrelatedInstance};
use std::collections::BTreeMap;

/// Uptime samples per instance type, in row order within each group.
pub(crate) fn uptime_by_type(rows: &[CorrelatedInstance]) -> BTreeMap<Category, Vec<f64>> {
    let mut groups: BTreeMap<Category, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.instance_type.clone())
            .or_default()
            .push(row.uptime_hours);
    }
    groups
}
