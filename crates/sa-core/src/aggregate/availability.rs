//! Zone × type availability counts and the most available type per zone.

use sa_common::{Category, CorrelatedInstance};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ZoneTypeCount {
    pub availability_zone: Category,
    pub instance_type: Category,
    pub count: usize,
}

/// Count correlated rows per (zone, type).
///
/// Ordered by count descending; equal counts fall back to ascending
/// (zone, type).
pub fn zone_type_availability(rows: &[CorrelatedInstance]) -> Vec<ZoneTypeCount> {
    let mut counts: BTreeMap<(&Category, &Category), usize> = BTreeMap::new();
    for row in rows {
        *counts
            .entry((&row.availability_zone, &row.instance_type))
            .or_default() += 1;
    }

    let mut table: Vec<ZoneTypeCount> = counts
        .into_iter()
        .map(|((zone, instance_type), count)| ZoneTypeCount {
            availability_zone: zone.clone(),
            instance_type: instance_type.clone(),
            count,
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// The first row per zone of a count-descending availability table.
///
/// Zones come out in ascending order. The winner within a zone is its first
/// row in `table`. "First" is read over the table [`zone_type_availability`]
/// builds, which is key-sorted by (zone, type) before the stable count sort,
/// not over the order rows arrived in. A tie therefore goes to the smallest
/// instance type even when a larger one was seen first.
pub fn most_available_per_zone(table: &[ZoneTypeCount]) -> Vec<ZoneTypeCount> {
    let mut winners: BTreeMap<&Category, &ZoneTypeCount> = BTreeMap::new();
    for entry in table {
        winners.entry(&entry.availability_zone).or_insert(entry);
    }
    winners.into_values().cloned().collect()
}
