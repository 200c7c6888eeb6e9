//! Spot instance lifecycle events and the correlated instance record.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::id::InstanceId;

/// A categorical grouping value (instance type, availability zone).
///
/// `None` means the source cell was empty. Missing values form their own
/// group in every aggregation instead of being dropped, and sort before any
/// present value.
pub type Category = Option<String>;

/// Render a category for tabular output. Missing values render empty.
pub fn category_label(category: &Category) -> &str {
    category.as_deref().unwrap_or("")
}

/// Parse a raw cell into a category. Only an empty cell is missing; any
/// other value, whitespace included, is kept verbatim.
pub fn category_from_cell(cell: &str) -> Category {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Which raw input table a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventTable {
    /// Spot request fulfillment log (instance acquired).
    Fulfillment,
    /// Spot interruption warning log (instance reclaimed).
    Interruption,
}

impl fmt::Display for EventTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTable::Fulfillment => write!(f, "fulfillment"),
            EventTable::Interruption => write!(f, "interruption"),
        }
    }
}

/// One spot request fulfillment: the instance became active at `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FulfillmentEvent {
    pub instance_id: InstanceId,
    pub time: DateTime<Utc>,
    pub instance_type: Category,
    pub availability_zone: Category,
    /// Columns not consumed by the analysis, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// One spot interruption: the provider reclaimed the instance at `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterruptionEvent {
    pub instance_id: InstanceId,
    pub time: DateTime<Utc>,
    /// Columns not consumed by the analysis, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// One joined (fulfillment, interruption) pair with its derived uptime.
///
/// Type and zone always come from the fulfillment side. Passthrough columns
/// keep their table of origin so same-named columns never collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrelatedInstance {
    pub instance_id: InstanceId,
    pub instance_type: Category,
    pub availability_zone: Category,
    pub start_time: DateTime<Utc>,
    pub stop_time: DateTime<Utc>,
    /// `(stop_time - start_time)` in hours. Negative when the logs disagree
    /// on ordering; never clamped.
    pub uptime_hours: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub start_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stop_fields: BTreeMap<String, String>,
}
