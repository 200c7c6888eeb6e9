//! JSON Schema generation for report types.
//!
//! ```bash
//! spot-analysis schema --list
//! spot-analysis schema AnalysisReport
//! spot-analysis schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::aggregate::{
    HistogramBin, InterruptionFrequency, Overview, TypeRanking, TypeSummary, UptimeHistogram,
    ZoneTypeCount,
};
pub use crate::filter::Filter;
pub use crate::pipeline::{AnalysisReport, FilteredView, ReportOptions, RunMetadata};
pub use sa_common::{CorrelatedInstance, EventTable, FulfillmentEvent, InstanceId, InterruptionEvent};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Input records
        ("InstanceId", "Cloud instance identifier"),
        ("EventTable", "Which input table a record came from"),
        ("FulfillmentEvent", "Spot request fulfillment record"),
        ("InterruptionEvent", "Spot interruption record"),
        ("CorrelatedInstance", "Joined fulfillment/interruption pair with uptime"),
        // Output tables
        ("TypeSummary", "Uptime statistics per instance type"),
        ("ZoneTypeCount", "Correlated instance count per zone and type"),
        ("TypeRanking", "Mean/std/count ranking row"),
        ("InterruptionFrequency", "Interruptions attributed to an instance type"),
        ("HistogramBin", "One (bin, instance type) histogram cell"),
        ("UptimeHistogram", "Equal-width uptime distribution"),
        ("Filter", "Type and zone predicates"),
        ("Overview", "Filtered rows with distinct instance counts"),
        ("FilteredView", "Filter-dependent report section"),
        // Report envelope
        ("ReportOptions", "Knobs for one analysis run"),
        ("RunMetadata", "Run identity and input counts"),
        ("AnalysisReport", "Complete analysis report"),
    ]
}

/// Generate JSON Schema for a type by name, or `None` if unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "InstanceId" => schema_for!(InstanceId),
        "EventTable" => schema_for!(EventTable),
        "FulfillmentEvent" => schema_for!(FulfillmentEvent),
        "InterruptionEvent" => schema_for!(InterruptionEvent),
        "CorrelatedInstance" => schema_for!(CorrelatedInstance),
        "TypeSummary" => schema_for!(TypeSummary),
        "ZoneTypeCount" => schema_for!(ZoneTypeCount),
        "TypeRanking" => schema_for!(TypeRanking),
        "InterruptionFrequency" => schema_for!(InterruptionFrequency),
        "HistogramBin" => schema_for!(HistogramBin),
        "UptimeHistogram" => schema_for!(UptimeHistogram),
        "Filter" => schema_for!(Filter),
        "Overview" => schema_for!(Overview),
        "FilteredView" => schema_for!(FilteredView),
        "ReportOptions" => schema_for!(ReportOptions),
        "RunMetadata" => schema_for!(RunMetadata),
        "AnalysisReport" => schema_for!(AnalysisReport),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}
