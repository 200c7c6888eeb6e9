//! Fuzz target for the full analysis over small structured inputs.
//!
//! Checks the row accounting that must hold for any input.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{Duration, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use sa_common::{FulfillmentEvent, InterruptionEvent};
use sa_core::logging::LogContext;
use sa_core::{analyze, Filter, ReportOptions};
use std::collections::BTreeMap;

#[derive(Debug, Arbitrary)]
struct Row {
    id: u8,
    kind: u8,
    zone: u8,
    minutes: i32,
}

#[derive(Debug, Arbitrary)]
struct Input {
    fulfillments: Vec<Row>,
    interruptions: Vec<Row>,
    bins: u8,
    type_filter: Option<u8>,
}

fn category(value: u8, prefix: &str) -> Option<String> {
    match value % 4 {
        0 => None,
        n => Some(format!("{prefix}{n}")),
    }
}

fuzz_target!(|input: Input| {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let fs: Vec<FulfillmentEvent> = input
        .fulfillments
        .iter()
        .take(64)
        .map(|r| FulfillmentEvent {
            instance_id: format!("i-{}", r.id % 16).into(),
            time: base + Duration::minutes(i64::from(r.minutes)),
            instance_type: category(r.kind, "t"),
            availability_zone: category(r.zone, "z"),
            extra: BTreeMap::new(),
        })
        .collect();
    let is: Vec<InterruptionEvent> = input
        .interruptions
        .iter()
        .take(64)
        .map(|r| InterruptionEvent {
            instance_id: format!("i-{}", r.id % 16).into(),
            time: base + Duration::minutes(i64::from(r.minutes)),
            extra: BTreeMap::new(),
        })
        .collect();

    let mut options = ReportOptions {
        histogram_bins: usize::from(input.bins),
        ..ReportOptions::default()
    };
    if let Some(t) = input.type_filter {
        options.filter = Filter::all().with_types([category(t, "t")]);
    }

    let report = analyze(&fs, &is, &options, &LogContext::new("run-fuzz", "host-fuzz"));
    let counted: usize = report.uptime_summary.iter().map(|s| s.instance_count).sum();
    assert_eq!(counted, report.correlated.len());
    let attributed: usize = report
        .interruption_frequency
        .iter()
        .map(|f| f.interruption_count)
        .sum();
    assert_eq!(attributed + report.metadata.dropped_interruptions, is.len());
    assert_eq!(report.filtered.uptime_histogram.total(), report.filtered.overview.rows.len());
});
