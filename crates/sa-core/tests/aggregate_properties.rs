//! Property-based tests for join and aggregation invariants.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use sa_common::{Category, CorrelatedInstance, FulfillmentEvent, InterruptionEvent};
use sa_core::aggregate::{
    interruption_frequency, most_available_per_zone, uptime_histogram, uptime_ranking, uptime_summary,
    zone_type_availability,
};
use sa_core::{correlate, with_uptime, Filter};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const TYPES: [Option<&str>; 4] = [Some("m5.large"), Some("c5.xlarge"), Some("t3.micro"), None];
const ZONES: [Option<&str>; 3] = [Some("us-east-1a"), Some("us-east-1b"), None];

fn category(value: Option<&str>) -> Category {
    value.map(str::to_string)
}

fn fulfillments() -> impl Strategy<Value = Vec<FulfillmentEvent>> {
    prop::collection::vec((0u8..6, 0usize..TYPES.len(), 0usize..ZONES.len(), 0i64..600), 0..20).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(id, t, z, minutes)| FulfillmentEvent {
                    instance_id: format!("i-{id}").into(),
                    time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
                    instance_type: category(TYPES[t]),
                    availability_zone: category(ZONES[z]),
                    extra: BTreeMap::new(),
                })
                .collect()
        },
    )
}

fn interruptions() -> impl Strategy<Value = Vec<InterruptionEvent>> {
    prop::collection::vec((0u8..8, 0i64..1200), 0..20).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, minutes)| InterruptionEvent {
                instance_id: format!("i-{id}").into(),
                time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
                extra: BTreeMap::new(),
            })
            .collect()
    })
}

fn correlated(fs: &[FulfillmentEvent], is: &[InterruptionEvent]) -> Vec<CorrelatedInstance> {
    with_uptime(&correlate(fs, is))
}

proptest! {
    #[test]
    fn join_size_is_product_of_per_id_counts(fs in fulfillments(), is in interruptions()) {
        let mut f_counts: HashMap<String, usize> = HashMap::new();
        for f in &fs {
            *f_counts.entry(f.instance_id.to_string()).or_default() += 1;
        }
        let mut expected = 0;
        for i in &is {
            expected += f_counts.get(i.instance_id.as_str()).copied().unwrap_or(0);
        }
        prop_assert_eq!(correlated(&fs, &is).len(), expected);
    }

    #[test]
    fn summary_covers_every_row_once(fs in fulfillments(), is in interruptions()) {
        let rows = correlated(&fs, &is);
        let summary = uptime_summary(&rows);

        let counted: usize = summary.iter().map(|s| s.instance_count).sum();
        prop_assert_eq!(counted, rows.len());

        let types: BTreeSet<&Category> = summary.iter().map(|s| &s.instance_type).collect();
        prop_assert_eq!(types.len(), summary.len());
        let observed: BTreeSet<&Category> = rows.iter().map(|r| &r.instance_type).collect();
        prop_assert_eq!(types, observed);

        for pair in summary.windows(2) {
            prop_assert!(pair[0].total_uptime_hours >= pair[1].total_uptime_hours);
        }
    }

    #[test]
    fn std_dev_defined_only_for_two_or_more(fs in fulfillments(), is in interruptions()) {
        let rows = correlated(&fs, &is);
        for s in uptime_summary(&rows) {
            prop_assert_eq!(s.std_dev_uptime_hours.is_some(), s.instance_count >= 2);
            prop_assert!(s.mean_uptime_hours.is_some());
        }
        for r in uptime_ranking(&rows) {
            prop_assert_eq!(r.std_dev_uptime_hours.is_some(), r.instance_count >= 2);
        }
    }

    #[test]
    fn zone_winner_has_maximal_count(fs in fulfillments(), is in interruptions()) {
        let rows = correlated(&fs, &is);
        let table = zone_type_availability(&rows);
        let winners = most_available_per_zone(&table);

        let zones: BTreeSet<&Category> = table.iter().map(|c| &c.availability_zone).collect();
        prop_assert_eq!(winners.len(), zones.len());
        for winner in &winners {
            for cell in table.iter().filter(|c| c.availability_zone == winner.availability_zone) {
                prop_assert!(winner.count >= cell.count);
            }
        }
    }

    #[test]
    fn frequency_plus_dropped_equals_interruptions(fs in fulfillments(), is in interruptions()) {
        let rows = correlated(&fs, &is);
        let attribution = interruption_frequency(&is, &rows);
        let attributed: usize = attribution.frequencies.iter().map(|f| f.interruption_count).sum();
        prop_assert_eq!(attributed + attribution.dropped, is.len());
        for pair in attribution.frequencies.windows(2) {
            prop_assert!(pair[0].interruption_count >= pair[1].interruption_count);
        }
    }

    #[test]
    fn filter_is_idempotent_and_unrestricted_is_identity(
        fs in fulfillments(),
        is in interruptions(),
        type_mask in prop::collection::vec(any::<bool>(), TYPES.len()),
    ) {
        let rows = correlated(&fs, &is);
        prop_assert_eq!(Filter::all().apply(&rows), rows.clone());

        let chosen = TYPES
            .iter()
            .zip(&type_mask)
            .filter(|(_, keep)| **keep)
            .map(|(t, _)| category(*t));
        let filter = Filter::all().with_types(chosen);
        let once = filter.apply(&rows);
        let twice = filter.apply(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.len() <= rows.len());
    }

    #[test]
    fn histogram_counts_every_row(
        fs in fulfillments(),
        is in interruptions(),
        bins in 0usize..12,
    ) {
        let rows = correlated(&fs, &is);
        let histogram = uptime_histogram(&rows, bins);
        prop_assert_eq!(histogram.total(), rows.len());
        for cell in &histogram.cells {
            prop_assert!(cell.bin < bins.max(1));
            prop_assert!(cell.lower_hours <= cell.upper_hours);
        }
    }
}
