//! Inner join of the fulfillment and interruption streams on instance id.
//!
//! The join is a per-key cross product: an id seen `m` times among
//! fulfillments and `n` times among interruptions yields `m * n` pairs.
//! Ids present in only one stream yield nothing.
//!
//! Output order is deterministic: fulfillment rows in input order, and for
//! each of them the matching interruption rows in input order.

use sa_common::{FulfillmentEvent, InstanceId, InterruptionEvent};
use std::collections::HashMap;

/// One (fulfillment, interruption) match, before uptime is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPair<'a> {
    pub start: &'a FulfillmentEvent,
    pub stop: &'a InterruptionEvent,
}

/// Join both streams on `instance_id`.
pub fn correlate<'a>(
    fulfillments: &'a [FulfillmentEvent],
    interruptions: &'a [InterruptionEvent],
) -> Vec<EventPair<'a>> {
    let mut by_id: HashMap<&InstanceId, Vec<&InterruptionEvent>> = HashMap::new();
    for stop in interruptions {
        by_id.entry(&stop.instance_id).or_default().push(stop);
    }

    let mut pairs = Vec::new();
    for start in fulfillments {
        if let Some(stops) = by_id.get(&start.instance_id) {
            pairs.extend(stops.iter().map(|stop| EventPair { start, stop }));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};
    use std::collections::BTreeMap;

    fn f(id: &str, hour: u32) -> FulfillmentEvent {
        FulfillmentEvent {
            instance_id: id.into(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            instance_type: Some("m5.large".into()),
            availability_zone: Some("us-east-1a".into()),
            extra: BTreeMap::new(),
        }
    }

    fn i(id: &str, hour: u32) -> InterruptionEvent {
        InterruptionEvent {
            instance_id: id.into(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn matches_single_pair() {
        let fs = vec![f("A", 0)];
        let is = vec![i("A", 2)];
        let pairs = correlate(&fs, &is);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].start.instance_id.as_str(), "A");
        assert_eq!(pairs[0].stop.time.hour(), 2);
    }

    #[test]
    fn disjoint_ids_yield_nothing() {
        let fs = vec![f("B", 0)];
        let is = vec![i("C", 1)];
        assert!(correlate(&fs, &is).is_empty());
    }

    #[test]
    fn duplicates_cross_product() {
        let fs = vec![f("A", 0), f("A", 1), f("B", 0)];
        let is = vec![i("A", 5), i("A", 6), i("A", 7), i("B", 3)];
        let pairs = correlate(&fs, &is);
        let a = pairs.iter().filter(|p| p.start.instance_id.as_str() == "A").count();
        let b = pairs.iter().filter(|p| p.start.instance_id.as_str() == "B").count();
        assert_eq!(a, 6);
        assert_eq!(b, 1);
    }

    #[test]
    fn preserves_left_then_right_order() {
        let fs = vec![f("A", 0), f("A", 1)];
        let is = vec![i("A", 5), i("A", 6)];
        let order: Vec<(u32, u32)> = correlate(&fs, &is)
            .iter()
            .map(|p| (p.start.time.hour(), p.stop.time.hour()))
            .collect();
        assert_eq!(order, vec![(0, 5), (0, 6), (1, 5), (1, 6)]);
    }

    #[test]
    fn empty_inputs() {
        assert!(correlate(&[], &[]).is_empty());
        assert!(correlate(&[f("A", 0)], &[]).is_empty());
        assert!(correlate(&[], &[i("A", 0)]).is_empty());
    }
}
