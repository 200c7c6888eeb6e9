//! Uptime derivation for correlated pairs.

use chrono::{DateTime, Utc};
use sa_common::CorrelatedInstance;

use crate::correlate::EventPair;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Elapsed hours from `start` to `stop`. Negative when `stop` precedes `start`.
pub fn uptime_hours(start: DateTime<Utc>, stop: DateTime<Utc>) -> f64 {
    let delta = stop - start;
    // subsec_nanos carries the same sign as num_seconds.
    let seconds = delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) * 1e-9;
    seconds / SECONDS_PER_HOUR
}

/// Materialize each pair as a [`CorrelatedInstance`] with its uptime.
///
/// Type and zone are taken from the fulfillment side only.
pub fn with_uptime(pairs: &[EventPair<'_>]) -> Vec<CorrelatedInstance> {
    pairs
        .iter()
        .map(|pair| CorrelatedInstance {
            instance_id: pair.start.instance_id.clone(),
            instance_type: pair.start.instance_type.clone(),
            availability_zone: pair.start.availability_zone.clone(),
            start_time: pair.start.time,
            stop_time: pair.stop.time,
            uptime_hours: uptime_hours(pair.start.time, pair.stop.time),
            start_fields: pair.start.extra.clone(),
            stop_fields: pair.stop.extra.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sa_common::{FulfillmentEvent, InterruptionEvent};
    use std::collections::BTreeMap;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn ninety_minutes_is_one_and_a_half_hours() {
        assert_eq!(uptime_hours(t0(), t0() + Duration::minutes(90)), 1.5);
    }

    #[test]
    fn negative_duration_is_kept() {
        assert_eq!(uptime_hours(t0(), t0() - Duration::minutes(30)), -0.5);
    }

    #[test]
    fn sub_second_precision() {
        let stop = t0() + Duration::milliseconds(1800);
        assert!((uptime_hours(t0(), stop) - 0.0005).abs() < 1e-15);
        let before = t0() - Duration::milliseconds(1800);
        assert!((uptime_hours(t0(), before) + 0.0005).abs() < 1e-15);
    }

    #[test]
    fn with_uptime_uses_fulfillment_side_categories() {
        let mut stop_extra = BTreeMap::new();
        stop_extra.insert("availability_zone".to_string(), "eu-west-1c".to_string());
        let start = FulfillmentEvent {
            instance_id: "A".into(),
            time: t0(),
            instance_type: Some("m5.large".into()),
            availability_zone: Some("us-east-1a".into()),
            extra: BTreeMap::new(),
        };
        let stop = InterruptionEvent {
            instance_id: "A".into(),
            time: t0() + Duration::minutes(150),
            extra: stop_extra,
        };
        let rows = with_uptime(&[EventPair {
            start: &start,
            stop: &stop,
        }]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].uptime_hours, 2.5);
        assert_eq!(rows[0].availability_zone.as_deref(), Some("us-east-1a"));
        assert_eq!(
            rows[0].stop_fields.get("availability_zone").map(String::as_str),
            Some("eu-west-1c")
        );
    }
}
