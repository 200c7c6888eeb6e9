//! Interruption counts attributed to instance types.

use sa_common::{Category, CorrelatedInstance, InstanceId, InterruptionEvent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InterruptionFrequency {
    pub instance_type: Category,
    pub interruption_count: usize,
}

/// Frequency table plus the number of events that could not be attributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InterruptionAttribution {
    pub frequencies: Vec<InterruptionFrequency>,
    /// Interruptions whose instance id never reached the correlated set.
    pub dropped: usize,
}

/// Count interruption events per instance type.
///
/// Each event's type is looked up through the correlated rows, taking the
/// first row for an id when the join duplicated it. Unattributable events
/// are only counted in [`InterruptionAttribution::dropped`]. Rows come out
/// by count descending, equal counts in order of first appearance.
pub fn interruption_frequency(
    interruptions: &[InterruptionEvent],
    rows: &[CorrelatedInstance],
) -> InterruptionAttribution {
    let mut type_of: HashMap<&InstanceId, &Category> = HashMap::new();
    for row in rows {
        type_of.entry(&row.instance_id).or_insert(&row.instance_type);
    }

    let mut frequencies: Vec<InterruptionFrequency> = Vec::new();
    let mut slot: HashMap<&Category, usize> = HashMap::new();
    let mut dropped = 0;
    for event in interruptions {
        let Some(instance_type) = type_of.get(&event.instance_id).copied() else {
            dropped += 1;
            continue;
        };
        let idx = *slot.entry(instance_type).or_insert_with(|| {
            frequencies.push(InterruptionFrequency {
                instance_type: instance_type.clone(),
                interruption_count: 0,
            });
            frequencies.len() - 1
        });
        frequencies[idx].interruption_count += 1;
    }

    frequencies.sort_by(|a, b| b.interruption_count.cmp(&a.interruption_count));
    InterruptionAttribution {
        frequencies,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::row;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn stop(id: &str) -> InterruptionEvent {
        InterruptionEvent {
            instance_id: id.into(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn single_match() {
        let rows = vec![row("A", Some("m5.large"), Some("us-east-1a"), 2.5)];
        let result = interruption_frequency(&[stop("A")], &rows);
        assert_eq!(
            result.frequencies,
            vec![InterruptionFrequency {
                instance_type: Some("m5.large".into()),
                interruption_count: 1,
            }]
        );
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn unmatched_interruptions_are_dropped() {
        let rows = vec![row("A", Some("m5.large"), None, 1.0)];
        let result = interruption_frequency(&[stop("A"), stop("Z"), stop("Y")], &rows);
        assert_eq!(result.frequencies.len(), 1);
        assert_eq!(result.dropped, 2);
    }

    #[test]
    fn duplicated_ids_use_first_correlated_type() {
        let rows = vec![
            row("A", Some("first"), None, 1.0),
            row("A", Some("second"), None, 1.0),
        ];
        let result = interruption_frequency(&[stop("A"), stop("A")], &rows);
        assert_eq!(result.frequencies.len(), 1);
        assert_eq!(result.frequencies[0].instance_type.as_deref(), Some("first"));
        assert_eq!(result.frequencies[0].interruption_count, 2);
    }

    #[test]
    fn missing_type_is_its_own_group() {
        let rows = vec![row("A", None, None, 1.0), row("B", Some("m5.large"), None, 1.0)];
        let result = interruption_frequency(&[stop("B"), stop("A"), stop("A")], &rows);
        assert_eq!(result.frequencies[0].instance_type, None);
        assert_eq!(result.frequencies[0].interruption_count, 2);
        assert_eq!(result.frequencies[1].interruption_count, 1);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let rows = vec![row("A", Some("zeta"), None, 1.0), row("B", Some("alpha"), None, 1.0)];
        let result = interruption_frequency(&[stop("A"), stop("B")], &rows);
        let order: Vec<_> = result
            .frequencies
            .iter()
            .map(|f| f.instance_type.as_deref())
            .collect();
        assert_eq!(order, vec![Some("zeta"), Some("alpha")]);
    }

    #[test]
    fn empty_correlated_set_drops_everything() {
        let result = interruption_frequency(&[stop("A")], &[]);
        assert!(result.frequencies.is_empty());
        assert_eq!(result.dropped, 1);
    }
}
