//! Filtered overview: the selected rows plus distinct instance counts.

use sa_common::CorrelatedInstance;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::filter::Filter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Overview {
    pub filter: Filter,
    /// Distinct instance ids before filtering.
    pub total_instances: usize,
    /// Distinct instance ids after filtering.
    pub filtered_instances: usize,
    pub rows: Vec<CorrelatedInstance>,
}

pub fn overview(rows: &[CorrelatedInstance], filter: &Filter) -> Overview {
    let filtered = filter.apply(rows);
    Overview {
        filter: filter.clone(),
        total_instances: distinct_instances(rows),
        filtered_instances: distinct_instances(&filtered),
        rows: filtered,
    }
}

fn distinct_instances(rows: &[CorrelatedInstance]) -> usize {
    rows.iter()
        .map(|r| &r.instance_id)
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::row;

    #[test]
    fn counts_distinct_ids_not_rows() {
        let rows = vec![
            row("A", Some("m5.large"), Some("us-east-1a"), 1.0),
            row("A", Some("m5.large"), Some("us-east-1a"), 2.0),
            row("B", Some("c5.large"), Some("us-east-1b"), 3.0),
        ];
        let view = overview(&rows, &Filter::all().with_types([Some("m5.large".into())]));
        assert_eq!(view.total_instances, 2);
        assert_eq!(view.filtered_instances, 1);
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn empty_input() {
        let view = overview(&[], &Filter::all());
        assert_eq!(view.total_instances, 0);
        assert_eq!(view.filtered_instances, 0);
        assert!(view.rows.is_empty());
    }
}
