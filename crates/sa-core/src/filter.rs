//! Filter view over correlated instances.
//!
//! Filtering never touches the correlated set; it returns a fresh subset, so
//! the same report can be filtered repeatedly with different predicates.

use sa_common::{Category, CorrelatedInstance};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Caller-selected type and zone predicates.
///
/// `None` on either side means "every observed value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_types: Option<BTreeSet<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<BTreeSet<Category>>,
}

impl Filter {
    pub fn all() -> Self {
        Filter::default()
    }

    pub fn with_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        self.instance_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_zones<I>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        self.availability_zones = Some(zones.into_iter().collect());
        self
    }

    /// Whether neither predicate is restricted.
    pub fn is_unrestricted(&self) -> bool {
        self.instance_types.is_none() && self.availability_zones.is_none()
    }

    /// Resolve both predicates to concrete sets against `rows`.
    pub fn resolve(&self, rows: &[CorrelatedInstance]) -> (BTreeSet<Category>, BTreeSet<Category>) {
        let types = self
            .instance_types
            .clone()
            .unwrap_or_else(|| observed_types(rows));
        let zones = self
            .availability_zones
            .clone()
            .unwrap_or_else(|| observed_zones(rows));
        (types, zones)
    }

    pub fn apply(&self, rows: &[CorrelatedInstance]) -> Vec<CorrelatedInstance> {
        let (types, zones) = self.resolve(rows);
        filter(rows, &types, &zones)
    }
}

/// Distinct instance types among `rows`.
pub fn observed_types(rows: &[CorrelatedInstance]) -> BTreeSet<Category> {
    rows.iter().map(|r| r.instance_type.clone()).collect()
}

/// Distinct availability zones among `rows`.
pub fn observed_zones(rows: &[CorrelatedInstance]) -> BTreeSet<Category> {
    rows.iter().map(|r| r.availability_zone.clone()).collect()
}

/// Rows whose type is in `allowed_types` and whose zone is in `allowed_zones`,
/// in input order.
pub fn filter(
    rows: &[CorrelatedInstance],
    allowed_types: &BTreeSet<Category>,
    allowed_zones: &BTreeSet<Category>,
) -> Vec<CorrelatedInstance> {
    rows.iter()
        .filter(|r| allowed_types.contains(&r.instance_type))
        .filter(|r| allowed_zones.contains(&r.availability_zone))
        .cloned()
        .collect()
}
