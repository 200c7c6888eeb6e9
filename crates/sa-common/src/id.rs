//! Instance identity types.
//!
//! An instance is identified only by the provider's instance id string; the
//! correlator joins the two event streams on exact equality of this value.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud instance identifier (e.g. `i-0abc123def4567890`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct InstanceId(pub String);

impl InstanceId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        InstanceId(id.into())
    }

    /// Borrow the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        InstanceId(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        InstanceId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_id_display() {
        assert_eq!(InstanceId::new("i-abc").to_string(), "i-abc");
    }

    #[test]
    fn instance_id_serializes_transparently() {
        let json = serde_json::to_string(&InstanceId::from("i-1")).unwrap();
        assert_eq!(json, "\"i-1\"");
    }

    #[test]
    fn instance_id_equality_is_exact() {
        assert_ne!(InstanceId::from("i-1"), InstanceId::from("I-1"));
        assert_ne!(InstanceId::from("i-1"), InstanceId::from("i-1 "));
    }
}
