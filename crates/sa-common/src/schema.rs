//! Report schema versioning.

/// Schema version of the analysis report payload.
///
/// Bumped whenever a field is renamed or removed from a report table.
pub const SCHEMA_VERSION: &str = "1.0.0";
