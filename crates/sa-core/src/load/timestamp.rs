//! Timestamp normalization for both event tables.
//!
//! Every accepted representation is normalized to UTC. Values that carry an
//! offset are converted; naive values are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sa_config::TimestampSettings;

/// Offset-carrying layouts tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Naive date-time layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layout, read as midnight UTC.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses raw timestamp cells with the built-in layouts plus any
/// configured extras.
#[derive(Debug, Clone, Default)]
pub struct TimestampParser {
    extra_formats: Vec<String>,
}

impl TimestampParser {
    pub fn new(settings: &TimestampSettings) -> Self {
        TimestampParser {
            extra_formats: settings.extra_formats.clone(),
        }
    }

    /// Parse one cell. `None` for empty or unrecognized input.
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        if let Some(dt) = parse_date(s, DATE_FORMAT) {
            return Some(dt);
        }

        self.extra_formats
            .iter()
            .find_map(|fmt| parse_with_format(s, fmt))
    }
}

fn parse_date(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Try a user-supplied layout as offset-aware, then naive, then date-only.
fn parse_with_format(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
        return Some(naive.and_utc());
    }
    parse_date(s, fmt)
}
