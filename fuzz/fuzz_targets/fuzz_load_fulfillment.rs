//! Fuzz target for the fulfillment CSV loader.
//!
//! Arbitrary bytes must load or fail with a typed error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sa_config::FulfillmentColumns;
use sa_core::load::{load_fulfillments, TimestampParser};

fuzz_target!(|data: &[u8]| {
    let parser = TimestampParser::default();
    if let Ok(events) = load_fulfillments(data, &FulfillmentColumns::default(), &parser) {
        for event in &events {
            assert_ne!(event.instance_type.as_deref(), Some(""));
            assert_ne!(event.availability_zone.as_deref(), Some(""));
        }
    }
});
