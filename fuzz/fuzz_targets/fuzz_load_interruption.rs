//! Fuzz target for the interruption CSV loader.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sa_config::InterruptionColumns;
use sa_core::load::{load_interruptions, TimestampParser};

fuzz_target!(|data: &[u8]| {
    let parser = TimestampParser::default();
    let _ = load_interruptions(data, &InterruptionColumns::default(), &parser);
});
