//! Fuzz target for timestamp normalization, including user layouts.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sa_config::TimestampSettings;
use sa_core::load::TimestampParser;

fuzz_target!(|input: (String, String)| {
    let (raw, layout) = input;
    let parser = TimestampParser::new(&TimestampSettings {
        extra_formats: vec![layout],
    });
    let _ = parser.parse(&raw);
});
