//! Fuzz target for config.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sa_config::{validate_config, AnalysisConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing and validation must return errors, never panic.
    if let Ok(config) = AnalysisConfig::from_json(text) {
        let _ = validate_config(&config);
    }
});
