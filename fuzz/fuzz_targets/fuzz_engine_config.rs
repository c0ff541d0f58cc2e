//! Fuzz target for engine configuration parsing and validation.
//!
//! Arbitrary bytes must never panic the JSON or TOML parser, and any config
//! that parses must validate without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wl_config::{validate_engine_config, EngineConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let parsed = [EngineConfig::from_json_str(text), EngineConfig::from_toml_str(text)];
    for config in parsed.into_iter().flatten() {
        let _ = validate_engine_config(&config);
    }
});
