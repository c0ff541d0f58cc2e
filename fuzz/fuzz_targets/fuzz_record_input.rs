//! Fuzz target for observation record parsing and grouping.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wl_core::input::{group_records, parse_records};

fuzz_target!(|data: &str| {
    if let Ok(records) = parse_records(data) {
        let _ = group_records(&records);
    }
});
