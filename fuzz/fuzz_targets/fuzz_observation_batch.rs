//! Fuzz target for estimation over arbitrary observation batches.
//!
//! The objective must stay finite for in-domain parameters, and a full
//! group analysis must never panic whatever the censoring mix.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wl_core::analysis::Analyzer;
use wl_core::estimate::neg_log_likelihood;
use wl_core::model::{CensoringKind, GroupKey, Observation};

#[derive(Debug, Arbitrary)]
struct RawObservation {
    time: f64,
    lower: f64,
    kind: u8,
    quantity: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    observations: Vec<RawObservation>,
    beta: f64,
    eta: f64,
}

fuzz_target!(|input: Input| {
    let observations: Vec<Observation> = input
        .observations
        .iter()
        .take(64)
        .map(|raw| Observation {
            time: raw.time,
            last_inspection_time: raw.lower,
            kind: CensoringKind::ALL[usize::from(raw.kind % 4)],
            quantity: u32::from(raw.quantity.max(1)),
        })
        .collect();

    let nll = neg_log_likelihood(input.beta, input.eta, &observations);
    assert!(nll.is_finite());

    let _ = Analyzer::default().analyze(&GroupKey::new("fuzz"), &observations);
});
