//! Weibull life analysis under mixed censoring.
//!
//! Fits the two-parameter Weibull distribution to test records that mix
//! exact failures with right-, interval- and left-censored observations:
//! - Multi-start Nelder–Mead maximum likelihood ([`estimate`])
//! - Life metrics, probability-plot R², confidence bounds
//! - Per-group and batch analysis with structured results ([`analysis`])
//! - Record loading, config resolution, logging and report rendering
//!
//! The binary entry point is in `main.rs`.

pub mod analysis;
pub mod config;
pub mod estimate;
pub mod exit_codes;
pub mod input;
pub mod logging;
pub mod model;
pub mod output;

pub use analysis::{Analyzer, BatchReport};
pub use estimate::{EstimationError, FittedParameters, MultiStartEstimator};
pub use model::{AnalysisResult, CensoringKind, GroupKey, Observation, ObservationGroup};
