//! Domain types: observations, groups, and analysis results.

pub mod observation;
pub mod result;

pub use observation::{CensoringKind, Observation};
pub use result::{
    AnalysisResult, CensoringCounts, FailureMode, FitSummary, GroupKey, ObservationGroup,
};
