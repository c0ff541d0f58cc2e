//! Pipeline stages and stable event names.
//!
//! Every structured log line carries an `event` field drawn from
//! [`event_names`] and, where it applies, a `stage` field.

use serde::{Deserialize, Serialize};

/// Stages of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading and grouping observations.
    Load,
    /// Multi-start parameter estimation.
    Estimate,
    /// Metrics, R² and confidence bounds.
    Diagnose,
    /// Rendering results.
    Report,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Estimate => "estimate",
            Stage::Diagnose => "diagnose",
            Stage::Report => "report",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard event names.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Load stage
    pub const INPUT_LOADED: &str = "input.loaded";
    pub const INPUT_RECORDS_DROPPED: &str = "input.records_dropped";
    pub const INPUT_ERROR: &str = "input.error";

    // Estimate stage
    pub const ESTIMATE_INITIAL_GUESS: &str = "estimate.initial_guess";
    pub const ESTIMATE_RESTART_DONE: &str = "estimate.restart_done";
    pub const ESTIMATE_SELECTED: &str = "estimate.selected";

    // Group analysis
    pub const ANALYSIS_STARTED: &str = "analysis.started";
    pub const ANALYSIS_FINISHED: &str = "analysis.finished";
    pub const ANALYSIS_GROUP_FAILED: &str = "analysis.group_failed";
    pub const BATCH_FINISHED: &str = "batch.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const INTERNAL_ERROR: &str = "internal_error";
}
