//! Per-group analysis results.

use serde::{Deserialize, Serialize};

use super::observation::{CensoringKind, Observation};
use crate::estimate::confidence::ConfidenceBounds;
use crate::estimate::metrics::LifeMetrics;
use crate::estimate::multistart::FittedParameters;
use crate::estimate::plot::ProbabilityPlot;

/// Identity of an analysis group (one equipment module, for example).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GroupKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: None,
            name: None,
        }
    }

    /// Best human-facing label: code, then name, then id.
    pub fn label(&self) -> &str {
        self.code
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// All observations of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationGroup {
    pub key: GroupKey,
    pub observations: Vec<Observation>,
}

/// Unit counts per censoring kind, summed by quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensoringCounts {
    pub total: u64,
    pub complete: u64,
    pub right_censored: u64,
    pub interval_censored: u64,
    pub left_censored: u64,
}

impl CensoringCounts {
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut counts = Self::default();
        for obs in observations {
            counts.add(obs.kind, u64::from(obs.quantity));
        }
        counts
    }

    fn add(&mut self, kind: CensoringKind, quantity: u64) {
        match kind {
            CensoringKind::Complete => self.complete += quantity,
            CensoringKind::RightCensored => self.right_censored += quantity,
            CensoringKind::IntervalCensored => self.interval_censored += quantity,
            CensoringKind::LeftCensored => self.left_censored += quantity,
        }
        self.total += quantity;
    }

    /// Units whose failure is bounded by the data (everything but
    /// right-censored survivors).
    pub fn effective_failures(&self) -> u64 {
        self.complete + self.interval_censored + self.left_censored
    }
}

/// Failure pattern implied by the shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Shape is undefined.
    Unknown,
    /// β < 1: decreasing failure rate (early failures).
    InfantMortality,
    /// β ≈ 1: constant failure rate.
    Random,
    /// β > 1: increasing failure rate.
    WearOut,
}

impl FailureMode {
    /// Half-width of the band around β = 1 treated as a constant rate.
    pub const RANDOM_BAND: f64 = 0.1;

    /// Classify a shape parameter. Rules are checked in order, so a β just
    /// below one is infant mortality rather than random.
    pub fn from_beta(beta: f64) -> Self {
        if beta.is_nan() {
            FailureMode::Unknown
        } else if beta < 1.0 {
            FailureMode::InfantMortality
        } else if (beta - 1.0).abs() < Self::RANDOM_BAND {
            FailureMode::Random
        } else {
            FailureMode::WearOut
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FailureMode::Unknown => "unknown",
            FailureMode::InfantMortality => "early failures (decreasing failure rate)",
            FailureMode::Random => "random failures (constant failure rate)",
            FailureMode::WearOut => "wear-out failures (increasing failure rate)",
        }
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Everything derived from a successful fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitSummary {
    pub parameters: FittedParameters,
    pub metrics: LifeMetrics,
    /// Probability-plot R²; zero with fewer than two plotted failures.
    pub r_squared: f64,
    pub confidence: ConfidenceBounds,
    pub failure_mode: FailureMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<ProbabilityPlot>,
}

/// Outcome of analyzing one group.
///
/// `fit` is populated only when `success` is true.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub group: GroupKey,
    pub success: bool,
    pub message: String,
    pub counts: CensoringCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitSummary>,
}

impl AnalysisResult {
    pub fn failed(group: GroupKey, counts: CensoringCounts, message: impl Into<String>) -> Self {
        Self {
            group,
            success: false,
            message: message.into(),
            counts,
            fit: None,
        }
    }
}
