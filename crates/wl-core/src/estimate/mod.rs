//! Maximum-likelihood estimation of the two-parameter Weibull distribution
//! under mixed censoring.
//!
//! - [`likelihood`]: per-observation log-likelihood contributions
//! - [`objective`]: the penalized negative log-likelihood surface
//! - [`simplex`]: the Nelder–Mead minimizer
//! - [`multistart`]: initial guess, restarts and selection of the best fit
//! - [`metrics`], [`fit`], [`confidence`], [`plot`]: post-fit diagnostics

pub mod confidence;
pub mod fit;
pub mod likelihood;
pub mod metrics;
pub mod multistart;
pub mod objective;
pub mod plot;
pub mod simplex;

pub use confidence::ConfidenceBounds;
pub use fit::r_squared;
pub use likelihood::contribution;
pub use metrics::{b_life, hazard_rate, reliability, LifeMetrics};
pub use multistart::{FittedParameters, InitialGuess, MultiStartEstimator, RestartOutcome};
pub use objective::{neg_log_likelihood, Objective};
pub use plot::{FittedLine, PlotPoint, ProbabilityPlot};
pub use simplex::{NelderMead, SimplexOutcome};

use thiserror::Error;

/// Reasons an estimation can fail for a group.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    #[error("insufficient effective failures: {effective_failures} < {required}")]
    InsufficientData { effective_failures: f64, required: f64 },

    #[error("no valid failure data: {found} pseudo failure times, need {required}")]
    NoValidFailureData { found: usize, required: usize },

    #[error("optimization failed: no feasible result from {starts} starts")]
    OptimizationFailed { starts: usize },
}

impl EstimationError {
    pub fn code(&self) -> u32 {
        match self {
            EstimationError::InsufficientData { .. } => 40,
            EstimationError::NoValidFailureData { .. } => 41,
            EstimationError::OptimizationFailed { .. } => 42,
        }
    }
}
