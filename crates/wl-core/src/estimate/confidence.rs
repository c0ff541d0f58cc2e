//! Normal-approximation confidence bounds on `(β, η)`.
//!
//! Asymptotic variances scale with the effective sample size n:
//! `Var(β) ≈ 1.109 β² / n`, `Var(η) ≈ 0.608 η² / n`, and the bounds are
//! `θ ± z √Var(θ)` with the lower bounds floored.

use serde::Serialize;
use wl_config::ConfidenceParams;

/// Two-sided bounds; all NaN when the sample is too small.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceBounds {
    pub lower_beta: f64,
    pub upper_beta: f64,
    pub lower_eta: f64,
    pub upper_eta: f64,
}

impl ConfidenceBounds {
    pub fn undefined() -> Self {
        Self {
            lower_beta: f64::NAN,
            upper_beta: f64::NAN,
            lower_eta: f64::NAN,
            upper_eta: f64::NAN,
        }
    }

    pub fn is_defined(&self) -> bool {
        !(self.lower_beta.is_nan()
            || self.upper_beta.is_nan()
            || self.lower_eta.is_nan()
            || self.upper_eta.is_nan())
    }

    /// Bounds for `(β, η)` from `effective_n` failures.
    pub fn compute(beta: f64, eta: f64, effective_n: u64, params: &ConfidenceParams) -> Self {
        if effective_n < params.min_effective_n || effective_n == 0 {
            return Self::undefined();
        }
        let n = effective_n as f64;
        let se_beta = (params.beta_variance_factor * beta * beta / n).sqrt();
        let se_eta = (params.eta_variance_factor * eta * eta / n).sqrt();
        Self {
            lower_beta: (beta - params.z * se_beta).max(params.beta_floor),
            upper_beta: beta + params.z * se_beta,
            lower_eta: (eta - params.z * se_eta).max(params.eta_floor),
            upper_eta: eta + params.z * se_eta,
        }
    }
}
