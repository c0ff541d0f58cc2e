//! Reliability figures derived from fitted parameters.

use serde::Serialize;
use wl_math::{weibull_hazard, weibull_mean, weibull_quantile, weibull_survival};

/// Standard life metrics of a `Weibull(β, η)` population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifeMetrics {
    /// Mean time to failure `η Γ(1 + 1/β)`.
    pub mttf: f64,
    /// Median life `η (ln 2)^(1/β)`.
    pub median: f64,
    /// Time by which 10% have failed.
    pub b10: f64,
    /// Time by which 50% have failed (equals the median).
    pub b50: f64,
    /// Time by which 90% have failed.
    pub b90: f64,
}

impl LifeMetrics {
    pub fn from_parameters(beta: f64, eta: f64) -> Self {
        let inv_beta = 1.0 / beta;
        let median = eta * std::f64::consts::LN_2.powf(inv_beta);
        Self {
            mttf: weibull_mean(beta, eta),
            median,
            b10: eta * (10.0f64 / 9.0).ln().powf(inv_beta),
            b50: median,
            b90: eta * std::f64::consts::LN_10.powf(inv_beta),
        }
    }
}

/// B-life: the time by which a fraction `p` of the population has failed.
pub fn b_life(beta: f64, eta: f64, p: f64) -> f64 {
    weibull_quantile(p, beta, eta)
}

/// Reliability (survival probability) at time `t`.
pub fn reliability(beta: f64, eta: f64, t: f64) -> f64 {
    weibull_survival(t, beta, eta)
}

/// Instantaneous failure rate at time `t`.
pub fn hazard_rate(beta: f64, eta: f64, t: f64) -> f64 {
    weibull_hazard(t, beta, eta)
}
