//! Two-parameter Weibull distribution functions.
//!
//! # Parameterization
//!
//! `Weibull(β, η)` with shape β > 0 and scale η > 0:
//!
//! ```text
//! f(t) = (β/η) (t/η)^(β-1) exp(-(t/η)^β)
//! F(t) = 1 - exp(-(t/η)^β)
//! H(t) = (t/η)^β                (cumulative hazard)
//! Q(p) = η (-ln(1-p))^(1/β)     (quantile)
//! ```
//!
//! Invalid parameters (non-positive or NaN) yield NaN everywhere.

use super::gamma::gamma;
use super::stable::one_minus_exp_neg;

fn invalid_params(beta: f64, eta: f64) -> bool {
    beta.is_nan() || eta.is_nan() || beta <= 0.0 || eta <= 0.0
}

/// Cumulative hazard `H(t) = (t/η)^β`; zero for `t <= 0`.
pub fn weibull_cum_hazard(t: f64, beta: f64, eta: f64) -> f64 {
    if t.is_nan() || invalid_params(beta, eta) {
        return f64::NAN;
    }
    if t <= 0.0 {
        return 0.0;
    }
    (t / eta).powf(beta)
}

/// Log density `ln f(t)`.
pub fn weibull_log_pdf(t: f64, beta: f64, eta: f64) -> f64 {
    if t.is_nan() || invalid_params(beta, eta) {
        return f64::NAN;
    }
    if t < 0.0 {
        return f64::NEG_INFINITY;
    }
    if t == 0.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        } else if beta == 1.0 {
            return -eta.ln();
        } else {
            return f64::NEG_INFINITY;
        }
    }
    beta.ln() - beta * eta.ln() + (beta - 1.0) * t.ln() - (t / eta).powf(beta)
}

/// CDF `F(t)`.
pub fn weibull_cdf(t: f64, beta: f64, eta: f64) -> f64 {
    let h = weibull_cum_hazard(t, beta, eta);
    if h.is_nan() {
        return f64::NAN;
    }
    one_minus_exp_neg(h)
}

/// Survival (reliability) function `R(t) = 1 - F(t)`.
pub fn weibull_survival(t: f64, beta: f64, eta: f64) -> f64 {
    let h = weibull_cum_hazard(t, beta, eta);
    if h.is_nan() {
        return f64::NAN;
    }
    (-h).exp()
}

/// Instantaneous hazard rate `h(t) = (β/η)(t/η)^(β-1)`.
pub fn weibull_hazard(t: f64, beta: f64, eta: f64) -> f64 {
    if t.is_nan() || invalid_params(beta, eta) {
        return f64::NAN;
    }
    if t < 0.0 {
        return 0.0;
    }
    if t == 0.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        } else if beta == 1.0 {
            return 1.0 / eta;
        } else {
            return 0.0;
        }
    }
    (beta / eta) * (t / eta).powf(beta - 1.0)
}

/// Quantile `Q(p)`: the time by which a fraction `p` has failed.
///
/// Returns NaN for `p` outside `[0, 1]`; `Q(0) = 0`, `Q(1) = +∞`.
pub fn weibull_quantile(p: f64, beta: f64, eta: f64) -> f64 {
    if p.is_nan() || invalid_params(beta, eta) || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return 0.0;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    eta * (-(-p).ln_1p()).powf(1.0 / beta)
}

/// Mean `E[T] = η Γ(1 + 1/β)`.
pub fn weibull_mean(beta: f64, eta: f64) -> f64 {
    if invalid_params(beta, eta) {
        return f64::NAN;
    }
    eta * gamma(1.0 + 1.0 / beta)
}
