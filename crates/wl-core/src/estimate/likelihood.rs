//! Per-observation log-likelihood under mixed censoring.
//!
//! ```text
//! Complete          ln f(t)            = ln β − β ln η + (β−1) ln t − (t/η)^β
//! RightCensored     ln S(t)            = −(t/η)^β
//! IntervalCensored  ln(S(L) − S(U))    mass floored at 1e-10
//! LeftCensored      ln F(t)            F clamped into [1e-10, 1 − 1e-10]
//! ```

use wl_math::{
    clamp_min_probability, clamp_open_unit, survival_difference, weibull_cdf,
    weibull_cum_hazard, weibull_log_pdf, PROBABILITY_FLOOR,
};

use crate::model::{CensoringKind, Observation};

/// Log-likelihood contribution of one unit of `obs` (the caller weights
/// by quantity).
///
/// Observations with a non-positive time contribute zero.
pub fn contribution(beta: f64, eta: f64, obs: &Observation) -> f64 {
    let t = obs.time;
    if t.is_nan() || t <= 0.0 {
        return 0.0;
    }
    match obs.kind {
        CensoringKind::Complete => weibull_log_pdf(t, beta, eta),
        CensoringKind::RightCensored => -weibull_cum_hazard(t, beta, eta),
        CensoringKind::IntervalCensored => interval_log_mass(beta, eta, obs.last_inspection_time, t),
        CensoringKind::LeftCensored => {
            clamp_open_unit(weibull_cdf(t, beta, eta), PROBABILITY_FLOOR).ln()
        }
    }
}

/// `ln P(L < T ≤ U)`. An inverted or negative interval has no mass and
/// takes the floor.
fn interval_log_mass(beta: f64, eta: f64, lower: f64, upper: f64) -> f64 {
    let mass = if upper > lower && lower >= 0.0 {
        survival_difference(
            weibull_cum_hazard(lower, beta, eta),
            weibull_cum_hazard(upper, beta, eta),
        )
    } else {
        0.0
    };
    clamp_min_probability(mass, PROBABILITY_FLOOR).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn complete_matches_closed_form() {
        let (beta, eta, t): (f64, f64, f64) = (2.0, 100.0, 50.0);
        let expected =
            beta.ln() - beta * eta.ln() + (beta - 1.0) * t.ln() - (t / eta).powf(beta);
        let got = contribution(beta, eta, &Observation::complete(t));
        assert!(approx_eq(got, expected, 1e-12), "got {got}, expected {expected}");
    }

    #[test]
    fn right_censored_is_negative_cumulative_hazard() {
        let got = contribution(2.0, 100.0, &Observation::right_censored(200.0));
        assert!(approx_eq(got, -4.0, 1e-12));
    }

    #[test]
    fn interval_is_log_survival_difference() {
        let (beta, eta): (f64, f64) = (1.5, 80.0);
        let s = |t: f64| (-(t / eta).powf(beta)).exp();
        let expected = (s(40.0) - s(90.0)).ln();
        let got = contribution(beta, eta, &Observation::interval(40.0, 90.0));
        assert!(approx_eq(got, expected, 1e-12));
    }

    #[test]
    fn interval_from_zero_equals_left_censored() {
        let (beta, eta) = (2.3, 150.0);
        let a = contribution(beta, eta, &Observation::interval(0.0, 60.0));
        let b = contribution(beta, eta, &Observation::left_censored(60.0));
        assert!(approx_eq(a, b, 1e-12));
    }

    #[test]
    fn inverted_interval_takes_the_floor() {
        let got = contribution(2.0, 100.0, &Observation::interval(50.0, 40.0));
        assert_eq!(got, PROBABILITY_FLOOR.ln());
        let equal = contribution(2.0, 100.0, &Observation::interval(40.0, 40.0));
        assert_eq!(equal, PROBABILITY_FLOOR.ln());
    }

    #[test]
    fn negative_lower_bound_takes_the_floor() {
        let got = contribution(2.0, 100.0, &Observation::interval(-5.0, 40.0));
        assert_eq!(got, PROBABILITY_FLOOR.ln());
    }

    #[test]
    fn far_tail_interval_stays_finite() {
        let got = contribution(8.0, 10.0, &Observation::interval(500.0, 600.0));
        assert!(got.is_finite());
        assert_eq!(got, PROBABILITY_FLOOR.ln());
    }

    #[test]
    fn left_censored_is_clamped_both_ways() {
        // F(t) rounds to 1 far beyond the scale.
        let high = contribution(5.0, 1.0, &Observation::left_censored(1e3));
        assert!(approx_eq(high, (1.0 - PROBABILITY_FLOOR).ln(), 1e-15));
        // F(t) underflows far below the scale.
        let low = contribution(10.0, 1e6, &Observation::left_censored(1.0));
        assert_eq!(low, PROBABILITY_FLOOR.ln());
    }

    #[test]
    fn non_positive_time_contributes_nothing() {
        for obs in [
            Observation::complete(0.0),
            Observation::right_censored(-1.0),
            Observation::interval(0.0, 0.0),
            Observation::left_censored(f64::NAN),
        ] {
            assert_eq!(contribution(2.0, 100.0, &obs), 0.0);
        }
    }
}
