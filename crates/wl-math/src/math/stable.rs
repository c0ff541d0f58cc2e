//! Numerically stable primitives for censored-likelihood terms.
//!
//! Interval and left-censored observations contribute `ln` of a
//! probability mass that can underflow to zero (or round to one) far from
//! the optimum. These helpers keep those terms finite.

/// Smallest probability mass a censored observation may contribute.
pub const PROBABILITY_FLOOR: f64 = 1e-10;

/// Clamp a probability from below. NaN propagates.
pub fn clamp_min_probability(p: f64, floor: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p < floor {
        floor
    } else {
        p
    }
}

/// Clamp a probability into `[eps, 1 - eps]`. NaN propagates.
pub fn clamp_open_unit(p: f64, eps: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    p.clamp(eps, 1.0 - eps)
}

/// `1 - exp(-x)` without cancellation for small `x`.
pub fn one_minus_exp_neg(x: f64) -> f64 {
    -(-x).exp_m1()
}

/// `exp(-a) - exp(-b)`, the mass of an interval in cumulative-hazard form.
///
/// Computed as `exp(-a) * (1 - exp(-(b - a)))`, which keeps precision when
/// both bounds sit deep in the tail. Non-positive when `b <= a`.
pub fn survival_difference(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == f64::INFINITY {
        return 0.0;
    }
    (-a).exp() * one_minus_exp_neg(b - a)
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
    fn clamp_min_probability_floors_zero_and_negative() {
        assert_eq!(clamp_min_probability(0.0, PROBABILITY_FLOOR), PROBABILITY_FLOOR);
        assert_eq!(clamp_min_probability(-0.3, PROBABILITY_FLOOR), PROBABILITY_FLOOR);
        assert_eq!(clamp_min_probability(1e-12, PROBABILITY_FLOOR), PROBABILITY_FLOOR);
        assert_eq!(clamp_min_probability(0.25, PROBABILITY_FLOOR), 0.25);
        assert!(clamp_min_probability(f64::NAN, PROBABILITY_FLOOR).is_nan());
    }

    #[test]
    fn clamp_open_unit_bounds() {
        assert_eq!(clamp_open_unit(0.0, PROBABILITY_FLOOR), PROBABILITY_FLOOR);
        assert_eq!(clamp_open_unit(1.0, PROBABILITY_FLOOR), 1.0 - PROBABILITY_FLOOR);
        assert_eq!(clamp_open_unit(0.5, PROBABILITY_FLOOR), 0.5);
    }

    #[test]
    fn one_minus_exp_neg_small_argument() {
        let x = 1e-14;
        assert!(approx_eq(one_minus_exp_neg(x), x, 1e-27));
        assert!(approx_eq(one_minus_exp_neg(1.0), 1.0 - (-1.0f64).exp(), 1e-15));
    }

    #[test]
    fn survival_difference_matches_naive() {
        let (a, b): (f64, f64) = (0.4, 1.7);
        let naive = (-a).exp() - (-b).exp();
        assert!(approx_eq(survival_difference(a, b), naive, 1e-15));
    }

    #[test]
    fn survival_difference_inverted_interval_is_non_positive() {
        assert!(survival_difference(2.0, 1.0) < 0.0);
        assert_eq!(survival_difference(1.0, 1.0), 0.0);
        assert_eq!(survival_difference(f64::INFINITY, f64::INFINITY), 0.0);
    }
}
