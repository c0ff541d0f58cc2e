//! Property-based tests for estimation diagnostics.

use proptest::prelude::*;
use wl_config::ConfidenceParams;
use wl_core::estimate::{
    b_life, neg_log_likelihood, r_squared, reliability, ConfidenceBounds, LifeMetrics,
    ProbabilityPlot,
};
use wl_core::model::{CensoringKind, Observation};

fn kind_strategy() -> impl Strategy<Value = CensoringKind> {
    prop_oneof![
        Just(CensoringKind::Complete),
        Just(CensoringKind::RightCensored),
        Just(CensoringKind::IntervalCensored),
        Just(CensoringKind::LeftCensored),
    ]
}

/// Arbitrary observations, including inverted intervals and zero lower bounds.
fn observation_strategy() -> impl Strategy<Value = Observation> {
    (0.01..5_000.0f64, 0.0..5_000.0f64, kind_strategy(), 1u32..5).prop_map(
        |(time, lower, kind, quantity)| Observation {
            time,
            last_inspection_time: if kind == CensoringKind::IntervalCensored { lower } else { 0.0 },
            kind,
            quantity,
        },
    )
}

// ============================================================================
// Life metrics
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// B10 ≤ B50 ≤ B90, all non-negative.
    #[test]
    fn b_lives_are_ordered(beta in 0.11..20.0f64, eta in 0.01..1e6f64) {
        let m = LifeMetrics::from_parameters(beta, eta);
        prop_assert!(m.b10 >= 0.0 && m.mttf >= 0.0 && m.median >= 0.0);
        prop_assert!(m.b10 <= m.b50 && m.b50 <= m.b90, "{:?}", m);
    }

    /// R(B_p) = 1 − p.
    #[test]
    fn reliability_inverts_b_life(beta in 0.2..10.0f64, eta in 1.0..1e4f64, p in 0.01..0.99f64) {
        let t = b_life(beta, eta, p);
        prop_assert!((reliability(beta, eta, t) - (1.0 - p)).abs() < 1e-9);
    }
}

// ============================================================================
// Goodness of fit
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn r_squared_is_a_fraction(obs in prop::collection::vec(observation_strategy(), 0..40)) {
        let r2 = r_squared(&obs);
        prop_assert!((0.0..=1.0).contains(&r2), "r2 {}", r2);
    }

    #[test]
    fn r_squared_zero_below_two_points(time in 0.1..1e4f64, censored in prop::collection::vec(1.0..1e4f64, 0..10)) {
        let mut obs = vec![Observation::complete(time)];
        obs.extend(censored.into_iter().map(Observation::right_censored));
        prop_assert_eq!(r_squared(&obs), 0.0);
    }

    /// One plot point per record with a positive plotting time.
    #[test]
    fn plot_covers_every_record(obs in prop::collection::vec(observation_strategy(), 0..40)) {
        let plot = ProbabilityPlot::build(&obs, 2.0, 1000.0);
        prop_assert_eq!(plot.points.len(), obs.len());
        prop_assert!(plot.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

// ============================================================================
// Confidence bounds
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn bounds_bracket_the_estimate(beta in 0.11..20.0f64, eta in 1.0..1e6f64, n in 3u64..10_000) {
        let ci = ConfidenceBounds::compute(beta, eta, n, &ConfidenceParams::default());
        prop_assert!(ci.is_defined());
        prop_assert!(ci.lower_beta <= beta && beta <= ci.upper_beta, "{:?}", ci);
        prop_assert!(ci.lower_eta <= eta && eta <= ci.upper_eta, "{:?}", ci);
    }

    #[test]
    fn bounds_undefined_below_three(beta in 0.11..20.0f64, eta in 1.0..1e6f64, n in 0u64..3) {
        let ci = ConfidenceBounds::compute(beta, eta, n, &ConfidenceParams::default());
        prop_assert!(!ci.is_defined());
    }
}

// ============================================================================
// Objective
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Densities can exceed 1, so the sign varies; the value never overflows.
    #[test]
    fn objective_is_always_finite(
        obs in prop::collection::vec(observation_strategy(), 1..30),
        beta in 0.11..20.0f64,
        eta in 0.01..1e5f64,
    ) {
        prop_assert!(neg_log_likelihood(beta, eta, &obs).is_finite());
    }

    #[test]
    fn objective_is_penalized_outside_domain(
        obs in prop::collection::vec(observation_strategy(), 1..10),
        beta in -5.0..0.1f64,
        eta in 1.0..1e3f64,
    ) {
        prop_assert_eq!(neg_log_likelihood(beta, eta, &obs), 1e10);
        prop_assert_eq!(neg_log_likelihood(2.0, -eta, &obs), 1e10);
    }
}
