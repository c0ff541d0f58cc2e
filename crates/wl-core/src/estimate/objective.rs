//! Negative log-likelihood objective over `(β, η)`.

use wl_config::SearchParams;

use super::likelihood::contribution;
use crate::model::Observation;

/// Quantity-weighted negative log-likelihood of one observation batch.
///
/// Outside the feasible domain `β ∈ (beta_min, beta_max]`, `η > 0`, and
/// whenever the sum is not finite, the value is the penalty constant so
/// that simplex comparisons stay well defined.
#[derive(Debug, Clone, Copy)]
pub struct Objective<'a> {
    observations: &'a [Observation],
    search: &'a SearchParams,
}

impl<'a> Objective<'a> {
    pub fn new(observations: &'a [Observation], search: &'a SearchParams) -> Self {
        Self {
            observations,
            search,
        }
    }

    pub fn penalty(&self) -> f64 {
        self.search.penalty
    }

    pub fn in_domain(&self, beta: f64, eta: f64) -> bool {
        beta > self.search.beta_min && beta <= self.search.beta_max && eta > 0.0
    }

    pub fn value(&self, beta: f64, eta: f64) -> f64 {
        if !self.in_domain(beta, eta) {
            return self.search.penalty;
        }
        let log_likelihood: f64 = self
            .observations
            .iter()
            .map(|obs| f64::from(obs.quantity) * contribution(beta, eta, obs))
            .sum();
        let nll = -log_likelihood;
        if nll.is_finite() {
            nll
        } else {
            self.search.penalty
        }
    }

    /// Value at a simplex vertex `[β, η]`.
    pub fn at(&self, point: [f64; 2]) -> f64 {
        self.value(point[0], point[1])
    }
}

/// Negative log-likelihood with the default search domain.
pub fn neg_log_likelihood(beta: f64, eta: f64, observations: &[Observation]) -> f64 {
    let search = SearchParams::default();
    Objective::new(observations, &search).value(beta, eta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wl_math::PROBABILITY_FLOOR;

    fn scenario_a() -> Vec<Observation> {
        (0..10)
            .map(|i| Observation::complete(100.0 + 20.0 * i as f64))
            .collect()
    }

    #[test]
    fn domain_edges_return_penalty() {
        let obs = scenario_a();
        assert_eq!(neg_log_likelihood(0.1, 200.0, &obs), 1e10);
        assert_eq!(neg_log_likelihood(0.05, 200.0, &obs), 1e10);
        assert_eq!(neg_log_likelihood(20.5, 200.0, &obs), 1e10);
        assert_eq!(neg_log_likelihood(2.0, 0.0, &obs), 1e10);
        assert_eq!(neg_log_likelihood(2.0, -5.0, &obs), 1e10);
        assert_eq!(neg_log_likelihood(f64::NAN, 200.0, &obs), 1e10);
        // β = 20 is inside the objective's domain.
        assert!(neg_log_likelihood(20.0, 200.0, &obs) < 1e10);
    }

    #[test]
    fn quantity_weights_the_sum() {
        let single = vec![Observation::complete(120.0)];
        let triple = vec![Observation::complete(120.0).with_quantity(3)];
        let one = neg_log_likelihood(2.0, 150.0, &single);
        let three = neg_log_likelihood(2.0, 150.0, &triple);
        assert!((three - 3.0 * one).abs() < 1e-12);
    }

    #[test]
    fn scenario_a_value_at_optimum() {
        let nll = neg_log_likelihood(3.764_693_7, 211.020_055, &scenario_a());
        assert!((nll - 54.545_492).abs() < 1e-4, "nll = {nll}");
    }

    #[test]
    fn inverted_interval_keeps_objective_finite() {
        let obs = vec![Observation::interval(50.0, 40.0)];
        let nll = neg_log_likelihood(2.0, 100.0, &obs);
        assert!(nll.is_finite());
        assert!((nll - (-PROBABILITY_FLOOR.ln())).abs() < 1e-9);
        assert!(nll < 1e10);
    }

    #[test]
    fn custom_domain_is_respected() {
        let search = SearchParams {
            beta_min: 1.0,
            beta_max: 3.0,
            penalty: 42.0,
        };
        let obs = scenario_a();
        let objective = Objective::new(&obs, &search);
        assert_eq!(objective.value(3.5, 200.0), 42.0);
        assert_eq!(objective.at([0.9, 200.0]), 42.0);
        assert!(objective.in_domain(2.0, 200.0));
        assert_eq!(objective.penalty(), 42.0);
    }
}
