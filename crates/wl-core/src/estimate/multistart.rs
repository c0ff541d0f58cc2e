//! Multi-start maximum-likelihood estimation of `(β, η)`.
//!
//! The initial guess comes from the log of the pseudo failure times:
//! `β₀ = clamp(1 / sd(ln t), 0.5, 4)`, `η₀ = exp(mean(ln t))`. The
//! configured start points perturb that guess, a simplex search runs from
//! each, and the lowest feasible objective wins. Ties go to the earliest
//! start, so sequential and parallel runs select the same restart.

use serde::Serialize;
use std::thread;
use tracing::{debug, error};
use wl_config::{EngineConfig, RestartParams};
use wl_math::{mean, population_std_dev};

use super::objective::Objective;
use super::simplex::{NelderMead, SimplexOutcome};
use super::EstimationError;
use crate::logging::event_names;
use crate::model::Observation;

/// Best-fit parameters of one estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedParameters {
    /// Shape β.
    pub beta: f64,
    /// Scale η.
    pub eta: f64,
    /// Objective value at the optimum.
    pub neg_log_likelihood: f64,
    /// Index of the winning start point.
    pub start_index: usize,
    pub iterations: usize,
    pub converged: bool,
}

/// Data-driven starting guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InitialGuess {
    pub beta: f64,
    pub eta: f64,
    pub mean_log: f64,
    /// Standard deviation of log times after flooring.
    pub std_log: f64,
    /// Number of pseudo failure times used.
    pub sample_size: usize,
}

/// Result of one restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestartOutcome {
    pub index: usize,
    pub start: [f64; 2],
    pub outcome: SimplexOutcome,
}

/// Multi-start estimator; the entry point of the estimation engine.
#[derive(Debug, Clone)]
pub struct MultiStartEstimator {
    config: EngineConfig,
    simplex: NelderMead,
}

impl Default for MultiStartEstimator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MultiStartEstimator {
    pub fn new(config: EngineConfig) -> Self {
        let simplex = NelderMead::new(config.simplex.clone());
        Self { config, simplex }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Quantity-weighted count of observations that bound a failure.
    pub fn effective_failures(observations: &[Observation]) -> f64 {
        observations
            .iter()
            .filter(|obs| obs.kind.is_failure())
            .map(|obs| f64::from(obs.quantity))
            .sum()
    }

    /// Pseudo failure times, one per record. Non-positive or non-finite
    /// times are left out since they have no logarithm.
    pub fn pseudo_failure_times(observations: &[Observation]) -> Vec<f64> {
        observations
            .iter()
            .filter_map(Observation::pseudo_failure_time)
            .filter(|t| t.is_finite() && *t > 0.0)
            .collect()
    }

    /// Validate the data and derive the starting guess.
    pub fn initial_guess(&self, observations: &[Observation]) -> Result<InitialGuess, EstimationError> {
        let restarts = &self.config.restarts;

        let effective = Self::effective_failures(observations);
        if effective < restarts.min_effective_failures {
            return Err(EstimationError::InsufficientData {
                effective_failures: effective,
                required: restarts.min_effective_failures,
            });
        }

        let times = Self::pseudo_failure_times(observations);
        if times.len() < restarts.min_pseudo_times {
            return Err(EstimationError::NoValidFailureData {
                found: times.len(),
                required: restarts.min_pseudo_times,
            });
        }

        Ok(guess_from_times(&times, restarts))
    }

    /// Concrete start points for a guess, in configured order.
    pub fn start_points(&self, guess: &InitialGuess) -> Vec<[f64; 2]> {
        self.config
            .restarts
            .starts
            .iter()
            .map(|s| s.resolve(guess.beta, guess.eta))
            .collect()
    }

    /// Run every restart and return all outcomes in start order.
    pub fn run_restarts(&self, observations: &[Observation], starts: &[[f64; 2]]) -> Vec<Option<RestartOutcome>> {
        let objective = Objective::new(observations, &self.config.search);
        let run = |index: usize, start: [f64; 2]| RestartOutcome {
            index,
            start,
            outcome: self.simplex.minimize(|p| objective.at(p), start),
        };

        if !self.config.restarts.parallel || starts.len() < 2 {
            return starts
                .iter()
                .enumerate()
                .map(|(i, &s)| Some(run(i, s)))
                .collect();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = starts
                .iter()
                .enumerate()
                .map(|(i, &s)| scope.spawn(move || run(i, s)))
                .collect();

            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(outcome) => Some(outcome),
                    Err(_) => {
                        error!("restart thread panicked");
                        None
                    }
                })
                .collect()
        })
    }

    /// Whether a simplex result is an acceptable estimate: β strictly
    /// inside the search bounds, η positive, and an objective that is finite
    /// and below the domain penalty. A restart that only reached penalized
    /// points never wins, even when no other restart is feasible.
    fn is_feasible(&self, outcome: &SimplexOutcome) -> bool {
        let [beta, eta] = outcome.point;
        let search = &self.config.search;
        beta > search.beta_min
            && beta < search.beta_max
            && eta > 0.0
            && outcome.value.is_finite()
            && outcome.value < search.penalty
    }

    /// Lowest objective among feasible restarts (see `is_feasible`, which
    /// also rejects non-finite and penalized values); the first index wins
    /// ties.
    pub fn select_best(&self, outcomes: &[Option<RestartOutcome>]) -> Option<RestartOutcome> {
        let mut best: Option<RestartOutcome> = None;
        for candidate in outcomes.iter().flatten() {
            if !self.is_feasible(&candidate.outcome) {
                continue;
            }
            let better = match &best {
                Some(current) => candidate.outcome.value < current.outcome.value,
                None => true,
            };
            if better {
                best = Some(*candidate);
            }
        }
        best
    }

    /// Estimate `(β, η)` for one group of observations.
    pub fn estimate(&self, observations: &[Observation]) -> Result<FittedParameters, EstimationError> {
        let guess = self.initial_guess(observations)?;
        let starts = self.start_points(&guess);
        debug!(
            event = event_names::ESTIMATE_INITIAL_GUESS,
            beta0 = guess.beta,
            eta0 = guess.eta,
            std_log = guess.std_log,
            starts = starts.len(),
            "initial guess"
        );

        let outcomes = self.run_restarts(observations, &starts);
        for r in outcomes.iter().flatten() {
            debug!(
                event = event_names::ESTIMATE_RESTART_DONE,
                index = r.index,
                beta = r.outcome.point[0],
                eta = r.outcome.point[1],
                nll = r.outcome.value,
                iterations = r.outcome.iterations,
                converged = r.outcome.converged,
                "restart finished"
            );
        }

        let best = self
            .select_best(&outcomes)
            .ok_or(EstimationError::OptimizationFailed {
                starts: starts.len(),
            })?;

        debug!(
            event = event_names::ESTIMATE_SELECTED,
            index = best.index,
            beta = best.outcome.point[0],
            eta = best.outcome.point[1],
            nll = best.outcome.value,
            "selected restart"
        );

        Ok(FittedParameters {
            beta: best.outcome.point[0],
            eta: best.outcome.point[1],
            neg_log_likelihood: best.outcome.value,
            start_index: best.index,
            iterations: best.outcome.iterations,
            converged: best.outcome.converged,
        })
    }
}

fn guess_from_times(times: &[f64], restarts: &RestartParams) -> InitialGuess {
    let logs: Vec<f64> = times.iter().map(|t| t.ln()).collect();
    let mean_log = mean(&logs);
    let mut std_log = population_std_dev(&logs);
    if !(std_log >= restarts.std_log_floor) {
        std_log = restarts.std_log_fallback;
    }
    InitialGuess {
        beta: (1.0 / std_log).clamp(restarts.beta_guess_min, restarts.beta_guess_max),
        eta: mean_log.exp(),
        mean_log,
        std_log,
        sample_size: times.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CensoringKind;

    fn scenario_a() -> Vec<Observation> {
        (0..10)
            .map(|i| Observation::complete(100.0 + 20.0 * i as f64))
            .collect()
    }

    #[test]
    fn effective_failures_exclude_right_censoring() {
        let obs = vec![
            Observation::complete(10.0).with_quantity(2),
            Observation::right_censored(50.0).with_quantity(10),
            Observation::interval(5.0, 15.0),
            Observation::left_censored(3.0),
        ];
        assert_eq!(MultiStartEstimator::effective_failures(&obs), 4.0);
    }

    #[test]
    fn pseudo_times_use_interval_midpoints() {
        let obs = vec![
            Observation::complete(10.0),
            Observation::right_censored(50.0),
            Observation::interval(20.0, 40.0),
            Observation::left_censored(3.0),
        ];
        assert_eq!(
            MultiStartEstimator::pseudo_failure_times(&obs),
            vec![10.0, 30.0, 3.0]
        );
    }

    #[test]
    fn insufficient_effective_failures() {
        let est = MultiStartEstimator::default();
        let err = est
            .estimate(&[Observation::right_censored(500.0)])
            .unwrap_err();
        assert!(matches!(err, EstimationError::InsufficientData { .. }));
        assert!(err.to_string().contains("insufficient effective failures"));
    }

    #[test]
    fn quantity_can_satisfy_effective_failures_but_not_pseudo_times() {
        // Two units in one record: enough failures, one pseudo time.
        let est = MultiStartEstimator::default();
        let err = est
            .estimate(&[Observation::complete(100.0).with_quantity(2)])
            .unwrap_err();
        assert!(matches!(err, EstimationError::NoValidFailureData { .. }));
        assert!(err.to_string().contains("no valid failure data"));
    }

    #[test]
    fn degenerate_times_use_fallback_spread() {
        let est = MultiStartEstimator::default();
        let obs = vec![Observation::complete(50.0); 4];
        let guess = est.initial_guess(&obs).unwrap();
        assert_eq!(guess.std_log, 0.5);
        assert_eq!(guess.beta, 2.0);
        assert!((guess.eta - 50.0).abs() < 1e-9);
    }

    #[test]
    fn guess_is_clamped() {
        let restarts = RestartParams::default();
        // Huge spread → 1/sd below the lower clamp.
        let wide = guess_from_times(&[1.0, 1e6], &restarts);
        assert_eq!(wide.beta, 0.5);
        // Tight spread (but above the floor) → above the upper clamp.
        let tight = guess_from_times(&[100.0, 103.0], &restarts);
        assert_eq!(tight.beta, 4.0);
    }

    #[test]
    fn seven_default_start_points() {
        let est = MultiStartEstimator::default();
        let guess = est.initial_guess(&scenario_a()).unwrap();
        let starts = est.start_points(&guess);
        assert_eq!(starts.len(), 7);
        assert_eq!(starts[0], [guess.beta, guess.eta]);
        assert_eq!(starts[3], [1.0, guess.eta]);
        assert_eq!(starts[4], [2.0, guess.eta]);
    }

    #[test]
    fn scenario_a_recovers_parameters() {
        let fit = MultiStartEstimator::default().estimate(&scenario_a()).unwrap();
        assert!((2.0..=6.0).contains(&fit.beta), "beta = {}", fit.beta);
        assert!((180.0..=220.0).contains(&fit.eta), "eta = {}", fit.eta);
        assert!((fit.beta - 3.764_694).abs() < 5e-3, "beta = {}", fit.beta);
        assert!((fit.eta - 211.020).abs() < 0.05, "eta = {}", fit.eta);
        assert!((fit.neg_log_likelihood - 54.545_492).abs() < 1e-5);
        assert!(fit.start_index < 7);
    }

    #[test]
    fn parallel_restarts_select_the_same_fit() {
        let obs = vec![
            Observation::complete(100.0),
            Observation::complete(150.0),
            Observation::complete(200.0),
            Observation::right_censored(320.0),
            Observation::interval(100.0, 150.0),
            Observation::left_censored(80.0),
        ];
        let sequential = MultiStartEstimator::default().estimate(&obs).unwrap();

        let mut config = EngineConfig::default();
        config.restarts.parallel = true;
        let parallel = MultiStartEstimator::new(config).estimate(&obs).unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn ties_go_to_the_first_start() {
        let est = MultiStartEstimator::default();
        let outcome = |index: usize, value: f64| {
            Some(RestartOutcome {
                index,
                start: [1.0, 1.0],
                outcome: SimplexOutcome {
                    point: [2.0, 100.0 + index as f64],
                    value,
                    iterations: 1,
                    evaluations: 3,
                    converged: true,
                },
            })
        };
        let outcomes = vec![outcome(0, 5.0), outcome(1, 3.0), outcome(2, 3.0), None];
        assert_eq!(est.select_best(&outcomes).unwrap().index, 1);
    }

    #[test]
    fn infeasible_outcomes_are_skipped() {
        let est = MultiStartEstimator::default();
        let make = |point: [f64; 2], value: f64| {
            Some(RestartOutcome {
                index: 0,
                start: point,
                outcome: SimplexOutcome {
                    point,
                    value,
                    iterations: 0,
                    evaluations: 3,
                    converged: false,
                },
            })
        };
        // β at the upper edge, β at the lower edge, penalty value, NaN value.
        let outcomes = vec![
            make([20.0, 10.0], 1.0),
            make([0.1, 10.0], 1.0),
            make([2.0, 10.0], 1e10),
            make([2.0, 10.0], f64::NAN),
        ];
        assert!(est.select_best(&outcomes).is_none());
    }

    #[test]
    fn kinds_without_failures_never_count() {
        let obs: Vec<Observation> = (1..=5)
            .map(|i| Observation::new(i as f64 * 10.0, CensoringKind::RightCensored))
            .collect();
        assert_eq!(MultiStartEstimator::effective_failures(&obs), 0.0);
        assert!(MultiStartEstimator::pseudo_failure_times(&obs).is_empty());
    }
}
