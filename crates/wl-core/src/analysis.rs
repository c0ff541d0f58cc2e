//! Group and batch analysis.
//!
//! [`Analyzer::analyze`] turns one group's observations into an
//! [`AnalysisResult`]; estimation failures become `success = false`
//! results, never errors. [`Analyzer::analyze_batch`] runs many groups,
//! `batch.max_parallel` at a time, and keeps input order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::thread;
use tracing::{debug, error, info, warn};

use wl_config::{ConfigPath, ConfigSnapshot, EngineConfig};

use crate::config::ResolvedConfig;
use crate::estimate::{r_squared, ConfidenceBounds, LifeMetrics, MultiStartEstimator, ProbabilityPlot};
use crate::logging::{event_names, Stage};
use crate::model::{
    AnalysisResult, CensoringCounts, FailureMode, FitSummary, GroupKey, Observation,
    ObservationGroup,
};

pub const MSG_SUCCESS: &str = "analysis succeeded";
pub const MSG_NO_DATA: &str = "no test data for group";
pub const MSG_PANICKED: &str = "internal error: group analysis panicked";

/// Results of one batch, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub config: ConfigSnapshot,
    pub results: Vec<AnalysisResult>,
}

impl BatchReport {
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn all_succeeded(&self) -> bool {
        self.total > 0 && self.succeeded == self.total
    }

    pub fn none_succeeded(&self) -> bool {
        self.succeeded == 0
    }

    /// Groups whose analysis thread panicked.
    pub fn panicked(&self) -> usize {
        self.results.iter().filter(|r| r.message == MSG_PANICKED).count()
    }
}

/// Runs the estimator and diagnostics for observation groups.
#[derive(Debug, Clone)]
pub struct Analyzer {
    estimator: MultiStartEstimator,
    snapshot: ConfigSnapshot,
    include_plot: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Self {
        let snapshot = ConfigSnapshot::new(&config, &ConfigPath::default());
        Self {
            estimator: MultiStartEstimator::new(config),
            snapshot,
            include_plot: false,
        }
    }

    pub fn from_resolved(resolved: ResolvedConfig) -> Self {
        Self::new(resolved.config).with_snapshot(resolved.snapshot)
    }

    pub fn with_snapshot(mut self, snapshot: ConfigSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Attach probability-plot coordinates to successful fits.
    pub fn with_plot(mut self, include_plot: bool) -> Self {
        self.include_plot = include_plot;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        self.estimator.config()
    }

    /// Analyze one group.
    pub fn analyze(&self, group: &GroupKey, observations: &[Observation]) -> AnalysisResult {
        let counts = CensoringCounts::from_observations(observations);
        if observations.is_empty() {
            warn!(
                event = event_names::ANALYSIS_GROUP_FAILED,
                stage = %Stage::Estimate,
                group = %group,
                reason = MSG_NO_DATA,
                "group analysis failed"
            );
            return AnalysisResult::failed(group.clone(), counts, MSG_NO_DATA);
        }

        debug!(
            event = event_names::ANALYSIS_STARTED,
            stage = %Stage::Estimate,
            group = %group,
            records = observations.len(),
            units = counts.total,
            "analyzing group"
        );

        let parameters = match self.estimator.estimate(observations) {
            Ok(parameters) => parameters,
            Err(err) => {
                warn!(
                    event = event_names::ANALYSIS_GROUP_FAILED,
                    stage = %Stage::Estimate,
                    group = %group,
                    code = err.code(),
                    reason = %err,
                    "group analysis failed"
                );
                return AnalysisResult::failed(group.clone(), counts, err.to_string());
            }
        };

        let (beta, eta) = (parameters.beta, parameters.eta);
        let fit = FitSummary {
            parameters,
            metrics: LifeMetrics::from_parameters(beta, eta),
            r_squared: r_squared(observations),
            confidence: ConfidenceBounds::compute(
                beta,
                eta,
                counts.effective_failures(),
                &self.config().confidence,
            ),
            failure_mode: FailureMode::from_beta(beta),
            plot: self
                .include_plot
                .then(|| ProbabilityPlot::build(observations, beta, eta)),
        };

        debug!(
            event = event_names::ANALYSIS_FINISHED,
            stage = %Stage::Diagnose,
            group = %group,
            beta,
            eta,
            r_squared = fit.r_squared,
            failure_mode = %fit.failure_mode,
            "group fitted"
        );

        AnalysisResult {
            group: group.clone(),
            success: true,
            message: MSG_SUCCESS.to_string(),
            counts,
            fit: Some(fit),
        }
    }

    pub fn analyze_group(&self, group: &ObservationGroup) -> AnalysisResult {
        self.analyze(&group.key, &group.observations)
    }

    /// Analyze every group; one group's failure never stops the others.
    pub fn analyze_batch(&self, groups: &[ObservationGroup]) -> BatchReport {
        let width = self.config().batch.max_parallel.max(1);
        let mut results = Vec::with_capacity(groups.len());

        if width == 1 {
            results.extend(groups.iter().map(|g| self.analyze_group(g)));
        } else {
            for chunk in groups.chunks(width) {
                thread::scope(|scope| {
                    let handles: Vec<_> = chunk
                        .iter()
                        .map(|group| scope.spawn(move || self.analyze_group(group)))
                        .collect();

                    for (group, handle) in chunk.iter().zip(handles) {
                        let result = handle.join().unwrap_or_else(|_| {
                            error!(
                                event = event_names::INTERNAL_ERROR,
                                stage = %Stage::Estimate,
                                group = %group.key,
                                "group analysis thread panicked"
                            );
                            AnalysisResult::failed(
                                group.key.clone(),
                                CensoringCounts::from_observations(&group.observations),
                                MSG_PANICKED,
                            )
                        });
                        results.push(result);
                    }
                });
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        let total = results.len();
        info!(
            event = event_names::BATCH_FINISHED,
            stage = %Stage::Report,
            succeeded,
            total,
            "{}/{} groups fitted",
            succeeded,
            total
        );

        BatchReport {
            run_id: None,
            generated_at: Utc::now(),
            total,
            succeeded,
            failed: total - succeeded,
            config: self.snapshot.clone(),
            results,
        }
    }
}
