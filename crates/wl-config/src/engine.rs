//! Estimation engine configuration types.
//!
//! Every field has a built-in default, so a config file only needs to name
//! the values it overrides. The defaults reproduce the reference engine:
//! Nelder–Mead with (ρ, χ, γ, σ) = (1, 2, 0.5, 0.5), 1000 iterations,
//! 1e-8 tolerances, seven restarts, and 95% normal-approximation bounds.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub schema_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub simplex: SimplexParams,
    pub search: SearchParams,
    pub restarts: RestartParams,
    pub confidence: ConfidenceParams,
    pub batch: BatchParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            simplex: SimplexParams::default(),
            search: SearchParams::default(),
            restarts: RestartParams::default(),
            confidence: ConfidenceParams::default(),
            batch: BatchParams::default(),
        }
    }
}

/// Nelder–Mead coefficients and stopping rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplexParams {
    /// Reflection coefficient ρ.
    pub reflection: f64,
    /// Expansion coefficient χ.
    pub expansion: f64,
    /// Contraction coefficient γ.
    pub contraction: f64,
    /// Shrink coefficient σ.
    pub shrink: f64,
    pub max_iterations: usize,
    /// Stop when the spread of objective values falls below this.
    pub tol_fun: f64,
    /// Stop when the spread of vertex coordinates falls below this.
    pub tol_x: f64,
    /// Relative perturbation for the initial simplex vertices.
    pub initial_step: f64,
    /// Absolute offset added to each perturbed coordinate.
    pub initial_offset: f64,
}

impl Default for SimplexParams {
    fn default() -> Self {
        Self {
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            max_iterations: 1000,
            tol_fun: 1e-8,
            tol_x: 1e-8,
            initial_step: 0.05,
            initial_offset: 2.5e-4,
        }
    }
}

/// Feasible parameter domain of the objective function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Exclusive lower bound on β.
    pub beta_min: f64,
    /// Upper bound on β (inclusive for the objective, exclusive for selection).
    pub beta_max: f64,
    /// Objective value returned outside the domain or on non-finite sums.
    pub penalty: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            beta_min: 0.1,
            beta_max: 20.0,
            penalty: 1e10,
        }
    }
}

/// A starting point expressed relative to the data-driven initial guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartPoint {
    /// `(β₀ · beta_factor, η₀ · eta_factor)`.
    Scaled { beta_factor: f64, eta_factor: f64 },
    /// `(beta, η₀ · eta_factor)`.
    FixedBeta { beta: f64, eta_factor: f64 },
}

impl StartPoint {
    /// Resolve against the initial guess `(β₀, η₀)`.
    pub fn resolve(&self, beta0: f64, eta0: f64) -> [f64; 2] {
        match *self {
            StartPoint::Scaled {
                beta_factor,
                eta_factor,
            } => [beta0 * beta_factor, eta0 * eta_factor],
            StartPoint::FixedBeta { beta, eta_factor } => [beta, eta0 * eta_factor],
        }
    }

    fn scaled(beta_factor: f64, eta_factor: f64) -> Self {
        StartPoint::Scaled {
            beta_factor,
            eta_factor,
        }
    }

    fn fixed_beta(beta: f64) -> Self {
        StartPoint::FixedBeta {
            beta,
            eta_factor: 1.0,
        }
    }
}

/// Multi-start plan and initial-guess heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartParams {
    /// Minimum quantity-weighted count of non-right-censored observations.
    pub min_effective_failures: f64,
    /// Minimum number of pseudo failure times for the initial guess.
    pub min_pseudo_times: usize,
    /// A log-time standard deviation below this is treated as degenerate.
    pub std_log_floor: f64,
    /// Replacement standard deviation for degenerate samples.
    pub std_log_fallback: f64,
    pub beta_guess_min: f64,
    pub beta_guess_max: f64,
    pub starts: Vec<StartPoint>,
    /// Run the restarts on scoped threads.
    pub parallel: bool,
}

impl Default for RestartParams {
    fn default() -> Self {
        Self {
            min_effective_failures: 2.0,
            min_pseudo_times: 2,
            std_log_floor: 0.01,
            std_log_fallback: 0.5,
            beta_guess_min: 0.5,
            beta_guess_max: 4.0,
            starts: vec![
                StartPoint::scaled(1.0, 1.0),
                StartPoint::scaled(1.5, 1.1),
                StartPoint::scaled(0.7, 0.9),
                StartPoint::fixed_beta(1.0),
                StartPoint::fixed_beta(2.0),
                StartPoint::scaled(1.0, 1.5),
                StartPoint::scaled(1.0, 0.7),
            ],
            parallel: false,
        }
    }
}

/// Asymptotic confidence-bound factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceParams {
    /// Two-sided normal quantile (1.96 for 95%).
    pub z: f64,
    /// `Var(β) = beta_variance_factor · β² / n`.
    pub beta_variance_factor: f64,
    /// `Var(η) = eta_variance_factor · η² / n`.
    pub eta_variance_factor: f64,
    /// Below this effective sample size the bounds are undefined.
    pub min_effective_n: u64,
    pub beta_floor: f64,
    pub eta_floor: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            z: 1.96,
            beta_variance_factor: 1.109,
            eta_variance_factor: 0.608,
            min_effective_n: 3,
            beta_floor: 0.1,
            eta_floor: 1.0,
        }
    }
}

/// Multi-group batch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchParams {
    /// Maximum groups analyzed concurrently.
    pub max_parallel: usize,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self { max_parallel: 4 }
    }
}

impl EngineConfig {
    /// Load engine config from a JSON or TOML file (chosen by extension).
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Parse engine config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse engine config from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self, ValidationError> {
        toml::from_str(text)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Canonical JSON encoding, used for hashing and `config show`.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
