//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::engine::{EngineConfig, StartPoint};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn invalid(field: &str, message: String) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, format!("Must be positive and finite, got {}", value)));
    }
    Ok(())
}

fn require_unit_open(field: &str, value: f64) -> ValidationResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(invalid(field, format!("Must be in (0, 1), got {}", value)));
    }
    Ok(())
}

/// Validate engine configuration semantically.
pub fn validate_engine_config(config: &EngineConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    // Nelder–Mead needs 0 < ρ < χ and γ, σ in (0, 1).
    let simplex = &config.simplex;
    require_positive("simplex.reflection", simplex.reflection)?;
    if !(simplex.expansion > simplex.reflection) {
        return Err(ValidationError::SemanticError(format!(
            "simplex.expansion ({}) must exceed simplex.reflection ({})",
            simplex.expansion, simplex.reflection
        )));
    }
    require_unit_open("simplex.contraction", simplex.contraction)?;
    require_unit_open("simplex.shrink", simplex.shrink)?;
    if simplex.max_iterations == 0 {
        return Err(invalid("simplex.max_iterations", "Must be at least 1".to_string()));
    }
    require_positive("simplex.tol_fun", simplex.tol_fun)?;
    require_positive("simplex.tol_x", simplex.tol_x)?;
    require_positive("simplex.initial_step", simplex.initial_step)?;
    if !(simplex.initial_offset >= 0.0 && simplex.initial_offset.is_finite()) {
        return Err(invalid(
            "simplex.initial_offset",
            format!("Must be non-negative, got {}", simplex.initial_offset),
        ));
    }

    let search = &config.search;
    require_positive("search.beta_min", search.beta_min)?;
    if !(search.beta_max > search.beta_min) || !search.beta_max.is_finite() {
        return Err(ValidationError::SemanticError(format!(
            "search.beta_max ({}) must exceed search.beta_min ({})",
            search.beta_max, search.beta_min
        )));
    }
    require_positive("search.penalty", search.penalty)?;

    let restarts = &config.restarts;
    if !(restarts.min_effective_failures >= 1.0) {
        return Err(invalid(
            "restarts.min_effective_failures",
            format!("Must be at least 1, got {}", restarts.min_effective_failures),
        ));
    }
    if restarts.min_pseudo_times < 2 {
        return Err(invalid(
            "restarts.min_pseudo_times",
            format!(
                "A spread needs at least 2 times, got {}",
                restarts.min_pseudo_times
            ),
        ));
    }
    require_positive("restarts.std_log_floor", restarts.std_log_floor)?;
    require_positive("restarts.std_log_fallback", restarts.std_log_fallback)?;
    require_positive("restarts.beta_guess_min", restarts.beta_guess_min)?;
    if !(restarts.beta_guess_max >= restarts.beta_guess_min) {
        return Err(ValidationError::SemanticError(format!(
            "restarts.beta_guess_max ({}) must be >= restarts.beta_guess_min ({})",
            restarts.beta_guess_max, restarts.beta_guess_min
        )));
    }
    if restarts.starts.is_empty() {
        return Err(invalid(
            "restarts.starts",
            "At least one start point is required".to_string(),
        ));
    }
    for (i, start) in restarts.starts.iter().enumerate() {
        validate_start_point(i, start)?;
    }

    let confidence = &config.confidence;
    require_positive("confidence.z", confidence.z)?;
    require_positive("confidence.beta_variance_factor", confidence.beta_variance_factor)?;
    require_positive("confidence.eta_variance_factor", confidence.eta_variance_factor)?;
    if confidence.min_effective_n == 0 {
        return Err(invalid(
            "confidence.min_effective_n",
            "Must be at least 1".to_string(),
        ));
    }

    if config.batch.max_parallel == 0 {
        return Err(invalid("batch.max_parallel", "Must be at least 1".to_string()));
    }

    Ok(())
}

fn validate_start_point(index: usize, start: &StartPoint) -> ValidationResult<()> {
    match *start {
        StartPoint::Scaled {
            beta_factor,
            eta_factor,
        } => {
            require_positive(&format!("restarts.starts[{}].beta_factor", index), beta_factor)?;
            require_positive(&format!("restarts.starts[{}].eta_factor", index), eta_factor)?;
        }
        StartPoint::FixedBeta { beta, eta_factor } => {
            require_positive(&format!("restarts.starts[{}].beta", index), beta)?;
            require_positive(&format!("restarts.starts[{}].eta_factor", index), eta_factor)?;
        }
    }
    Ok(())
}
