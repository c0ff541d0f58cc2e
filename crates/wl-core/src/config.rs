//! Engine configuration loading for wl-core.
//!
//! Resolves the config file (CLI > env > XDG > system > defaults), parses
//! it, validates it, and records a snapshot for batch reports.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use wl_config::{
    resolve_config, validate_engine_config, ConfigPath, ConfigSnapshot, EngineConfig,
    ValidationError,
};

use crate::logging::{event_names, Stage};

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("semantic validation failed: {0}")]
    Validation(ValidationError),
}

impl ConfigError {
    fn from_validation(path: &Path, err: ValidationError) -> Self {
        match err {
            ValidationError::IoError(message) => ConfigError::Io {
                path: path.to_path_buf(),
                message,
            },
            ValidationError::ParseError(message) => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            ValidationError::VersionMismatch { expected, actual } => {
                ConfigError::VersionMismatch { expected, actual }
            }
            other => ConfigError::Validation(other),
        }
    }
}

/// Configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: EngineConfig,
    pub origin: ConfigPath,
    pub snapshot: ConfigSnapshot,
}

/// Resolve, load and validate the engine configuration.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let origin = resolve_config(cli_path);

    let config = match &origin.path {
        Some(path) => {
            let config = load_config_file(path)?;
            info!(
                event = event_names::CONFIG_LOADED,
                stage = %Stage::Init,
                path = %path.display(),
                source = %origin.source,
                "engine config loaded"
            );
            config
        }
        None => {
            debug!(
                event = event_names::CONFIG_DEFAULT_USED,
                stage = %Stage::Init,
                "no engine config found, using built-in defaults"
            );
            EngineConfig::default()
        }
    };

    let snapshot = ConfigSnapshot::new(&config, &origin);
    Ok(ResolvedConfig {
        config,
        origin,
        snapshot,
    })
}

/// Load and validate one config file.
pub fn load_config_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    let config = EngineConfig::from_file(path).map_err(|e| ConfigError::from_validation(path, e))?;
    validate_engine_config(&config).map_err(|e| ConfigError::from_validation(path, e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wl_config::ConfigSource;
    use tempfile::NamedTempFile;

    fn temp_config(suffix: &str, body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_file_is_loaded() {
        let file = temp_config(".json", r#"{"schema_version":"1.0.0","simplex":{"max_iterations":250}}"#);
        let resolved = load_config(Some(file.path())).unwrap();
        assert_eq!(resolved.config.simplex.max_iterations, 250);
        assert_eq!(resolved.origin.source, ConfigSource::CliArgument);
        assert_eq!(resolved.snapshot.summary.max_iterations, 250);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/engine.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err}");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = temp_config(".toml", "simplex = [");
        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn version_and_semantics_are_checked() {
        let file = temp_config(".json", r#"{"schema_version":"9.9.9"}"#);
        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::VersionMismatch { .. }));

        let file = temp_config(".json", r#"{"schema_version":"1.0.0","search":{"beta_min":5.0,"beta_max":1.0}}"#);
        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err}");
    }
}
