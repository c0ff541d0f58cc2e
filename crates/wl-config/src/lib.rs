//! Weibull life engine configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the estimation engine configuration
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation of optimizer and diagnostic parameters
//! - Config snapshots for reproducible batch reports

pub mod engine;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use engine::{
    BatchParams, ConfidenceParams, EngineConfig, RestartParams, SearchParams, SimplexParams,
    StartPoint,
};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_engine_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
