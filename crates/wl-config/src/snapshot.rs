//! Configuration snapshots for reproducibility.
//!
//! A snapshot captures the engine configuration in force when an analysis
//! batch ran, so a reported fit can be reproduced later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::EngineConfig;
use crate::resolve::ConfigPath;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the config was loaded from.
    #[serde(default)]
    pub config_path: Option<String>,

    /// Source of the configuration.
    pub config_source: String,

    /// SHA-256 hash of the canonical JSON encoding.
    pub config_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub max_iterations: usize,
    pub tol_fun: f64,
    pub tol_x: f64,
    pub beta_min: f64,
    pub beta_max: f64,
    pub start_count: usize,
    pub parallel_restarts: bool,
    pub confidence_z: f64,
    pub max_parallel: usize,
}

impl ConfigSnapshot {
    /// Create a snapshot of a loaded configuration.
    pub fn new(config: &EngineConfig, origin: &ConfigPath) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            config_path: origin.path.as_ref().map(|p| p.display().to_string()),
            config_source: origin.source.to_string(),
            config_hash: hash_content(&config.to_canonical_json()),
            summary: ConfigSummary::from_config(config),
        }
    }

    /// Snapshot of the built-in defaults.
    pub fn defaults_only() -> Self {
        Self::new(&EngineConfig::default(), &ConfigPath::default())
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}

impl ConfigSummary {
    fn from_config(config: &EngineConfig) -> Self {
        ConfigSummary {
            max_iterations: config.simplex.max_iterations,
            tol_fun: config.simplex.tol_fun,
            tol_x: config.simplex.tol_x,
            beta_min: config.search.beta_min,
            beta_max: config.search.beta_max,
            start_count: config.restarts.starts.len(),
            parallel_restarts: config.restarts.parallel,
            confidence_z: config.confidence.z,
            max_parallel: config.batch.max_parallel,
        }
    }
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
