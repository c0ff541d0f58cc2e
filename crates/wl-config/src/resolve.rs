//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → defaults.

use std::path::{Path, PathBuf};

/// A discovered engine configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to the engine config (or None when using built-in defaults).
    pub path: Option<PathBuf>,

    /// Where the path came from (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/weibull-life/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "WEIBULL_LIFE_CONFIG";
pub const ENV_CONFIG_DIR: &str = "WEIBULL_LIFE_CONFIG_DIR";

/// Standard config file names, in lookup order.
const CONFIG_FILENAMES: [&str; 2] = ["engine.json", "engine.toml"];

/// Application name for XDG directories.
const APP_NAME: &str = "weibull-life";

/// Resolve the engine configuration path.
///
/// 1. Explicit CLI path (returned even if missing, so loading reports it)
/// 2. WEIBULL_LIFE_CONFIG
/// 3. WEIBULL_LIFE_CONFIG_DIR + engine.{json,toml}
/// 4. XDG config directory (~/.config/weibull-life/)
/// 5. System config (/etc/weibull-life/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    if let Some(path) = cli_path {
        return ConfigPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_in_dir(Path::new(&config_dir)) {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_in_dir(&dir) {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    if let Some(path) = find_in_dir(&system_config_dir()) {
        return found(path, ConfigSource::SystemConfig);
    }

    ConfigPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    ConfigPath {
        path: Some(path),
        source,
    }
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Get the XDG config directory for weibull-life.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
