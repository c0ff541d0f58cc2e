//! Logging configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, `RUST_LOG`,
//! `WL_LOG`, `WL_LOG_FORMAT`, then CLI flags. Raw `RUST_LOG` directives
//! only reach the subscriber when nothing higher set the level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding a bare log level.
pub const ENV_LOG_LEVEL: &str = "WL_LOG";
/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "WL_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines on stderr.
    #[default]
    Human,
    /// One JSON object per line on stderr.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        })
    }
}

/// Minimum level emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Level implied by `-v`/`-q` counts; `None` when neither was given.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" => Ok(LogLevel::Off),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        })
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps on human output.
    pub timestamps: bool,
    /// File and line on every event.
    pub source_location: bool,
    /// `RUST_LOG` directives, kept only while `RUST_LOG` decides the level.
    pub directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
            source_location: false,
            directives: None,
        }
    }
}

impl LogConfig {
    /// Build from the environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Same as [`LogConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL).and_then(|v| v.parse().ok()) {
            config.level = level;
        } else if let Some(directives) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            if let Some(level) = level_for_crate(&directives) {
                config.level = level;
            }
            config.directives = Some(directives);
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT).and_then(|v| v.parse().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.directives = None;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }
        config
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self.directives = None;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    pub fn with_source_location(mut self, enabled: bool) -> Self {
        self.source_location = enabled;
        self
    }
}

/// Level that a `RUST_LOG` directive list assigns to this crate.
///
/// A `wl_core=<level>` directive wins over a bare global level; other
/// targets are ignored.
fn level_for_crate(directives: &str) -> Option<LogLevel> {
    let mut global = None;
    for directive in directives.split(',').map(str::trim) {
        match directive.split_once('=') {
            Some((target, level)) if target == "wl_core" => return level.parse().ok(),
            Some(_) => {}
            None => global = directive.parse().ok().or(global),
        }
    }
    global
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_formats_and_levels() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("none".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(LogLevel::from_verbosity(0, false), None);
        assert_eq!(LogLevel::from_verbosity(1, false), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_verbosity(3, false), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_verbosity(2, true), Some(LogLevel::Error));
    }

    #[test]
    fn wl_log_beats_rust_log() {
        let config = LogConfig::from_lookup(
            lookup(&[("WL_LOG", "warn"), ("RUST_LOG", "trace")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.directives, None);
    }

    #[test]
    fn rust_log_crate_directive() {
        let config = LogConfig::from_lookup(
            lookup(&[("RUST_LOG", "info,hyper=trace,wl_core=debug")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.directives.as_deref(), Some("info,hyper=trace,wl_core=debug"));

        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "error")]), None, None);
        assert_eq!(config.level, LogLevel::Error);
    }

    #[test]
    fn quiet_flag_drops_rust_log_directives() {
        let config = LogConfig::from_lookup(
            lookup(&[("RUST_LOG", "debug")]),
            LogLevel::from_verbosity(0, true),
            None,
        );
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.directives, None);
    }

    #[test]
    fn cli_overrides_env() {
        let config = LogConfig::from_lookup(
            lookup(&[("WL_LOG", "warn"), ("WL_LOG_FORMAT", "jsonl")]),
            Some(LogLevel::Trace),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn defaults_without_env() {
        let config = LogConfig::from_lookup(lookup(&[]), None, None);
        assert_eq!(config, LogConfig::default());
        let config = config.with_timestamps(false).with_source_location(true);
        assert!(!config.timestamps && config.source_location);
    }
}
