//! Structured logging for wl-core.
//!
//! stdout is reserved for command payloads; every log line goes to
//! stderr, either human-readable or as JSON lines. Verbosity comes from
//! `-v`/`-q`, `WL_LOG`, or `RUST_LOG` (see [`LogConfig::from_env`]).
//!
//! ```ignore
//! use wl_core::logging::{init_logging, event_names, LogConfig, Stage};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! tracing::info!(event = event_names::RUN_STARTED, stage = %Stage::Init, "starting");
//! ```

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Stage};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Install the global subscriber. Later calls are ignored.
///
/// `config.directives`, when set and valid, are used verbatim; otherwise
/// `config.level` applies to every target.
pub fn init_logging(config: &LogConfig) {
    let filter = config
        .directives
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::default().add_directive(LevelFilter::from(config.level).into())
        });

    let layer = match config.format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_file(config.source_location)
                .with_line_number(config.source_location);
            if config.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Jsonl => fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .boxed(),
    };

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

/// Unique id for one CLI invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}
