//! wl-core: Weibull life analysis CLI.
//!
//! Reads test records, fits a Weibull distribution per group and writes
//! the batch report to stdout. Logs go to stderr.

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

use wl_config::{EngineConfig, CONFIG_SCHEMA_VERSION};
use wl_core::analysis::Analyzer;
use wl_core::config::{load_config, load_config_file, ConfigError};
use wl_core::exit_codes::ExitCode;
use wl_core::input::{load_records, InputError};
use wl_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use wl_core::output::{render_json, render_report, OutputFormat, OUTPUT_SCHEMA_VERSION};

/// Weibull life analysis under mixed censoring
#[derive(Parser)]
#[command(name = "wl-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Options shared by every command
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Engine config file (.json or .toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit every group in a record file
    Analyze(AnalyzeArgs),

    /// Inspect or validate the engine configuration
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Record file: JSON array or JSON lines
    input: PathBuf,

    /// Only analyze the group with this id or code
    #[arg(long)]
    group: Option<String>,

    /// Include probability-plot coordinates
    #[arg(long)]
    plot: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,
    /// Validate a config file (defaults to the resolved one)
    Validate {
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::AllFitted,
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
            ConfigCommands::Validate { path } => run_config_validate(&cli.global, path.as_ref()),
        },
        Commands::Version => print_version(&cli.global),
    };

    std::process::exit(exit_code.as_i32());
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let run_id = generate_run_id();
    info!(
        event = event_names::RUN_STARTED,
        stage = %Stage::Init,
        run_id = %run_id,
        input = %args.input.display(),
        "starting analysis"
    );

    let resolved = match load_config(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(err) => return config_failure(global, &err),
    };

    let grouped = match load_records(&args.input) {
        Ok(grouped) => grouped,
        Err(err) => return input_failure(global, &err),
    };
    let grouped = match &args.group {
        Some(selector) => match grouped.select(selector) {
            Ok(grouped) => grouped,
            Err(err) => return input_failure(global, &err),
        },
        None => grouped,
    };

    let analyzer = Analyzer::from_resolved(resolved).with_plot(args.plot);
    let report = analyzer.analyze_batch(&grouped.groups).with_run_id(run_id.clone());
    let code = ExitCode::from_report(&report);

    let mut stdout = io::stdout().lock();
    if let Err(err) = render_report(&report, global.format, &mut stdout).and_then(|_| stdout.flush()) {
        error!(event = event_names::INTERNAL_ERROR, stage = %Stage::Report, error = %err, "failed to write report");
        return ExitCode::IoError;
    }

    info!(
        event = event_names::RUN_FINISHED,
        stage = %Stage::Report,
        run_id = %run_id,
        exit_code = code.as_i32(),
        "analysis finished"
    );
    code
}

#[derive(Serialize)]
struct ConfigView<'a> {
    source: String,
    path: Option<String>,
    hash: &'a str,
    config: &'a EngineConfig,
}

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let resolved = match load_config(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(err) => return config_failure(global, &err),
    };

    let mut stdout = io::stdout().lock();
    let written = match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => render_json(
            &ConfigView {
                source: resolved.origin.source.to_string(),
                path: resolved.snapshot.config_path.clone(),
                hash: &resolved.snapshot.config_hash,
                config: &resolved.config,
            },
            &mut stdout,
        ),
        OutputFormat::Summary | OutputFormat::Md => {
            let s = &resolved.snapshot.summary;
            writeln!(
                stdout,
                "config {} from {} ({})\nmax_iterations={} tol_fun={:e} tol_x={:e} beta=({}, {}] starts={} parallel_restarts={} z={} max_parallel={}",
                resolved.snapshot.short_id(),
                resolved.origin.source,
                resolved.snapshot.config_path.as_deref().unwrap_or("built-in"),
                s.max_iterations,
                s.tol_fun,
                s.tol_x,
                s.beta_min,
                s.beta_max,
                s.start_count,
                s.parallel_restarts,
                s.confidence_z,
                s.max_parallel,
            )
        }
    };
    match written {
        Ok(()) => ExitCode::AllFitted,
        Err(_) => ExitCode::IoError,
    }
}

fn run_config_validate(global: &GlobalOpts, path: Option<&PathBuf>) -> ExitCode {
    let (result, shown) = match path {
        Some(path) => (load_config_file(path).map(|_| ()), Some(path.display().to_string())),
        None => match load_config(global.config.as_deref()) {
            Ok(resolved) => (Ok(()), resolved.snapshot.config_path.clone()),
            Err(err) => (Err(err), global.config.as_ref().map(|p| p.display().to_string())),
        },
    };

    if let Err(err) = result {
        return config_failure(global, &err);
    }

    let shown = shown.unwrap_or_else(|| "built-in defaults".to_string());
    let written = match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => render_json(
            &serde_json::json!({ "valid": true, "path": shown }),
            &mut io::stdout().lock(),
        ),
        OutputFormat::Summary | OutputFormat::Md => writeln!(io::stdout(), "{shown}: valid"),
    };
    match written {
        Ok(()) => ExitCode::AllFitted,
        Err(_) => ExitCode::IoError,
    }
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    let written = match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => render_json(
            &serde_json::json!({
                "wl_core_version": env!("CARGO_PKG_VERSION"),
                "config_schema_version": CONFIG_SCHEMA_VERSION,
                "output_schema_version": OUTPUT_SCHEMA_VERSION,
            }),
            &mut io::stdout().lock(),
        ),
        OutputFormat::Summary | OutputFormat::Md => writeln!(
            io::stdout(),
            "wl-core {}\nconfig schema {}",
            env!("CARGO_PKG_VERSION"),
            CONFIG_SCHEMA_VERSION
        ),
    };
    match written {
        Ok(()) => ExitCode::AllFitted,
        Err(_) => ExitCode::IoError,
    }
}

fn config_failure(global: &GlobalOpts, err: &ConfigError) -> ExitCode {
    let code = ExitCode::from_config_error(err);
    error!(event = event_names::CONFIG_ERROR, stage = %Stage::Init, error = %err, "configuration error");
    report_error(global, code, &err.to_string());
    code
}

fn input_failure(global: &GlobalOpts, err: &InputError) -> ExitCode {
    let code = ExitCode::from_input_error(err);
    error!(event = event_names::INPUT_ERROR, stage = %Stage::Load, error = %err, "input error");
    report_error(global, code, &err.to_string());
    code
}

/// Machine-readable formats get an error document on stdout; text formats
/// get a line on stderr.
fn report_error(global: &GlobalOpts, code: ExitCode, message: &str) {
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let _ = render_json(
                &serde_json::json!({
                    "error": {
                        "code": code.code_name(),
                        "exit_code": code.as_i32(),
                        "message": message,
                    }
                }),
                &mut io::stdout().lock(),
            );
        }
        OutputFormat::Summary | OutputFormat::Md => {
            eprintln!("wl-core: {message}");
        }
    }
}
