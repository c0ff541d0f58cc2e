//! Rendering batch reports to stdout.
//!
//! `json` prints the whole report, `jsonl` one result per line, `summary`
//! one line per group and `md` a Markdown table. Undefined diagnostics
//! (NaN) are `null` in JSON and `n/a` in text.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

use crate::analysis::BatchReport;
use crate::model::AnalysisResult;

/// Version of the report layout written by `json` and `jsonl`.
pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Full report as one JSON document.
    #[default]
    Json,
    /// One JSON object per group.
    Jsonl,
    /// One line per group.
    Summary,
    /// Markdown table.
    Md,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Summary => "summary",
            OutputFormat::Md => "md",
        })
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct ResultLine<'a> {
    schema_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<&'a str>,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

/// Write `report` in `format`.
pub fn render_report<W: Write>(report: &BatchReport, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let envelope = Envelope {
                schema_version: OUTPUT_SCHEMA_VERSION,
                body: report,
            };
            serde_json::to_writer_pretty(&mut *out, &envelope)?;
            writeln!(out)
        }
        OutputFormat::Jsonl => {
            for result in &report.results {
                let line = ResultLine {
                    schema_version: OUTPUT_SCHEMA_VERSION,
                    run_id: report.run_id.as_deref(),
                    result,
                };
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)?;
            }
            Ok(())
        }
        OutputFormat::Summary => render_summary(report, out),
        OutputFormat::Md => render_markdown(report, out),
    }
}

/// Write any serializable value as pretty JSON with the schema version.
pub fn render_json<W: Write, T: Serialize>(value: &T, out: &mut W) -> io::Result<()> {
    let envelope = Envelope {
        schema_version: OUTPUT_SCHEMA_VERSION,
        body: value,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)
}

fn render_summary<W: Write>(report: &BatchReport, out: &mut W) -> io::Result<()> {
    for result in &report.results {
        match &result.fit {
            Some(fit) => writeln!(
                out,
                "{}: beta={} eta={} mttf={} b10={} r2={} ({})",
                result.group,
                num(fit.parameters.beta, 4),
                num(fit.parameters.eta, 2),
                num(fit.metrics.mttf, 2),
                num(fit.metrics.b10, 2),
                num(fit.r_squared, 4),
                fit.failure_mode,
            )?,
            None => writeln!(out, "{}: no fit ({})", result.group, result.message)?,
        }
    }
    writeln!(out, "{}/{} groups fitted", report.succeeded, report.total)
}

fn render_markdown<W: Write>(report: &BatchReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "# Weibull Life Analysis")?;
    writeln!(out)?;
    writeln!(
        out,
        "{} of {} groups fitted. Config `{}` ({}).",
        report.succeeded,
        report.total,
        report.config.short_id(),
        report.config.config_source
    )?;
    writeln!(out)?;
    writeln!(out, "| Group | N | F/S/I/L | β | η | MTTF | B10 | B50 | B90 | R² | β 95% | η 95% | Mode |")?;
    writeln!(out, "|---|---:|---|---:|---:|---:|---:|---:|---:|---:|---|---|---|")?;

    for result in &report.results {
        let c = &result.counts;
        let counts = format!(
            "{}/{}/{}/{}",
            c.complete, c.right_censored, c.interval_censored, c.left_censored
        );
        match &result.fit {
            Some(fit) => {
                let ci = &fit.confidence;
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                    result.group,
                    c.total,
                    counts,
                    num(fit.parameters.beta, 3),
                    num(fit.parameters.eta, 1),
                    num(fit.metrics.mttf, 1),
                    num(fit.metrics.b10, 1),
                    num(fit.metrics.b50, 1),
                    num(fit.metrics.b90, 1),
                    num(fit.r_squared, 3),
                    range(ci.lower_beta, ci.upper_beta, 3),
                    range(ci.lower_eta, ci.upper_eta, 1),
                    fit.failure_mode,
                )?;
            }
            None => writeln!(
                out,
                "| {} | {} | {} | | | | | | | | | | {} |",
                result.group, c.total, counts, result.message
            )?,
        }
    }
    Ok(())
}

fn num(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{value:.precision$}")
    } else {
        "n/a".to_string()
    }
}

fn range(lower: f64, upper: f64, precision: usize) -> String {
    if lower.is_finite() && upper.is_finite() {
        format!("[{lower:.precision$}, {upper:.precision$}]")
    } else {
        "n/a".to_string()
    }
}
