//! Application entry point for the `codemetal-sensorpipe` batch pipeline.
//!
//! This binary orchestrates one full pipeline run:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Loading raw readings from the input file (JSON or JSON Lines)
//! - Running the canonical pipeline to produce mesh summaries
//! - Writing the summaries as a pretty-printed JSON array
//!
//! # Usage
//! `codemetal-sensorpipe <input.json|input.jsonl> <output.json>`
//!
//! # Environment Variables
//! - `PIPELINE_TEMP_LOW` / `PIPELINE_TEMP_HIGH` (optional) – temperature
//!   thresholds in °C (defaults: -10.0 / 60.0)
//! - `PIPELINE_HUM_LOW` / `PIPELINE_HUM_HIGH` (optional) – humidity
//!   thresholds in % (defaults: 10.0 / 90.0)
//! - `PIPELINE_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `PIPELINE_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! Any pipeline failure is reported and the process exits non-zero; there
//! is no retry and no partial output.
use std::{env, fs, io::IsTerminal, path::Path};

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use sensorpipe::{create_sensor_pipeline, load_from_env, FileSource, SensorSource};

// ---

fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let mut args = env::args().skip(1);
    let (input_path, output_path) = match (args.next(), args.next()) {
        (Some(input), Some(output)) => (input, output),
        _ => bail!("usage: codemetal-sensorpipe <input.json|input.jsonl> <output.json>"),
    };

    let cfg = load_from_env()?;
    cfg.log_config();

    let source = FileSource::new(&input_path);
    let batch = source.load()?;
    tracing::info!("Loaded {} sensor readings from {}", batch.len(), input_path);

    let pipeline = create_sensor_pipeline(cfg);
    let summaries = pipeline.run(batch)?;
    tracing::info!("Processed into {} mesh summaries", summaries.len());

    if let Some(parent) = Path::new(&output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(&summaries)?;
    fs::write(&output_path, json)
        .with_context(|| format!("Failed to write {output_path}"))?;

    tracing::info!("Results saved to {}", output_path);
    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `PIPELINE_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `PIPELINE_LOG_LEVEL` env var
///
/// This should be called once at application startup before any logging
/// or tracing macros are invoked. It installs the subscriber globally
/// for the lifetime of the process.
fn init_tracing() {
    // ---
    let span_events = match env::var("PIPELINE_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to PIPELINE_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("PIPELINE_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(level.to_string())
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
