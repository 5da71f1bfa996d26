#![warn(missing_docs)]
//! # label-check-report binary
//!
//! Renders one detection response document, read from PATH or stdin, to
//! stdout. Logs go to stderr.

use anyhow::Context;
use label_check_app::{
    Command, Config, InputSource, app_version, format_document, log_filter, read_input, render_raw,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Config::from_env_and_args(std::env::args().skip(1))? {
        Command::Version => {
            println!("label-check-report {}", app_version());
            return Ok(());
        }
        Command::Render(config) => config,
    };

    let source = match &config.input {
        InputSource::Stdin => "stdin".to_string(),
        InputSource::Path(path) => path.display().to_string(),
    };
    info!(
        version = app_version(),
        source = %source,
        format = ?config.output_format,
        show_missing_sections = config.options.show_missing_sections,
        show_raw_outputs = config.options.show_raw_outputs,
        "rendering detection report"
    );

    let raw = read_input(&config.input).with_context(|| format!("reading {source}"))?;
    let document = render_raw(&raw, &config.options)
        .with_context(|| format!("building report from {source}"))?;
    let output = format_document(&document, config.output_format)?;
    println!("{output}");
    Ok(())
}
