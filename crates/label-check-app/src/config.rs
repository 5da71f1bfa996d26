use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::AppError;

/// Env var that enables "not found" placeholders for absent sections.
pub const SHOW_MISSING_SECTIONS_ENV: &str = "LABEL_CHECK_SHOW_MISSING_SECTIONS";
/// Env var that appends the raw workflow outputs to the report.
pub const SHOW_RAW_OUTPUTS_ENV: &str = "LABEL_CHECK_SHOW_RAW_OUTPUTS";
/// Env var selecting the CLI output format (`text` or `json`).
pub const OUTPUT_FORMAT_ENV: &str = "LABEL_CHECK_OUTPUT_FORMAT";

/// Log filter used when `RUST_LOG` is unset, blank, or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the log filter from `RUST_LOG`-style directives.
///
/// The directives are taken as given, so `debug` or `label_check_classify=trace`
/// raise verbosity above the [`DEFAULT_LOG_FILTER`] fallback.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Rendering switches for the report view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit a placeholder card for each absent section.
    pub show_missing_sections: bool,
    /// Append a pretty-printed copy of the workflow outputs.
    pub show_raw_outputs: bool,
}

impl ReportOptions {
    /// Loads the switches from environment variables. Both default to off.
    pub fn from_env() -> Self {
        Self {
            show_missing_sections: flag_from_env(SHOW_MISSING_SECTIONS_ENV),
            show_raw_outputs: flag_from_env(SHOW_RAW_OUTPUTS_ENV),
        }
    }
}

/// Reads a boolean switch.
///
/// Semantics:
/// - Unset or blank => off.
/// - `0`, `false`, `off` (case-insensitive) => off.
/// - Any other value => on.
pub fn flag_from_env(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            !(normalized.is_empty()
                || normalized == "0"
                || normalized == "false"
                || normalized == "off")
        }
        Err(_) => false,
    }
}

/// How the CLI prints the finished report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented plain text.
    #[default]
    Text,
    /// Pretty JSON of the display document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!(
                "{OUTPUT_FORMAT_ENV} must be `text` or `json`, got `{other}`"
            ))),
        }
    }
}

/// Where the response document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input.
    Stdin,
    /// A file on disk.
    Path(PathBuf),
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Render one response document.
    Render(Config),
    /// Print the version and exit.
    Version,
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Output format.
    pub output_format: OutputFormat,
    /// Response document source.
    pub input: InputSource,
    /// Report switches.
    pub options: ReportOptions,
}

impl Config {
    /// Parses CLI arguments (without the program name) and environment.
    ///
    /// Accepts at most one positional PATH; `-` or no PATH reads stdin.
    /// `--version`/`-V` short-circuits everything else.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for unknown flags, extra positional
    /// arguments, or an invalid [`OUTPUT_FORMAT_ENV`] value.
    pub fn from_env_and_args<I>(args: I) -> Result<Command, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut path: Option<String> = None;
        for arg in args {
            match arg.as_str() {
                "--version" | "-V" => return Ok(Command::Version),
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(AppError::Config(format!("unknown option `{flag}`")));
                }
                _ if path.is_some() => {
                    return Err(AppError::Config(format!(
                        "unexpected extra argument `{arg}`"
                    )));
                }
                _ => path = Some(arg),
            }
        }

        let output_format = match std::env::var(OUTPUT_FORMAT_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => OutputFormat::default(),
        };
        let input = match path {
            None => InputSource::Stdin,
            Some(path) if path == "-" => InputSource::Stdin,
            Some(path) => InputSource::Path(PathBuf::from(path)),
        };

        Ok(Command::Render(Config {
            output_format,
            input,
            options: ReportOptions::from_env(),
        }))
    }
}
