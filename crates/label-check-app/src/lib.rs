#![warn(missing_docs)]
//! # label-check-app
//!
//! ## Purpose
//! Turns one backend detection response into a complete [`DisplayDocument`]
//! for `label-check`.
//!
//! ## Responsibilities
//! - Detect the response shape and route it to the matching renderer.
//! - Classify the primary report text and pick section, Markdown, or
//!   placeholder rendering.
//! - Build the header, notices, and parameter card from response metadata.
//! - Load rendering switches and CLI configuration from the environment.
//!
//! ## Data flow
//! Raw response text -> [`parse_raw_response`] -> shape detection ->
//! classification / legacy decoding -> report blocks -> [`DisplayDocument`]
//! -> text or JSON output.
//!
//! ## Ownership and lifetimes
//! [`build_report`] borrows the decoded response and returns a fully owned
//! document; nothing is cached between calls.
//!
//! ## Error model
//! Rendering itself never fails. Only decoding the outer document, reading
//! input, encoding output, and configuration produce [`AppError`]. Degraded
//! responses are logged at `warn` and rendered with a notice or fallback.

mod config;

pub use config::{
    Command, Config, DEFAULT_LOG_FILTER, InputSource, OUTPUT_FORMAT_ENV, OutputFormat,
    ReportOptions, SHOW_MISSING_SECTIONS_ENV, SHOW_RAW_OUTPUTS_ENV, flag_from_env, log_filter,
};

use std::io::Read;

use label_check_classify::{classify, locate_json_object, text_outside};
use label_check_core::{
    ClassifiedContent, CoreError, PrimaryContent, RawResponse, ResponseShape, SectionName,
    UsageMetadata, parse_raw_response,
};
use label_check_report_contract::{extract_sections, parse_legacy_report};
use label_check_ui::{
    DisplayDocument, Metric, Notice, ReportBlock, ReportHeader, TaggedText,
    render_legacy_report, render_text,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("LABEL_CHECK_VERSION");

/// Headline of a workflow report.
pub const REPORT_TITLE: &str = "食品标签检测完成";
/// File tag when the response does not name the upload.
pub const UNKNOWN_FILE: &str = "未知文件";
/// Food type tag when the parameter is missing.
pub const UNKNOWN_FOOD_TYPE: &str = "未知类型";
/// Package type tag when the parameter is missing.
pub const UNKNOWN_PACKAGE: &str = "未知包装";
/// Warning shown when the backend recovered from a truncated read.
pub const READ_ERROR_MESSAGE: &str = "检测已完成，但由于网络问题未获取完整结果。";
/// Follow-up text for [`READ_ERROR_MESSAGE`].
pub const READ_ERROR_DESCRIPTION: &str = "请查看下方显示的基本信息。";

const FOOD_TYPE_PARAM: &str = "Foodtype";
const PACKAGE_TYPE_PARAM: &str = "PackageFoodType";
const FALLBACK_HEADING: &str = "## 检测结果";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Builds the display document for one decoded response.
///
/// Stateless: the same response and options always produce equal documents.
pub fn build_report(response: &RawResponse, options: &ReportOptions) -> DisplayDocument {
    match response.shape() {
        ResponseShape::Workflow => build_workflow_report(response, options),
        ResponseShape::Legacy => build_legacy_report(response, options),
    }
}

/// Decodes `raw` and builds its display document.
///
/// # Errors
/// Returns [`AppError::Core`] when `raw` is blank or not a response object.
pub fn render_raw(raw: &str, options: &ReportOptions) -> Result<DisplayDocument, AppError> {
    let response = parse_raw_response(raw).map_err(AppError::Core)?;
    Ok(build_report(&response, options))
}

/// Renders classified content into report body blocks.
///
/// # Semantics
/// - `Json`: present sections in fixed order; a fenced JSON dump when none is
///   recognized.
/// - `Mixed`: the largest embedded object goes through the `Json` path and
///   the surrounding text follows as Markdown; with no valid object the
///   whole text is Markdown.
/// - `Markdown`: one Markdown block.
/// - `Empty`: the "no results" placeholder.
pub fn content_blocks(content: ClassifiedContent, options: &ReportOptions) -> Vec<ReportBlock> {
    match content {
        ClassifiedContent::Empty => vec![ReportBlock::no_results()],
        ClassifiedContent::Json(value) => json_blocks(&value, options),
        ClassifiedContent::Markdown(text) => vec![ReportBlock::markdown(text)],
        ClassifiedContent::Mixed { text, candidates } => match locate_json_object(&text) {
            Some(located) => {
                debug!(
                    start = located.span.start,
                    end = located.span.end,
                    "embedded report object located"
                );
                let mut blocks = json_blocks(&located.value, options);
                let remainder = text_outside(&text, located.span);
                if !remainder.is_empty() {
                    blocks.push(ReportBlock::markdown(remainder));
                }
                blocks
            }
            None => {
                debug!(
                    candidates = candidates.len(),
                    "no valid embedded object, rendering as markdown"
                );
                vec![ReportBlock::markdown(text)]
            }
        },
    }
}

fn build_workflow_report(response: &RawResponse, options: &ReportOptions) -> DisplayDocument {
    let mut notices = Vec::new();
    if response.read_error_occurred() {
        warn!("response was recovered from a truncated upstream read");
        notices.push(Notice::warning(READ_ERROR_MESSAGE, READ_ERROR_DESCRIPTION));
    }

    let mut blocks = match response.primary_content() {
        PrimaryContent::Missing => {
            debug!("workflow outputs carry no report content");
            vec![ReportBlock::no_results()]
        }
        PrimaryContent::Text { field, text } => {
            debug!(field = %field, "primary output field selected");
            content_blocks(classify(&text), options)
        }
        PrimaryContent::Structured(value) => json_blocks(&value, options),
    };

    if options.show_raw_outputs {
        if let Some(outputs) = response.outputs() {
            blocks.push(ReportBlock::RawOutputs {
                json: pretty_json(outputs),
            });
        }
    }

    DisplayDocument {
        header: workflow_header(response),
        notices,
        parameters: parameters(response),
        blocks,
    }
}

fn build_legacy_report(response: &RawResponse, options: &ReportOptions) -> DisplayDocument {
    let document = response.legacy_document();
    let (header, blocks) = match parse_legacy_report(&document) {
        Ok(report) => render_legacy_report(&report),
        Err(error) => {
            warn!(%error, "legacy report rejected, rendering sections generically");
            let header = ReportHeader {
                title: REPORT_TITLE.to_string(),
                tags: Vec::new(),
                metrics: Vec::new(),
            };
            (header, json_blocks(&document, options))
        }
    };

    DisplayDocument {
        header,
        notices: Vec::new(),
        parameters: parameters(response),
        blocks,
    }
}

fn json_blocks(json: &Value, options: &ReportOptions) -> Vec<ReportBlock> {
    let sections = extract_sections(json);
    debug!(sections = sections.len(), "report sections extracted");
    if sections.is_empty() {
        return vec![ReportBlock::markdown(format!(
            "{FALLBACK_HEADING}\n\n```json\n{}\n```\n",
            pretty_json(json)
        ))];
    }

    if !options.show_missing_sections {
        return sections.iter().map(ReportBlock::section).collect();
    }
    SectionName::ALL
        .into_iter()
        .map(|name| {
            sections
                .iter()
                .find(|section| section.name == name)
                .map_or_else(|| ReportBlock::missing_section(name), ReportBlock::section)
        })
        .collect()
}

fn workflow_header(response: &RawResponse) -> ReportHeader {
    let food_type = response
        .input_param(FOOD_TYPE_PARAM)
        .unwrap_or_else(|| UNKNOWN_FOOD_TYPE.to_string());
    let package_type = response
        .input_param(PACKAGE_TYPE_PARAM)
        .unwrap_or_else(|| UNKNOWN_PACKAGE.to_string());

    ReportHeader {
        title: REPORT_TITLE.to_string(),
        tags: vec![
            TaggedText::plain(response.filename().unwrap_or(UNKNOWN_FILE)),
            TaggedText::plain(food_type),
            TaggedText::plain(package_type),
        ],
        metrics: response.metadata().map(usage_metrics).unwrap_or_default(),
    }
}

fn usage_metrics(metadata: &UsageMetadata) -> Vec<Metric> {
    let mut metrics = Vec::new();
    if let Some(tokens) = metadata.total_tokens {
        metrics.push(metric("消耗令牌", group_thousands(tokens)));
    }
    if let Some(price) = metadata.price_text() {
        metrics.push(metric("费用", format!("${price}")));
    }
    if let Some(elapsed) = metadata.elapsed_time {
        metrics.push(metric("用时", format!("{elapsed:.2}s")));
    }
    metrics
}

fn parameters(response: &RawResponse) -> Vec<Metric> {
    response
        .input_param_entries()
        .into_iter()
        .map(|(label, value)| Metric { label, value })
        .collect()
}

fn metric(label: &str, value: String) -> Metric {
    Metric {
        label: label.to_string(),
        value,
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Reads the whole response document from `input`.
///
/// # Errors
/// Returns [`AppError::Io`] when the file or stdin cannot be read.
pub fn read_input(input: &InputSource) -> Result<String, AppError> {
    match input {
        InputSource::Path(path) => std::fs::read_to_string(path).map_err(AppError::Io),
        InputSource::Stdin => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(AppError::Io)?;
            Ok(raw)
        }
    }
}

/// Formats a finished document for output.
///
/// # Errors
/// Returns [`AppError::Encode`] when JSON serialization fails.
pub fn format_document(
    document: &DisplayDocument,
    format: OutputFormat,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(render_text(document)),
        OutputFormat::Json => serde_json::to_string_pretty(document).map_err(AppError::Encode),
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Response decoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    /// Invalid configuration or arguments.
    #[error("config error: {0}")]
    Config(String),
    /// Input could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Output could not be encoded.
    #[error("encode error: {0}")]
    Encode(serde_json::Error),
}
