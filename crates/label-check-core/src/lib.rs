#![warn(missing_docs)]
//! # label-check-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `label-check` workspace.
//!
//! ## Responsibilities
//! - Decode the backend detection response in both historical shapes.
//! - Name the closed set of report sections and their wire keys.
//! - Select the primary report content from the workflow `outputs` mapping.
//! - Represent the classification of that content.
//!
//! ## Data flow
//! Raw response bytes -> [`parse_raw_response`] -> [`RawResponse`].
//! [`RawResponse::primary_content`] yields a [`PrimaryContent`] that the
//! classifier turns into a [`ClassifiedContent`].
//!
//! ## Ownership and lifetimes
//! Every type owns its strings and JSON values so a decoded response can be
//! dropped as soon as the report document has been built.
//!
//! ## Error model
//! Only decoding the outer document can fail ([`CoreError`]). Missing keys are
//! modeled as `None`/empty values, never as errors.
//!
//! ## Example
//! ```rust
//! use label_check_core::{PrimaryContent, ResponseShape, parse_raw_response};
//!
//! let raw = r##"{"dify_result":{"outputs":{"text":"# Report"}}}"##;
//! let response = parse_raw_response(raw).unwrap();
//! assert_eq!(response.shape(), ResponseShape::Workflow);
//! assert!(matches!(response.primary_content(), PrimaryContent::Text { .. }));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Output field names that may hold the report text, in lookup priority.
///
/// Successive workflow revisions renamed the output variable; the first
/// string-valued entry wins.
pub const PRIMARY_TEXT_FIELDS: [&str; 12] = [
    "text",
    "result",
    "output",
    "content",
    "markdown",
    "检测结果",
    "分析结果",
    "报告",
    "结果",
    "answer",
    "response",
    "detection_result",
];

/// Closed set of report sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionName {
    /// Product identity and detection date.
    BasicInfo,
    /// Overall rating and issue counts.
    ComplianceAssessment,
    /// Non-compliant findings grouped by risk level.
    NonComplianceSummary,
    /// Rectification items ordered by priority.
    PriorityOrdering,
    /// Labeling exemptions that apply to the package.
    ExemptionStatus,
    /// Per-item detection table.
    DetailedResults,
}

impl SectionName {
    /// All sections in fixed display order.
    pub const ALL: [SectionName; 6] = [
        SectionName::BasicInfo,
        SectionName::ComplianceAssessment,
        SectionName::NonComplianceSummary,
        SectionName::PriorityOrdering,
        SectionName::ExemptionStatus,
        SectionName::DetailedResults,
    ];

    /// Exact JSON key the backend uses for this section.
    pub fn key(self) -> &'static str {
        match self {
            SectionName::BasicInfo => "基本信息",
            SectionName::ComplianceAssessment => "合规性评估",
            SectionName::NonComplianceSummary => "不规范内容汇总",
            SectionName::PriorityOrdering => "整改优先级排序",
            SectionName::ExemptionStatus => "豁免情况",
            SectionName::DetailedResults => "详细检测结果",
        }
    }

    /// Stable anchor id for in-page navigation.
    pub fn anchor(self) -> &'static str {
        match self {
            SectionName::BasicInfo => "basic-info",
            SectionName::ComplianceAssessment => "compliance",
            SectionName::NonComplianceSummary => "non-compliant",
            SectionName::PriorityOrdering => "priority",
            SectionName::ExemptionStatus => "exemption",
            SectionName::DetailedResults => "detailed-results",
        }
    }

    /// Resolves a wire key. Matching is exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }
}

/// One named slice of a classified JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section identity.
    pub name: SectionName,
    /// Untyped section body: scalar, mapping, or sequence of mappings.
    pub value: Value,
}

/// Result of classifying the primary report text.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedContent {
    /// Nothing to render.
    Empty,
    /// The whole text parsed as JSON.
    Json(Value),
    /// Plain Markdown without any brace-delimited span.
    Markdown(String),
    /// Text with one or more brace-delimited spans that may hold JSON.
    Mixed {
        /// Full original text.
        text: String,
        /// Brace-delimited substrings found by the non-greedy scan.
        candidates: Vec<String>,
    },
}

impl ClassifiedContent {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifiedContent::Empty => "empty",
            ClassifiedContent::Json(_) => "json",
            ClassifiedContent::Markdown(_) => "markdown",
            ClassifiedContent::Mixed { .. } => "mixed",
        }
    }
}

/// Which historical payload shape a response uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Newer shape wrapping the workflow `outputs` mapping.
    Workflow,
    /// Older fully structured shape with sections at the top level.
    Legacy,
}

/// Workflow run result wrapped by the backend.
///
/// Every field decodes leniently: a value of an unexpected type reads as
/// absent instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Workflow outputs; no schema is guaranteed.
    #[serde(default)]
    pub outputs: Option<Value>,
    /// Usage and timing metrics.
    #[serde(default, deserialize_with = "lenient_object")]
    pub metadata: Option<UsageMetadata>,
    /// Set when the backend recovered from a truncated upstream read.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub read_error_occurred: bool,
}

/// Usage and timing metrics reported for one workflow run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Total tokens consumed; integral numbers or digit strings.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_tokens: Option<u64>,
    /// Total price; the backend sends either a number or a decimal string.
    #[serde(default)]
    pub total_price: Option<Value>,
    /// Wall time in seconds; numbers or numeric strings.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub elapsed_time: Option<f64>,
}

impl UsageMetadata {
    /// Returns `true` when no metric is present.
    pub fn is_empty(&self) -> bool {
        self.total_tokens.is_none() && self.price_text().is_none() && self.elapsed_time.is_none()
    }

    /// Price rendered as text, if it is a number or a non-blank string.
    pub fn price_text(&self) -> Option<String> {
        match self.total_price.as_ref()? {
            Value::Number(number) => Some(number.to_string()),
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        }
    }
}

/// Uploaded file description echoed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Original file name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub filename: Option<String>,
}

/// Backend detection response in either historical shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Workflow result (newer shape).
    #[serde(default, deserialize_with = "lenient_object")]
    pub dify_result: Option<WorkflowResult>,
    /// Uploaded file description.
    #[serde(default, deserialize_with = "lenient_object")]
    pub file_info: Option<FileInfo>,
    /// Form parameters submitted with the detection.
    #[serde(default, deserialize_with = "lenient_object")]
    pub input_params: Option<Map<String, Value>>,
    /// Every other top-level key, including legacy section keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Report content chosen from the workflow outputs.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryContent {
    /// No usable outputs.
    Missing,
    /// A text field to classify.
    Text {
        /// Output field the text came from.
        field: String,
        /// Field value.
        text: String,
    },
    /// No known text field; the outputs value itself is the report.
    Structured(Value),
}

impl RawResponse {
    /// Detects the payload shape.
    ///
    /// A `dify_result` key always selects the workflow shape; otherwise a
    /// top-level basic-info key selects the legacy shape.
    pub fn shape(&self) -> ResponseShape {
        if self.dify_result.is_none() && self.extra.contains_key(SectionName::BasicInfo.key()) {
            ResponseShape::Legacy
        } else {
            ResponseShape::Workflow
        }
    }

    /// Returns the workflow outputs value, if any.
    pub fn outputs(&self) -> Option<&Value> {
        self.dify_result
            .as_ref()
            .and_then(|result| result.outputs.as_ref())
            .filter(|outputs| !outputs.is_null())
    }

    /// Returns the usage metrics, if any.
    pub fn metadata(&self) -> Option<&UsageMetadata> {
        self.dify_result
            .as_ref()
            .and_then(|result| result.metadata.as_ref())
    }

    /// Returns `true` when the backend flagged a truncated upstream read.
    pub fn read_error_occurred(&self) -> bool {
        self.dify_result
            .as_ref()
            .is_some_and(|result| result.read_error_occurred)
    }

    /// Returns the uploaded file name, if known.
    pub fn filename(&self) -> Option<&str> {
        self.file_info
            .as_ref()
            .and_then(|info| info.filename.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Returns one input parameter rendered as text, skipping blank values.
    pub fn input_param(&self, key: &str) -> Option<String> {
        self.input_params
            .as_ref()
            .and_then(|params| params.get(key))
            .and_then(param_text)
    }

    /// Returns non-blank input parameters in submission order.
    pub fn input_param_entries(&self) -> Vec<(String, String)> {
        self.input_params
            .iter()
            .flat_map(|params| params.iter())
            .filter_map(|(key, value)| param_text(value).map(|text| (key.clone(), text)))
            .collect()
    }

    /// Selects the report content from the workflow outputs.
    ///
    /// # Semantics
    /// - Object outputs: first string field from [`PRIMARY_TEXT_FIELDS`];
    ///   otherwise the whole mapping when it is non-empty.
    /// - String outputs: the string itself.
    /// - Absent, null, or empty outputs: [`PrimaryContent::Missing`].
    pub fn primary_content(&self) -> PrimaryContent {
        match self.outputs() {
            None => PrimaryContent::Missing,
            Some(Value::Object(outputs)) => {
                for field in PRIMARY_TEXT_FIELDS {
                    if let Some(Value::String(text)) = outputs.get(field) {
                        if !text.is_empty() {
                            return PrimaryContent::Text {
                                field: field.to_string(),
                                text: text.clone(),
                            };
                        }
                    }
                }
                if outputs.is_empty() {
                    PrimaryContent::Missing
                } else {
                    PrimaryContent::Structured(Value::Object(outputs.clone()))
                }
            }
            Some(Value::String(text)) if text.is_empty() => PrimaryContent::Missing,
            Some(Value::String(text)) => PrimaryContent::Text {
                field: "outputs".to_string(),
                text: text.clone(),
            },
            Some(other) => PrimaryContent::Structured(other.clone()),
        }
    }

    /// Returns the legacy top-level document as one JSON object.
    pub fn legacy_document(&self) -> Value {
        Value::Object(self.extra.clone())
    }
}

fn param_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Decodes a backend response document.
///
/// # Errors
/// Returns [`CoreError::EmptyDocument`] for blank input.
/// Returns [`CoreError::Decode`] when the input is not a JSON object.
/// Known fields with unexpected types never fail decoding.
pub fn parse_raw_response(raw: &str) -> Result<RawResponse, CoreError> {
    if raw.trim().is_empty() {
        return Err(CoreError::EmptyDocument);
    }
    serde_json::from_str(raw).map_err(CoreError::Decode)
}

// Non-object values, and objects that still fail to decode, read as absent.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(seconds.filter(|seconds: &f64| seconds.is_finite() && *seconds >= 0.0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Error type for response decoding.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Response document was blank.
    #[error("response document is empty")]
    EmptyDocument,
    /// JSON decoding error.
    #[error("response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}
