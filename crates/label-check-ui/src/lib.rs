#![warn(missing_docs)]
//! # label-check-ui
//!
//! ## Purpose
//! Defines the display document tree consumed by the UI layer and the
//! renderers that produce it.
//!
//! ## Responsibilities
//! - Render untyped section values into [`DisplayNode`] trees with tag
//!   colors.
//! - Parse Markdown into structural [`MarkdownElement`]s.
//! - Map the legacy structured report onto fixed cards and tables.
//! - Project a [`DisplayDocument`] into plain text for terminals.
//!
//! ## Data flow
//! Extracted sections / Markdown text / legacy report -> renderers ->
//! [`ReportBlock`]s, assembled into a [`DisplayDocument`] by the report view.
//!
//! ## Ownership and lifetimes
//! Every node owns its text so a document outlives the response it was built
//! from and can be serialized as-is.
//!
//! ## Error model
//! Rendering is total: every JSON shape has a branch and nothing fails.

mod legacy;
mod markdown;
mod text;

pub use label_check_report_contract::TagColor;
pub use legacy::render_legacy_report;
pub use markdown::{MarkdownElement, parse_markdown};
pub use text::render_text;

use label_check_core::{ReportSection, SectionName};
use label_check_report_contract::{key_badge_color, tag_color, value_text};
use serde::Serialize;
use serde_json::Value;

/// Message shown when a response carries no results.
pub const NO_RESULTS_MESSAGE: &str = "暂无检测结果";
/// Follow-up hint shown with [`NO_RESULTS_MESSAGE`].
pub const NO_RESULTS_DESCRIPTION: &str = "检测可能尚未完成或出现了问题，请稍后重试。";
/// Message shown in place of an absent section.
pub const SECTION_NOT_FOUND_MESSAGE: &str = "未找到该部分内容";

/// Rendered form of one JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum DisplayNode {
    /// `null` or an empty sequence.
    Empty,
    /// Scalar value with its tag color.
    Value(TaggedText),
    /// Mapping entries in insertion order.
    Pairs(Vec<DisplayPair>),
    /// Sequence of mappings, one numbered block per element.
    Blocks(Vec<DisplayBlock>),
    /// Sequence containing scalars or mixed shapes.
    List(Vec<DisplayNode>),
}

/// Text with a tag color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedText {
    /// Display text.
    pub text: String,
    /// Tag color.
    pub tag: TagColor,
}

impl TaggedText {
    /// Creates neutral text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: TagColor::Neutral,
        }
    }

    /// Creates text tagged with `tag`.
    pub fn tagged(text: impl Into<String>, tag: TagColor) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

/// One mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPair {
    /// Mapping key.
    pub key: String,
    /// Badge color of the key itself (issue classes only).
    pub badge: TagColor,
    /// Rendered value.
    pub value: DisplayNode,
}

/// One element of a sequence of mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBlock {
    /// Position, starting at 1.
    pub number: usize,
    /// Rendered element.
    pub body: DisplayNode,
}

/// Renders a JSON value found under `key`.
///
/// # Semantics
/// - Scalars become [`DisplayNode::Value`], tagged by [`tag_color`] of the
///   enclosing key.
/// - Mappings become [`DisplayNode::Pairs`] in insertion order.
/// - Non-empty sequences of mappings become numbered [`DisplayNode::Blocks`].
/// - Other sequences become [`DisplayNode::List`]; items inherit `key`.
pub fn render_value(key: Option<&str>, value: &Value) -> DisplayNode {
    match value {
        Value::Null => DisplayNode::Empty,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            let text = value_text(value);
            let tag = key.map_or(TagColor::Neutral, |key| tag_color(key, &text));
            DisplayNode::Value(TaggedText { text, tag })
        }
        Value::Object(map) => DisplayNode::Pairs(
            map.iter()
                .map(|(entry_key, entry_value)| DisplayPair {
                    key: entry_key.clone(),
                    badge: key_badge_color(entry_key),
                    value: render_value(Some(entry_key), entry_value),
                })
                .collect(),
        ),
        Value::Array(items) if items.is_empty() => DisplayNode::Empty,
        Value::Array(items) if items.iter().all(Value::is_object) => DisplayNode::Blocks(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| DisplayBlock {
                    number: index + 1,
                    body: render_value(key, item),
                })
                .collect(),
        ),
        Value::Array(items) => {
            DisplayNode::List(items.iter().map(|item| render_value(key, item)).collect())
        }
    }
}

/// Renders one extracted report section.
pub fn render_section(section: &ReportSection) -> DisplayNode {
    render_value(Some(section.name.key()), &section.value)
}

/// One titled row of a fixed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Cells in column order.
    pub cells: Vec<TaggedText>,
    /// Expandable row detail as label/value pairs.
    pub detail: Vec<(String, String)>,
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Degraded or incomplete result.
    Warning,
}

/// Alert-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Headline.
    pub message: String,
    /// Optional follow-up text.
    pub description: Option<String>,
}

impl Notice {
    /// Informational notice without follow-up text.
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
            description: None,
        }
    }

    /// Warning with a follow-up hint.
    pub fn warning(message: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
            description: Some(description.into()),
        }
    }
}

/// One card of the report body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBlock {
    /// A recognized report section.
    Section {
        /// Section identity.
        name: SectionName,
        /// Card title.
        title: String,
        /// Rendered body.
        body: DisplayNode,
    },
    /// Placeholder for a section the response does not carry.
    MissingSection {
        /// Section identity.
        name: SectionName,
        /// Card title.
        title: String,
        /// Placeholder text.
        message: String,
    },
    /// Fixed-column table.
    Table {
        /// Section the table renders.
        name: SectionName,
        /// Card title.
        title: String,
        /// Column headers.
        columns: Vec<String>,
        /// Rows.
        rows: Vec<TableRow>,
    },
    /// Free-form Markdown.
    Markdown {
        /// Original Markdown source.
        source: String,
        /// Parsed structure.
        elements: Vec<MarkdownElement>,
    },
    /// Single "no results" placeholder.
    Placeholder {
        /// Placeholder notice.
        notice: Notice,
    },
    /// Pretty-printed raw workflow outputs.
    RawOutputs {
        /// Pretty JSON text.
        json: String,
    },
}

impl ReportBlock {
    /// Builds a section card from an extracted section.
    pub fn section(section: &ReportSection) -> Self {
        ReportBlock::Section {
            name: section.name,
            title: section.name.key().to_string(),
            body: render_section(section),
        }
    }

    /// Builds the placeholder card for an absent section.
    pub fn missing_section(name: SectionName) -> Self {
        ReportBlock::MissingSection {
            name,
            title: name.key().to_string(),
            message: SECTION_NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// Builds a Markdown card.
    pub fn markdown(source: impl Into<String>) -> Self {
        let source = source.into();
        let elements = parse_markdown(&source);
        ReportBlock::Markdown { source, elements }
    }

    /// Builds the "no results" placeholder card.
    pub fn no_results() -> Self {
        ReportBlock::Placeholder {
            notice: Notice::warning(NO_RESULTS_MESSAGE, NO_RESULTS_DESCRIPTION),
        }
    }
}

/// Label/value line in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    /// Label.
    pub label: String,
    /// Value text.
    pub value: String,
}

/// Report header card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    /// Headline.
    pub title: String,
    /// Tags shown under the headline.
    pub tags: Vec<TaggedText>,
    /// Usage and timing metrics.
    pub metrics: Vec<Metric>,
}

/// Complete renderable report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDocument {
    /// Header card.
    pub header: ReportHeader,
    /// Notices shown above the body.
    pub notices: Vec<Notice>,
    /// Submitted detection parameters.
    pub parameters: Vec<Metric>,
    /// Body cards in display order.
    pub blocks: Vec<ReportBlock>,
}

impl DisplayDocument {
    /// Returns the body card for `name`, if rendered.
    pub fn section(&self, name: SectionName) -> Option<&ReportBlock> {
        self.blocks.iter().find(|block| match block {
            ReportBlock::Section { name: found, .. }
            | ReportBlock::MissingSection { name: found, .. }
            | ReportBlock::Table { name: found, .. } => *found == name,
            _ => false,
        })
    }
}
