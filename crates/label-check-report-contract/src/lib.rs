#![warn(missing_docs)]
//! # label-check-report-contract
//!
//! ## Purpose
//! Defines what the client recognizes inside a compliance report: the named
//! sections, the tag colors of rating values, and the legacy structured
//! payload.
//!
//! ## Responsibilities
//! - Extract report sections by exact key lookup.
//! - Map rating and risk values to UI-safe tag colors.
//! - Decode the legacy structured report with lenient field typing.
//!
//! ## Data flow
//! Classified JSON -> [`extract_sections`] -> per-section rendering.
//! Legacy document -> [`parse_legacy_report`] -> fixed table rendering.
//!
//! ## Ownership and lifetimes
//! Lookups borrow from the classified value; extracted sections and legacy
//! reports are owned.
//!
//! ## Error model
//! Absent sections are `None`, never errors. Only the legacy decoder fails,
//! with [`ContractError`], when a section has an unusable type.

use label_check_core::{ReportSection, SectionName};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Display color category for a tagged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagColor {
    /// Non-compliant or high risk.
    Red,
    /// Partially compliant or moderate risk.
    Orange,
    /// Compliant or risk free.
    Green,
    /// No rating semantics.
    Neutral,
}

/// Keys whose values carry a rating.
pub const TAGGED_KEYS: [&str; 6] = [
    "riskLevel",
    "风险等级",
    "detectionResult",
    "检测结果",
    "overallRating",
    "总体评级",
];

// Ordered most specific first: "不合格" and "基本合格" both contain "合格".
const VALUE_RULES: [(&str, TagColor); 16] = [
    ("non-compliant", TagColor::Red),
    ("noncompliant", TagColor::Red),
    ("不合格", TagColor::Red),
    ("high risk", TagColor::Red),
    ("高风险", TagColor::Red),
    ("basically compliant", TagColor::Orange),
    ("partially compliant", TagColor::Orange),
    ("基本合格", TagColor::Orange),
    ("medium risk", TagColor::Orange),
    ("中风险", TagColor::Orange),
    ("low risk", TagColor::Orange),
    ("低风险", TagColor::Orange),
    ("no risk", TagColor::Green),
    ("无风险", TagColor::Green),
    ("compliant", TagColor::Green),
    ("合格", TagColor::Green),
];

const KEY_BADGE_RULES: [(&str, TagColor); 5] = [
    ("高风险问题", TagColor::Red),
    ("中风险问题", TagColor::Orange),
    ("低风险问题", TagColor::Green),
    ("关键问题", TagColor::Red),
    ("一般问题", TagColor::Orange),
];

const INVOLVED_ITEM_RULES: [(&str, &str); 4] = [
    ("日期", "日期标示"),
    ("配料", "配料表规范"),
    ("致敏", "致敏物质提示"),
    ("标准", "产品标准代号"),
];

/// Fallback label when no involved-item keyword matches.
pub const INVOLVED_ITEM_OTHER: &str = "其他";

/// Returns the tag color for one key/value pair.
///
/// Total: untagged keys and unknown values are [`TagColor::Neutral`].
/// Key matching is exact; value matching is a case-insensitive substring
/// test against an ordered table.
pub fn tag_color(key: &str, value: &str) -> TagColor {
    if !TAGGED_KEYS.contains(&key) {
        return TagColor::Neutral;
    }

    let normalized = value.trim().to_lowercase();
    VALUE_RULES
        .iter()
        .find(|(needle, _)| normalized.contains(needle))
        .map(|(_, color)| *color)
        .unwrap_or(TagColor::Neutral)
}

/// Returns the badge color for a key that names an issue class.
///
/// Covers the non-compliance group keys and the issue counters of the
/// compliance assessment; every other key is [`TagColor::Neutral`].
pub fn key_badge_color(key: &str) -> TagColor {
    KEY_BADGE_RULES
        .iter()
        .find(|(badge_key, _)| *badge_key == key)
        .map(|(_, color)| *color)
        .unwrap_or(TagColor::Neutral)
}

/// Infers which label element a rectification item concerns.
pub fn involved_item(problem: &str) -> &'static str {
    INVOLVED_ITEM_RULES
        .iter()
        .find(|(keyword, _)| problem.contains(keyword))
        .map(|(_, item)| *item)
        .unwrap_or(INVOLVED_ITEM_OTHER)
}

/// Looks up one section in a classified JSON value.
///
/// Non-object values have no sections; a `null` section counts as absent.
pub fn extract_section(json: &Value, name: SectionName) -> Option<&Value> {
    json.as_object()?
        .get(name.key())
        .filter(|value| !value.is_null())
}

/// Looks up a section by its wire key.
///
/// Keys outside the fixed section list are always absent.
pub fn extract_named_section<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    extract_section(json, SectionName::from_key(key)?)
}

/// Extracts every present section in fixed display order.
pub fn extract_sections(json: &Value) -> Vec<ReportSection> {
    SectionName::ALL
        .into_iter()
        .filter_map(|name| {
            extract_section(json, name).map(|value| ReportSection {
                name,
                value: value.clone(),
            })
        })
        .collect()
}

/// Renders a JSON value as display text.
///
/// Strings are returned verbatim, `null` as an empty string, anything else as
/// compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Legacy fully structured report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyReport {
    /// Product identity.
    #[serde(rename = "基本信息")]
    pub basic_info: LegacyBasicInfo,
    /// Overall assessment.
    #[serde(rename = "合规性评估")]
    pub compliance: LegacyCompliance,
    /// Per-item detection rows.
    #[serde(rename = "详细检测结果", deserialize_with = "lenient_list")]
    pub detailed_results: Vec<LegacyDetailRow>,
    /// Findings grouped by risk level, in payload order.
    #[serde(rename = "不规范内容汇总", deserialize_with = "lenient_groups")]
    pub issue_groups: Vec<LegacyIssueGroup>,
    /// Rectification items ordered by priority.
    #[serde(rename = "整改优先级排序", deserialize_with = "lenient_list")]
    pub priorities: Vec<LegacyPriorityItem>,
}

/// Legacy basic-info block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyBasicInfo {
    /// Product name.
    #[serde(rename = "产品名称", deserialize_with = "lenient_text")]
    pub product_name: String,
    /// Consumer category.
    #[serde(rename = "产品类型", deserialize_with = "lenient_text")]
    pub product_type: String,
    /// Package area class.
    #[serde(rename = "包装面积分类", deserialize_with = "lenient_text")]
    pub package_area: String,
    /// Detection date.
    #[serde(rename = "检测时间", deserialize_with = "lenient_text")]
    pub detected_at: String,
}

/// Legacy compliance assessment block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyCompliance {
    /// Overall rating such as `合格` or `基本合格`.
    #[serde(rename = "总体评级", deserialize_with = "lenient_text")]
    pub overall_rating: String,
    /// Key issue count.
    #[serde(rename = "关键问题", deserialize_with = "lenient_text")]
    pub key_issues: String,
    /// General issue count.
    #[serde(rename = "一般问题", deserialize_with = "lenient_text")]
    pub general_issues: String,
    /// Low-risk issue count.
    #[serde(rename = "低风险问题", deserialize_with = "lenient_text")]
    pub low_risk_issues: String,
    /// Compliance rate such as `75%`.
    #[serde(rename = "合规率", deserialize_with = "lenient_text")]
    pub compliance_rate: String,
}

impl LegacyCompliance {
    /// Parses the compliance rate into a percentage in `[0, 100]`.
    pub fn compliance_percent(&self) -> Option<f64> {
        let percent: f64 = self
            .compliance_rate
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse()
            .ok()?;
        (0.0..=100.0).contains(&percent).then_some(percent)
    }
}

/// One legacy detailed-result row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyDetailRow {
    /// Check category.
    #[serde(rename = "检测类别", deserialize_with = "lenient_text")]
    pub category: String,
    /// Checked item.
    #[serde(rename = "检测项目", deserialize_with = "lenient_text")]
    pub item: String,
    /// Standard requirement.
    #[serde(rename = "标准要求", deserialize_with = "lenient_text")]
    pub requirement: String,
    /// Detection result.
    #[serde(rename = "检测结果", deserialize_with = "lenient_text")]
    pub result: String,
    /// Observed label content.
    #[serde(rename = "实际情况", deserialize_with = "lenient_text")]
    pub actual: String,
    /// Problem description.
    #[serde(rename = "问题描述", deserialize_with = "lenient_text")]
    pub problem: String,
    /// Risk level.
    #[serde(rename = "风险等级", deserialize_with = "lenient_text")]
    pub risk_level: String,
    /// Rectification advice.
    #[serde(rename = "整改建议", deserialize_with = "lenient_text")]
    pub advice: String,
}

/// Non-compliant findings for one risk level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyIssueGroup {
    /// Group key such as `高风险问题`.
    pub risk_level: String,
    /// Findings in payload order.
    pub issues: Vec<LegacyIssue>,
}

/// One non-compliant finding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyIssue {
    /// Affected item.
    #[serde(rename = "问题项目", deserialize_with = "lenient_text")]
    pub item: String,
    /// How the label deviates.
    #[serde(rename = "不规范表现", deserialize_with = "lenient_text")]
    pub symptom: String,
    /// Violated clause.
    #[serde(rename = "违反条款", deserialize_with = "lenient_text")]
    pub violated_clause: String,
    /// Legal exposure.
    #[serde(rename = "法律风险", deserialize_with = "lenient_text")]
    pub legal_risk: String,
    /// Required fix.
    #[serde(rename = "整改要求", deserialize_with = "lenient_text")]
    pub requirement: String,
}

/// One rectification item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyPriorityItem {
    /// Priority rank.
    #[serde(rename = "优先级", deserialize_with = "lenient_text")]
    pub priority: String,
    /// Problem description.
    #[serde(rename = "问题", deserialize_with = "lenient_text")]
    pub problem: String,
    /// Suggested action.
    #[serde(rename = "整改建议", deserialize_with = "lenient_text")]
    pub advice: String,
}

impl LegacyPriorityItem {
    /// Label element this item concerns, inferred from the problem text.
    pub fn involved_item(&self) -> &'static str {
        involved_item(&self.problem)
    }
}

/// Decodes the legacy structured report.
///
/// # Errors
/// Returns [`ContractError::InvalidContract`] when the basic-info section is
/// missing or not an object.
/// Returns [`ContractError::Decode`] when another section has an unusable
/// type (for example a string where an object is expected).
pub fn parse_legacy_report(document: &Value) -> Result<LegacyReport, ContractError> {
    if !extract_section(document, SectionName::BasicInfo).is_some_and(Value::is_object) {
        return Err(ContractError::InvalidContract(format!(
            "{} must be an object",
            SectionName::BasicInfo.key()
        )));
    }

    LegacyReport::deserialize(document).map_err(ContractError::Decode)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_rows(value))
}

fn lenient_groups<'de, D>(deserializer: D) -> Result<Vec<LegacyIssueGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let groups = match value {
        Value::Object(map) => groups_from_map(map),
        _ => Vec::new(),
    };
    Ok(groups)
}

fn groups_from_map(map: Map<String, Value>) -> Vec<LegacyIssueGroup> {
    map.into_iter()
        .map(|(risk_level, issues)| LegacyIssueGroup {
            risk_level,
            issues: decode_rows(issues),
        })
        .filter(|group| !group.issues.is_empty())
        .collect()
}

// Rows that are not objects are dropped.
fn decode_rows<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Report contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("report decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Payload violates contract invariants.
    #[error("report contract violation: {0}")]
    InvalidContract(String),
}
