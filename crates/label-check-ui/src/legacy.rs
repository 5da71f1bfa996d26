//! Fixed card/table mapping for the legacy structured report.

use label_check_core::SectionName;
use label_check_report_contract::{
    LegacyIssue, LegacyIssueGroup, LegacyReport, key_badge_color, tag_color,
};

use crate::{
    DisplayBlock, DisplayNode, DisplayPair, Metric, ReportBlock, ReportHeader, TableRow, TaggedText,
};

const DETAIL_COLUMNS: [&str; 5] = ["检测项目", "检测结果", "合规性", "依据标准", "建议"];
const PRIORITY_COLUMNS: [&str; 4] = ["优先级", "问题描述", "涉及项目", "建议措施"];
const UNTITLED_PRODUCT: &str = "未命名产品";
const COMPLIANCE_METRIC: &str = "合规率";

/// Renders the legacy report into a header and body cards.
///
/// A compliance rate that reads as a percentage in `[0, 100]` becomes the
/// single header metric; anything else stays in the assessment card only.
///
/// Card order is fixed: basic info, compliance assessment, detailed results,
/// non-compliance summary, priority ordering. The last two are omitted when
/// empty.
pub fn render_legacy_report(report: &LegacyReport) -> (ReportHeader, Vec<ReportBlock>) {
    let basic = &report.basic_info;
    let compliance = &report.compliance;

    let title = if basic.product_name.trim().is_empty() {
        UNTITLED_PRODUCT.to_string()
    } else {
        basic.product_name.clone()
    };
    let mut tags: Vec<TaggedText> = [&basic.product_type, &basic.package_area]
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| TaggedText::plain(text.as_str()))
        .collect();
    if !compliance.overall_rating.is_empty() {
        tags.push(TaggedText::tagged(
            compliance.overall_rating.as_str(),
            tag_color("总体评级", &compliance.overall_rating),
        ));
    }
    let header = ReportHeader {
        title,
        tags,
        metrics: compliance
            .compliance_percent()
            .map(|percent| Metric {
                label: COMPLIANCE_METRIC.to_string(),
                value: percent_text(percent),
            })
            .into_iter()
            .collect(),
    };

    let mut blocks = vec![
        section(
            SectionName::BasicInfo,
            pairs(&[
                ("产品名称", &basic.product_name),
                ("产品类型", &basic.product_type),
                ("包装面积分类", &basic.package_area),
                ("检测时间", &basic.detected_at),
            ]),
        ),
        section(
            SectionName::ComplianceAssessment,
            pairs(&[
                ("合规率", &compliance.compliance_rate),
                ("总体评级", &compliance.overall_rating),
                ("关键问题", &compliance.key_issues),
                ("一般问题", &compliance.general_issues),
                ("低风险问题", &compliance.low_risk_issues),
            ]),
        ),
        ReportBlock::Table {
            name: SectionName::DetailedResults,
            title: SectionName::DetailedResults.key().to_string(),
            columns: columns(&DETAIL_COLUMNS),
            rows: report
                .detailed_results
                .iter()
                .map(|row| TableRow {
                    cells: vec![
                        TaggedText::plain(row.item.as_str()),
                        TaggedText::tagged(row.result.as_str(), tag_color("检测结果", &row.result)),
                        TaggedText::tagged(
                            row.risk_level.as_str(),
                            tag_color("风险等级", &row.risk_level),
                        ),
                        TaggedText::plain(row.requirement.as_str()),
                        TaggedText::plain(row.advice.as_str()),
                    ],
                    detail: vec![
                        ("实际情况".to_string(), row.actual.clone()),
                        ("问题描述".to_string(), row.problem.clone()),
                    ],
                })
                .collect(),
        },
    ];

    if !report.issue_groups.is_empty() {
        blocks.push(section(
            SectionName::NonComplianceSummary,
            DisplayNode::Pairs(report.issue_groups.iter().map(issue_group).collect()),
        ));
    }

    if !report.priorities.is_empty() {
        blocks.push(ReportBlock::Table {
            name: SectionName::PriorityOrdering,
            title: SectionName::PriorityOrdering.key().to_string(),
            columns: columns(&PRIORITY_COLUMNS),
            rows: report
                .priorities
                .iter()
                .map(|item| TableRow {
                    cells: vec![
                        TaggedText::plain(item.priority.as_str()),
                        TaggedText::plain(item.problem.as_str()),
                        TaggedText::plain(item.involved_item()),
                        TaggedText::plain(item.advice.as_str()),
                    ],
                    detail: Vec::new(),
                })
                .collect(),
        });
    }

    (header, blocks)
}

fn section(name: SectionName, body: DisplayNode) -> ReportBlock {
    ReportBlock::Section {
        name,
        title: name.key().to_string(),
        body,
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

// Blank fields are left out.
fn pairs(fields: &[(&str, &String)]) -> DisplayNode {
    DisplayNode::Pairs(
        fields
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| DisplayPair {
                key: key.to_string(),
                badge: key_badge_color(key),
                value: DisplayNode::Value(TaggedText::tagged(value.as_str(), tag_color(key, value))),
            })
            .collect(),
    )
}

fn issue_group(group: &LegacyIssueGroup) -> DisplayPair {
    DisplayPair {
        key: group.risk_level.clone(),
        badge: key_badge_color(&group.risk_level),
        value: DisplayNode::Blocks(
            group
                .issues
                .iter()
                .enumerate()
                .map(|(index, issue)| DisplayBlock {
                    number: index + 1,
                    body: issue_body(issue),
                })
                .collect(),
        ),
    }
}

fn issue_body(issue: &LegacyIssue) -> DisplayNode {
    pairs(&[
        ("问题项目", &issue.item),
        ("不规范表现", &issue.symptom),
        ("违反条款", &issue.violated_clause),
        ("法律风险", &issue.legal_risk),
        ("整改要求", &issue.requirement),
    ])
}

fn percent_text(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{percent:.0}%")
    } else {
        format!("{percent:.1}%")
    }
}
