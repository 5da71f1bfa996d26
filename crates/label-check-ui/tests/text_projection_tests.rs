//! Integration tests for the plain-text projection.

use label_check_core::{ReportSection, SectionName};
use label_check_ui::{DisplayDocument, ReportBlock, ReportHeader, render_text};
use serde_json::json;

#[test]
fn text_projection_tests_prints_pairs_with_tags() {
    let document = DisplayDocument {
        header: ReportHeader {
            title: "食品标签检测完成".to_string(),
            tags: Vec::new(),
            metrics: Vec::new(),
        },
        notices: Vec::new(),
        parameters: Vec::new(),
        blocks: vec![
            ReportBlock::section(&ReportSection {
                name: SectionName::ComplianceAssessment,
                value: json!({"总体评级": "合格", "关键问题": 0}),
            }),
            ReportBlock::missing_section(SectionName::ExemptionStatus),
            ReportBlock::no_results(),
        ],
    };

    let text = render_text(&document);
    assert!(text.starts_with("== 食品标签检测完成 ==\n"));
    assert!(text.contains("-- 合规性评估 --\n总体评级: 合格 [green]\n关键问题 [red]: 0\n"));
    assert!(text.contains("-- 豁免情况 --\n未找到该部分内容\n"));
    assert!(text.contains("! 暂无检测结果\n"));
}
