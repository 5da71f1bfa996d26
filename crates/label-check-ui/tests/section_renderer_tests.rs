//! Integration tests for section rendering and tag colors.

use label_check_core::{ReportSection, SectionName};
use label_check_ui::{DisplayBlock, DisplayNode, TagColor, TaggedText, render_section, render_value};
use serde_json::json;

#[test]
fn section_renderer_tests_mapping_keeps_insertion_order() {
    let section = ReportSection {
        name: SectionName::BasicInfo,
        value: json!({"产品名称": "Test Product", "检测时间": "2024-12-28", "产品类型": "直接消费者"}),
    };

    let DisplayNode::Pairs(pairs) = render_section(&section) else {
        panic!("expected pairs node");
    };
    let keys: Vec<&str> = pairs.iter().map(|pair| pair.key.as_str()).collect();
    assert_eq!(keys, vec!["产品名称", "检测时间", "产品类型"]);
    assert_eq!(
        pairs[0].value,
        DisplayNode::Value(TaggedText::plain("Test Product"))
    );
}

#[test]
fn section_renderer_tests_sequence_of_mappings_numbers_from_one() {
    let section = ReportSection {
        name: SectionName::DetailedResults,
        value: json!([
            {"检测项目": "食品名称", "检测结果": "合格", "风险等级": "无风险"},
            {"检测项目": "配料表", "检测结果": "不合格", "风险等级": "高风险"}
        ]),
    };

    let DisplayNode::Blocks(blocks) = render_section(&section) else {
        panic!("expected blocks node");
    };
    let numbers: Vec<usize> = blocks.iter().map(|block| block.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let DisplayBlock {
        body: DisplayNode::Pairs(second),
        ..
    } = &blocks[1]
    else {
        panic!("expected pairs body");
    };
    assert_eq!(
        second[1].value,
        DisplayNode::Value(TaggedText::tagged("不合格", TagColor::Red))
    );
    assert_eq!(
        second[2].value,
        DisplayNode::Value(TaggedText::tagged("高风险", TagColor::Red))
    );
}

#[test]
fn section_renderer_tests_scalar_section_is_labeled_value() {
    let section = ReportSection {
        name: SectionName::ExemptionStatus,
        value: json!("包装面积小于10cm²，可免除营养成分表"),
    };
    assert_eq!(
        render_section(&section),
        DisplayNode::Value(TaggedText::plain("包装面积小于10cm²，可免除营养成分表"))
    );
}

#[test]
fn section_renderer_tests_numbers_booleans_and_nulls() {
    assert_eq!(
        render_value(Some("关键问题"), &json!(2)),
        DisplayNode::Value(TaggedText::plain("2"))
    );
    assert_eq!(
        render_value(None, &json!(true)),
        DisplayNode::Value(TaggedText::plain("true"))
    );
    assert_eq!(render_value(Some("总体评级"), &json!(null)), DisplayNode::Empty);
    assert_eq!(render_value(None, &json!([])), DisplayNode::Empty);
}

#[test]
fn section_renderer_tests_rating_keys_in_both_languages() {
    let cases = [
        ("riskLevel", "High Risk", TagColor::Red),
        ("riskLevel", "medium risk", TagColor::Orange),
        ("风险等级", "无风险", TagColor::Green),
        ("detectionResult", "compliant", TagColor::Green),
        ("检测结果", "不合格", TagColor::Red),
        ("overallRating", "basically compliant", TagColor::Orange),
        ("总体评级", "待定", TagColor::Neutral),
        ("备注", "不合格", TagColor::Neutral),
    ];

    for (key, value, expected) in cases {
        assert_eq!(
            render_value(Some(key), &json!(value)),
            DisplayNode::Value(TaggedText::tagged(value, expected)),
            "{key}={value}"
        );
    }
}
