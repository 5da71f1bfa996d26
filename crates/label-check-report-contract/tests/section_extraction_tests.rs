//! Integration tests for exact-key section extraction.

use label_check_core::SectionName;
use label_check_report_contract::{extract_named_section, extract_section, extract_sections};
use serde_json::json;

#[test]
fn section_extraction_tests_absent_sections_are_none() {
    let json = json!({"其他": 1});
    for name in SectionName::ALL {
        assert!(extract_section(&json, name).is_none(), "{name:?}");
    }
    assert!(extract_sections(&json).is_empty());
}

#[test]
fn section_extraction_tests_fixed_order_regardless_of_payload_order() {
    let json = json!({
        "详细检测结果": [],
        "豁免情况": "无",
        "基本信息": {"产品名称": "A"},
        "整改优先级排序": null
    });
    let names: Vec<SectionName> = extract_sections(&json)
        .into_iter()
        .map(|section| section.name)
        .collect();
    assert_eq!(
        names,
        vec![
            SectionName::BasicInfo,
            SectionName::ExemptionStatus,
            SectionName::DetailedResults,
        ]
    );
}

#[test]
fn section_extraction_tests_keys_match_exactly() {
    let json = json!({" 基本信息": {}, "基本信息 ": {}});
    assert!(extract_section(&json, SectionName::BasicInfo).is_none());
    assert_eq!(
        extract_named_section(&json!({"合规性评估": {"总体评级": "合格"}}), "合规性评估"),
        Some(&json!({"总体评级": "合格"}))
    );
    assert!(extract_named_section(&json!({"其他": 1}), "其他").is_none());
}

#[test]
fn section_extraction_tests_non_objects_have_no_sections() {
    for json in [json!([{"基本信息": {}}]), json!("基本信息"), json!(3), json!(null)] {
        assert!(extract_sections(&json).is_empty());
    }
}
