//! Tests selection of the primary report content from workflow outputs.

use label_check_core::{PrimaryContent, parse_raw_response};
use serde_json::json;

fn primary(raw: &str) -> PrimaryContent {
    parse_raw_response(raw)
        .expect("payload should decode")
        .primary_content()
}

#[test]
fn primary_content_tests_prefers_higher_priority_field() {
    let content = primary(r#"{"dify_result":{"outputs":{"answer":"late","result":"early"}}}"#);
    assert_eq!(
        content,
        PrimaryContent::Text {
            field: "result".to_string(),
            text: "early".to_string(),
        }
    );
}

#[test]
fn primary_content_tests_skips_non_string_candidates() {
    let content = primary(r#"{"dify_result":{"outputs":{"text":42,"报告":"正文"}}}"#);
    assert_eq!(
        content,
        PrimaryContent::Text {
            field: "报告".to_string(),
            text: "正文".to_string(),
        }
    );
}

#[test]
fn primary_content_tests_falls_back_to_whole_outputs() {
    let content = primary(r#"{"dify_result":{"outputs":{"基本信息":{"产品名称":"A"}}}}"#);
    assert_eq!(
        content,
        PrimaryContent::Structured(json!({"基本信息": {"产品名称": "A"}}))
    );
}

#[test]
fn primary_content_tests_reports_missing_outputs() {
    assert_eq!(primary(r#"{}"#), PrimaryContent::Missing);
    assert_eq!(primary(r#"{"dify_result":{}}"#), PrimaryContent::Missing);
    assert_eq!(primary(r#"{"dify_result":{"outputs":{}}}"#), PrimaryContent::Missing);
    assert_eq!(primary(r#"{"dify_result":{"outputs":""}}"#), PrimaryContent::Missing);
}

#[test]
fn primary_content_tests_accepts_bare_string_outputs() {
    assert_eq!(
        primary(r##"{"dify_result":{"outputs":"# 报告"}}"##),
        PrimaryContent::Text {
            field: "outputs".to_string(),
            text: "# 报告".to_string(),
        }
    );
}
