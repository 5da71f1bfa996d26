//! Integration tests for the embedded JSON locator.

use label_check_classify::{find_largest_json_object, locate_json_object};
use serde_json::{Value, json};

fn parsed(text: &str) -> Value {
    serde_json::from_str(text).expect("locator output should parse")
}

#[test]
fn locator_tests_outer_object_beats_nested_object() {
    let text = r#"Some preamble {"a":1,"b":{"c":2}} trailing text"#;
    assert_eq!(
        find_largest_json_object(text).as_deref(),
        Some(r#"{"a":1,"b":{"c":2}}"#)
    );
}

#[test]
fn locator_tests_returns_none_for_invalid_spans() {
    assert_eq!(find_largest_json_object("{ invalid json here"), None);
    assert_eq!(find_largest_json_object("{not: json} and {also bad}"), None);
    assert_eq!(find_largest_json_object("no braces at all"), None);
    assert_eq!(find_largest_json_object(""), None);
}

#[test]
fn locator_tests_embedded_value_survives_noise() {
    let payload = json!({
        "基本信息": {"产品名称": "稻香村月饼", "检测时间": "2024-12-28"},
        "详细检测结果": [{"检测项目": "食品名称", "检测结果": "合格"}],
        "note": "braces } inside { strings"
    });
    let serialized = serde_json::to_string_pretty(&payload).expect("payload should serialize");
    let noisy_prefixes = ["", "报告如下：\n", "Here is {the} result ", "}}} "];
    let noisy_suffixes = ["", "\n以上为检测结果。", " {tail", " {} end"];

    for prefix in noisy_prefixes {
        for suffix in noisy_suffixes {
            let text = format!("{prefix}{serialized}{suffix}");
            let found = find_largest_json_object(&text).expect("payload should be located");
            assert_eq!(parsed(&found), payload, "prefix={prefix:?} suffix={suffix:?}");
        }
    }
}

#[test]
fn locator_tests_longest_valid_span_wins_over_first() {
    let text = r#"first {"a":1} then {"b":2,"c":[1,2,3]} done"#;
    assert_eq!(
        find_largest_json_object(text).as_deref(),
        Some(r#"{"b":2,"c":[1,2,3]}"#)
    );
}

#[test]
fn locator_tests_equal_lengths_prefer_leftmost() {
    let text = r#"{"a":1} {"b":2}"#;
    let located = locate_json_object(text).expect("object should be located");
    assert_eq!(located.span, 0..7);
    assert_eq!(located.value, json!({"a": 1}));
}

#[test]
fn locator_tests_recovers_object_nested_in_broken_span() {
    let text = r#"{ summary: {"总体评级": "基本合格"} }"#;
    let found = find_largest_json_object(text).expect("nested object should be located");
    assert_eq!(parsed(&found), json!({"总体评级": "基本合格"}));
}

#[test]
fn locator_tests_recovers_object_after_unclosed_brace() {
    let text = r#"draft { unfinished ... final {"ok": true}"#;
    let located = locate_json_object(text).expect("object should be located");
    assert_eq!(located.value, json!({"ok": true}));
    assert_eq!(&text[located.span], r#"{"ok": true}"#);
}

#[test]
fn locator_tests_skips_long_runs_of_unclosed_braces() {
    let text = format!("{}{{\"a\":1}}", "{ ".repeat(2_000));
    let located = locate_json_object(&text).expect("object should be located");
    assert_eq!(located.value, json!({"a": 1}));
    assert_eq!(located.span, 4_000..text.len());
}

#[test]
fn locator_tests_stray_quote_in_prose_does_not_hide_object() {
    let text = "{ 备注 \"未闭合\n{\"ok\": true} }";
    let found = find_largest_json_object(text).expect("object should be located");
    assert_eq!(parsed(&found), json!({"ok": true}));
}
