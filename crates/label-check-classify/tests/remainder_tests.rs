//! Integration tests for prose left over after cutting out embedded JSON.

use label_check_classify::{locate_json_object, text_outside};

fn remainder(text: &str) -> String {
    let located = locate_json_object(text).expect("object should be located");
    text_outside(text, located.span)
}

#[test]
fn remainder_tests_keeps_prose_on_both_sides() {
    assert_eq!(
        remainder("## 摘要\n前言 {\"a\":1} 结尾"),
        "## 摘要\n前言\n\n结尾"
    );
}

#[test]
fn remainder_tests_drops_emptied_code_fence() {
    let text = "检测完成。\n```json\n{\"a\":1}\n```\n请及时整改。";
    assert_eq!(remainder(text), "检测完成。\n\n请及时整改。");
}

#[test]
fn remainder_tests_bare_fence_without_language() {
    assert_eq!(remainder("```\n{\"a\":1}\n```"), "");
}

#[test]
fn remainder_tests_is_empty_for_json_only_text() {
    assert_eq!(remainder("  {\"a\":1}  "), "");
}
