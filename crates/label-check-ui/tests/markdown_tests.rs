//! Integration tests for Markdown structure extraction.

use label_check_ui::{MarkdownElement, Notice, NoticeLevel, parse_markdown};

#[test]
fn markdown_tests_extracts_gfm_table() {
    let source = "| 检测项目 | 检测结果 |\n| --- | --- |\n| 食品名称 | 合格 |\n| 配料表 | 不合格 |\n";
    assert_eq!(
        parse_markdown(source),
        vec![MarkdownElement::Table {
            header: vec!["检测项目".to_string(), "检测结果".to_string()],
            rows: vec![
                vec!["食品名称".to_string(), "合格".to_string()],
                vec!["配料表".to_string(), "不合格".to_string()],
            ],
        }]
    );
}

#[test]
fn markdown_tests_keeps_code_language_and_body() {
    let source = "```json\n{\"a\": 1}\n```\n";
    assert_eq!(
        parse_markdown(source),
        vec![MarkdownElement::CodeBlock {
            language: Some("json".to_string()),
            code: "{\"a\": 1}".to_string(),
        }]
    );
}

#[test]
fn markdown_tests_folds_quote_paragraphs_into_info_notice() {
    let source = "> 注意：\n>\n> 请核对生产日期。\n\n---\n";
    let elements = parse_markdown(source);
    assert_eq!(
        elements,
        vec![
            MarkdownElement::Quote(Notice::info("注意：\n\n请核对生产日期。")),
            MarkdownElement::Rule,
        ]
    );
    let MarkdownElement::Quote(notice) = &elements[0] else {
        panic!("expected quote notice");
    };
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.description, None);
}

#[test]
fn markdown_tests_heading_inside_list_item_stays_in_item() {
    let source = "- 配料表\n  # 说明\n- 日期\n";
    assert_eq!(
        parse_markdown(source),
        vec![MarkdownElement::List {
            ordered: false,
            items: vec!["配料表\n说明".to_string(), "日期".to_string()],
        }]
    );
}

#[test]
fn markdown_tests_code_inside_list_item_keeps_source_order() {
    let source = "- 步骤\n\n  ```sh\n  run\n  ```\n\n结束\n";
    assert_eq!(
        parse_markdown(source),
        vec![
            MarkdownElement::List {
                ordered: false,
                items: vec!["步骤\nrun".to_string()],
            },
            MarkdownElement::Paragraph("结束".to_string()),
        ]
    );
}

#[test]
fn markdown_tests_ordered_list_and_inline_code() {
    let source = "## 整改建议\n\n1. 补充 `致敏物质` 提示\n2. 更正日期格式\n";
    assert_eq!(
        parse_markdown(source),
        vec![
            MarkdownElement::Heading {
                level: 2,
                text: "整改建议".to_string(),
            },
            MarkdownElement::List {
                ordered: true,
                items: vec!["补充 致敏物质 提示".to_string(), "更正日期格式".to_string()],
            },
        ]
    );
}

#[test]
fn markdown_tests_empty_source_has_no_elements() {
    assert!(parse_markdown("").is_empty());
}
