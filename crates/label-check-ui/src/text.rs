//! Plain-text projection of a display document.

use crate::{
    DisplayDocument, DisplayNode, Notice, NoticeLevel, ReportBlock, TagColor, TaggedText,
};

const INDENT: &str = "  ";

/// Renders a document as indented plain text.
///
/// Non-neutral tags are shown as a bracketed color after the value, for
/// example `总体评级: 合格 [green]`.
pub fn render_text(document: &DisplayDocument) -> String {
    let mut out = String::new();

    out.push_str(&format!("== {} ==\n", document.header.title));
    if !document.header.tags.is_empty() {
        let tags: Vec<String> = document.header.tags.iter().map(tagged).collect();
        out.push_str(&tags.join(" / "));
        out.push('\n');
    }
    for metric in &document.header.metrics {
        out.push_str(&format!("{}: {}\n", metric.label, metric.value));
    }
    for notice in &document.notices {
        push_notice(&mut out, notice);
    }

    if !document.parameters.is_empty() {
        out.push_str("\n-- 检测参数 --\n");
        for parameter in &document.parameters {
            out.push_str(&format!("{}: {}\n", parameter.label, parameter.value));
        }
    }

    for block in &document.blocks {
        out.push('\n');
        push_block(&mut out, block);
    }
    out
}

fn push_block(out: &mut String, block: &ReportBlock) {
    match block {
        ReportBlock::Section { title, body, .. } => {
            out.push_str(&format!("-- {title} --\n"));
            push_node(out, body, 0);
        }
        ReportBlock::MissingSection { title, message, .. } => {
            out.push_str(&format!("-- {title} --\n{message}\n"));
        }
        ReportBlock::Table {
            title,
            columns,
            rows,
            ..
        } => {
            out.push_str(&format!("-- {title} --\n"));
            out.push_str(&columns.join(" | "));
            out.push('\n');
            for row in rows {
                let cells: Vec<String> = row.cells.iter().map(tagged).collect();
                out.push_str(&cells.join(" | "));
                out.push('\n');
                for (label, value) in row.detail.iter().filter(|(_, value)| !value.is_empty()) {
                    out.push_str(&format!("{INDENT}{label}: {value}\n"));
                }
            }
        }
        ReportBlock::Markdown { source, .. } => {
            out.push_str(source.trim_end());
            out.push('\n');
        }
        ReportBlock::Placeholder { notice } => push_notice(out, notice),
        ReportBlock::RawOutputs { json } => {
            out.push_str("-- 原始输出 --\n");
            out.push_str(json);
            out.push('\n');
        }
    }
}

fn push_notice(out: &mut String, notice: &Notice) {
    let marker = match notice.level {
        NoticeLevel::Info => "i",
        NoticeLevel::Warning => "!",
    };
    out.push_str(&format!("{marker} {}\n", notice.message));
    if let Some(description) = &notice.description {
        out.push_str(&format!("{INDENT}{description}\n"));
    }
}

fn push_node(out: &mut String, node: &DisplayNode, depth: usize) {
    let indent = INDENT.repeat(depth);
    match node {
        DisplayNode::Empty => out.push_str(&format!("{indent}-\n")),
        DisplayNode::Value(value) => out.push_str(&format!("{indent}{}\n", tagged(value))),
        DisplayNode::Pairs(pairs) => {
            for pair in pairs {
                let key = match pair.badge {
                    TagColor::Neutral => pair.key.clone(),
                    badge => format!("{} [{}]", pair.key, color_name(badge)),
                };
                match &pair.value {
                    DisplayNode::Value(value) => {
                        out.push_str(&format!("{indent}{key}: {}\n", tagged(value)));
                    }
                    DisplayNode::Empty => out.push_str(&format!("{indent}{key}: -\n")),
                    nested => {
                        out.push_str(&format!("{indent}{key}:\n"));
                        push_node(out, nested, depth + 1);
                    }
                }
            }
        }
        DisplayNode::Blocks(blocks) => {
            for block in blocks {
                out.push_str(&format!("{indent}#{}\n", block.number));
                push_node(out, &block.body, depth + 1);
            }
        }
        DisplayNode::List(items) => {
            for item in items {
                match item {
                    DisplayNode::Value(value) => {
                        out.push_str(&format!("{indent}- {}\n", tagged(value)));
                    }
                    nested => push_node(out, nested, depth + 1),
                }
            }
        }
    }
}

fn tagged(text: &TaggedText) -> String {
    match text.tag {
        TagColor::Neutral => text.text.clone(),
        tag => format!("{} [{}]", text.text, color_name(tag)),
    }
}

fn color_name(tag: TagColor) -> &'static str {
    match tag {
        TagColor::Red => "red",
        TagColor::Orange => "orange",
        TagColor::Green => "green",
        TagColor::Neutral => "neutral",
    }
}
