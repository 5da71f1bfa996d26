//! Markdown structure extraction.
//!
//! Uses pulldown-cmark with GFM tables so hosts get headings, tables and code
//! blocks as data instead of re-parsing the text.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use serde::Serialize;

use crate::Notice;

/// Block-level Markdown element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MarkdownElement {
    /// ATX or setext heading.
    Heading {
        /// Level 1-6.
        level: u8,
        /// Heading text.
        text: String,
    },
    /// Paragraph text.
    Paragraph(String),
    /// Fenced or indented code.
    CodeBlock {
        /// Info-string language, if any.
        language: Option<String>,
        /// Code text.
        code: String,
    },
    /// Block quote, shown as an info notice.
    Quote(Notice),
    /// Flattened list; nested items are indented by two spaces per level.
    /// Block content inside an item (paragraphs, headings, code) is joined
    /// into the item text line by line.
    List {
        /// Ordered list marker.
        ordered: bool,
        /// Item texts.
        items: Vec<String>,
    },
    /// GFM table.
    Table {
        /// Header cells.
        header: Vec<String>,
        /// Body rows.
        rows: Vec<Vec<String>>,
    },
    /// Thematic break.
    Rule,
}

/// Parses Markdown into block elements.
pub fn parse_markdown(source: &str) -> Vec<MarkdownElement> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = Builder::default();
    for event in Parser::new_ext(source, options) {
        builder.event(event);
    }
    builder.flush_inline();
    builder.elements
}

#[derive(Debug)]
enum Open {
    Heading(u8),
    Paragraph,
    Quote,
    Code,
    List,
    Item,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Html,
    Inline,
}

// Block containers whose children are folded into plain text.
#[derive(Debug)]
enum Container {
    Quote(Vec<String>),
    List { ordered: bool, items: Vec<String> },
    Item(Vec<String>),
}

#[derive(Debug, Default)]
struct TableFrame {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
}

#[derive(Debug, Default)]
struct Builder {
    elements: Vec<MarkdownElement>,
    open: Vec<Open>,
    text: String,
    code: Option<(Option<String>, String)>,
    table: Option<TableFrame>,
    containers: Vec<Container>,
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => match &mut self.code {
                Some((_, code)) => code.push_str(&text),
                None => self.text.push_str(&text),
            },
            Event::Code(code) => self.text.push_str(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.text.push_str(&html),
            Event::SoftBreak | Event::HardBreak => self.text.push('\n'),
            Event::TaskListMarker(checked) => {
                self.text.push_str(if checked { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(label) => {
                self.text.push_str("[^");
                self.text.push_str(&label);
                self.text.push(']');
            }
            Event::Rule => {
                self.flush_inline();
                self.emit(MarkdownElement::Rule);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Heading { level, .. } => {
                self.flush_inline();
                Open::Heading(level as u8)
            }
            Tag::Paragraph => {
                self.flush_inline();
                Open::Paragraph
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.containers.push(Container::Quote(Vec::new()));
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
                Open::Code
            }
            Tag::List(first) => {
                self.flush_inline();
                self.containers.push(Container::List {
                    ordered: first.is_some(),
                    items: Vec::new(),
                });
                Open::List
            }
            Tag::Item => {
                self.flush_inline();
                self.containers.push(Container::Item(Vec::new()));
                Open::Item
            }
            Tag::Table(_) => {
                self.flush_inline();
                self.table = Some(TableFrame::default());
                Open::Table
            }
            Tag::TableHead => Open::TableHead,
            Tag::TableRow => Open::TableRow,
            Tag::TableCell => {
                self.text.clear();
                Open::TableCell
            }
            Tag::HtmlBlock => {
                self.flush_inline();
                Open::Html
            }
            _ => Open::Inline,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };

        match open {
            Open::Heading(level) => {
                let text = self.take_text();
                self.emit(MarkdownElement::Heading { level, text });
            }
            Open::Paragraph | Open::Html => self.flush_inline(),
            Open::Quote => {
                self.flush_inline();
                if let Some(Container::Quote(parts)) = self.containers.pop() {
                    let text = parts.join("\n\n");
                    if !text.is_empty() {
                        self.emit(MarkdownElement::Quote(Notice::info(text)));
                    }
                }
            }
            Open::Code => {
                if let Some((language, code)) = self.code.take() {
                    self.emit(MarkdownElement::CodeBlock {
                        language,
                        code: code.trim_end_matches('\n').to_string(),
                    });
                }
            }
            Open::Item => {
                self.flush_inline();
                if let Some(Container::Item(parts)) = self.containers.pop() {
                    self.push_item(parts);
                }
            }
            Open::List => {
                if let Some(Container::List { ordered, items }) = self.containers.pop() {
                    self.close_list(ordered, items);
                }
            }
            Open::TableCell => {
                let text = self.take_text();
                if let Some(table) = &mut self.table {
                    table.row.push(text);
                }
            }
            Open::TableHead => {
                if let Some(table) = &mut self.table {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            Open::TableRow => {
                if let Some(table) = &mut self.table {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            Open::Table => {
                if let Some(table) = self.table.take() {
                    self.emit(MarkdownElement::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            Open::Inline => {}
        }
    }

    // A nested list is spliced into the enclosing list after the text its
    // item has collected so far, so item order follows the source.
    fn close_list(&mut self, ordered: bool, items: Vec<String>) {
        match self.containers.last_mut() {
            Some(Container::Item(parts)) => {
                let parts = std::mem::take(parts);
                self.push_item(parts);
                self.push_items(items);
            }
            _ => self.emit(MarkdownElement::List { ordered, items }),
        }
    }

    fn push_item(&mut self, parts: Vec<String>) {
        if parts.is_empty() {
            return;
        }
        let depth = self
            .containers
            .iter()
            .filter(|container| matches!(container, Container::List { .. }))
            .count();
        let indent = "  ".repeat(depth.saturating_sub(1));
        let text = parts
            .join("\n")
            .lines()
            .map(|line| format!("{indent}{line}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.push_items(vec![text]);
    }

    fn push_items(&mut self, new_items: Vec<String>) {
        let list = self
            .containers
            .iter_mut()
            .rev()
            .find_map(|container| match container {
                Container::List { items, .. } => Some(items),
                _ => None,
            });
        if let Some(items) = list {
            items.extend(new_items);
        }
    }

    fn flush_inline(&mut self) {
        let text = self.take_text();
        if !text.is_empty() {
            self.emit(MarkdownElement::Paragraph(text));
        }
    }

    fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        text.trim().to_string()
    }

    // Elements inside a quote or list item are folded into its text.
    fn emit(&mut self, element: MarkdownElement) {
        match self.containers.last_mut() {
            Some(Container::Quote(parts) | Container::Item(parts)) => {
                parts.push(plain_text(&element));
            }
            Some(Container::List { items, .. }) => items.push(plain_text(&element)),
            None => self.elements.push(element),
        }
    }
}

fn plain_text(element: &MarkdownElement) -> String {
    match element {
        MarkdownElement::Heading { text, .. } | MarkdownElement::Paragraph(text) => text.clone(),
        MarkdownElement::Quote(notice) => notice.message.clone(),
        MarkdownElement::CodeBlock { code, .. } => code.clone(),
        MarkdownElement::List { items, .. } => items.join("\n"),
        MarkdownElement::Table { header, rows } => std::iter::once(header)
            .chain(rows.iter())
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n"),
        MarkdownElement::Rule => "---".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_paragraph() {
        let elements = parse_markdown("# Report\nAll good.");
        assert_eq!(
            elements,
            vec![
                MarkdownElement::Heading {
                    level: 1,
                    text: "Report".to_string()
                },
                MarkdownElement::Paragraph("All good.".to_string()),
            ]
        );
    }

    #[test]
    fn item_text_before_nested_list_keeps_its_place() {
        let elements = parse_markdown("1. 标签\n   - 名称\n   - 日期\n\n   复核\n2. 结论");
        assert_eq!(
            elements,
            vec![MarkdownElement::List {
                ordered: true,
                items: vec![
                    "标签".to_string(),
                    "  名称".to_string(),
                    "  日期".to_string(),
                    "复核".to_string(),
                    "结论".to_string()
                ],
            }]
        );
    }

    #[test]
    fn nested_lists_are_flattened_with_indent() {
        let elements = parse_markdown("- 配料表\n  - 顺序错误\n- 日期");
        assert_eq!(
            elements,
            vec![MarkdownElement::List {
                ordered: false,
                items: vec![
                    "配料表".to_string(),
                    "  顺序错误".to_string(),
                    "日期".to_string()
                ],
            }]
        );
    }
}
