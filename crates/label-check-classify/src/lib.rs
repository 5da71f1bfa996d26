#![warn(missing_docs)]
//! # label-check-classify
//!
//! ## Purpose
//! Infers the shape of an AI-generated report blob and locates structured
//! JSON inside free text.
//!
//! ## Responsibilities
//! - Classify text as empty, JSON, Markdown, or mixed JSON-in-text.
//! - Find the largest valid JSON object embedded in surrounding prose.
//! - Compute the prose left over once that object is cut out.
//!
//! ## Data flow
//! Primary report text -> [`classify`] -> [`ClassifiedContent`]. Mixed
//! content goes through [`locate_json_object`], whose span feeds
//! [`text_outside`].
//!
//! ## Ownership and lifetimes
//! Inputs are borrowed; results own their strings and JSON values.
//!
//! ## Error model
//! Nothing here fails. Parse errors are classification signals and fall
//! through to the next tier (JSON -> mixed -> Markdown).

use std::cmp::Reverse;
use std::ops::Range;
use std::sync::LazyLock;

use label_check_core::ClassifiedContent;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

static BRACE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("valid regex"));

const FENCE: &str = "```";

/// Classifies report text.
///
/// # Semantics
/// - Blank text -> [`ClassifiedContent::Empty`].
/// - Whole text parses as JSON -> [`ClassifiedContent::Json`].
/// - Any non-greedy `{...}` span -> [`ClassifiedContent::Mixed`].
/// - Otherwise -> [`ClassifiedContent::Markdown`].
pub fn classify(text: &str) -> ClassifiedContent {
    if text.trim().is_empty() {
        debug!("report text is blank");
        return ClassifiedContent::Empty;
    }

    let classified = match serde_json::from_str::<Value>(text) {
        Ok(value) => ClassifiedContent::Json(value),
        Err(_) => {
            let candidates: Vec<String> = BRACE_SPAN
                .find_iter(text)
                .map(|found| found.as_str().to_string())
                .collect();
            if candidates.is_empty() {
                ClassifiedContent::Markdown(text.to_string())
            } else {
                ClassifiedContent::Mixed {
                    text: text.to_string(),
                    candidates,
                }
            }
        }
    };

    debug!(
        kind = classified.kind(),
        text_len = text.len(),
        "classified report text"
    );
    classified
}

/// JSON object found inside a larger text.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedJson {
    /// Byte range of the object within the searched text.
    pub span: Range<usize>,
    /// Parsed object.
    pub value: Value,
}

/// Returns the longest brace-delimited substring that parses as JSON.
///
/// See [`locate_json_object`] for the scanning rules.
pub fn find_largest_json_object(text: &str) -> Option<String> {
    locate_json_object(text).map(|located| text[located.span].to_string())
}

/// Locates the longest valid JSON object in `text`.
///
/// # Semantics
/// One pass over the bytes keeps a stack of open `{` positions; every `}`
/// that matches one, at any depth, yields a candidate span. A `}` with no
/// open brace is ignored, and an open brace that is never closed yields
/// nothing, so objects nested in broken or unclosed text are still
/// candidates. Braces inside string literals do not count; a raw newline
/// ends a string literal, since JSON strings cannot contain one.
///
/// Candidates are validated longest first (leftmost on equal lengths) and
/// the first that parses wins, so a valid enclosing object always beats
/// anything nested inside it.
pub fn locate_json_object(text: &str) -> Option<LocatedJson> {
    let mut spans = candidate_spans(text.as_bytes());
    spans.sort_unstable_by_key(|span| (Reverse(span.len()), span.start));

    let located = spans.into_iter().find_map(|span| {
        match serde_json::from_str::<Value>(&text[span.clone()]) {
            Ok(value) => Some(LocatedJson { span, value }),
            Err(error) => {
                trace!(
                    start = span.start,
                    end = span.end,
                    %error,
                    "discarded embedded json candidate"
                );
                None
            }
        }
    });

    if let Some(located) = &located {
        debug!(
            start = located.span.start,
            end = located.span.end,
            "located embedded json object"
        );
    }
    located
}

/// Collects every balanced `{...}` span, innermost spans first.
///
/// Bytes are scanned directly: the structural characters are ASCII and never
/// occur inside a multi-byte UTF-8 sequence, so every span boundary is a char
/// boundary.
fn candidate_spans(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, &byte) in bytes.iter().enumerate() {
        if in_string {
            match byte {
                b'\n' => in_string = false,
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'{' => open.push(index),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push(start..index + 1);
                }
            }
            b'"' if !open.is_empty() => {
                in_string = true;
                escaped = false;
            }
            _ => {}
        }
    }
    spans
}

/// Returns `text` with `span` removed, as Markdown to show beside the JSON.
///
/// A code fence left empty by the removal is dropped as well. Returns an
/// empty string when only whitespace remains.
pub fn text_outside(text: &str, span: Range<usize>) -> String {
    let mut before = text[..span.start].trim_end();
    let mut after = text[span.end..].trim_start();

    if let Some(position) = before.rfind(FENCE) {
        let language = &before[position + FENCE.len()..];
        let is_open_fence = language
            .chars()
            .all(|character| character.is_ascii_alphanumeric());
        if is_open_fence && after.starts_with(FENCE) {
            before = before[..position].trim_end();
            after = after[FENCE.len()..].trim_start();
        }
    }

    match (before.is_empty(), after.is_empty()) {
        (true, true) => String::new(),
        (false, true) => before.to_string(),
        (true, false) => after.to_string(),
        (false, false) => format!("{before}\n\n{after}"),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the brace scanner.

    use super::*;

    #[test]
    fn candidate_spans_ignores_stray_closing_braces() {
        let text = "} {\"a\":1} }";
        assert_eq!(candidate_spans(text.as_bytes()), vec![2..9]);
    }

    #[test]
    fn candidate_spans_skips_unclosed_braces() {
        let text = "x { y {\"a\":1}";
        assert_eq!(candidate_spans(text.as_bytes()), vec![6..13]);
    }

    #[test]
    fn candidate_spans_lists_nested_spans_innermost_first() {
        assert_eq!(candidate_spans(b"{ {} }"), vec![2..4, 0..6]);
    }

    #[test]
    fn braces_in_strings_do_not_close_span() {
        let text = r#"{"a":"}\"{"}"#;
        assert_eq!(candidate_spans(text.as_bytes()), vec![0..text.len()]);
    }

    #[test]
    fn newline_ends_unbalanced_quote() {
        let text = "{ \"x\n{\"a\":1} }";
        assert_eq!(candidate_spans(text.as_bytes()), vec![5..12, 0..14]);
    }
}
