//! Structured-data (JSON-LD) detection.
//!
//! JSON-LD can be embedded as a literal, a template string, or an
//! `innerHTML` assignment, so the tree pass locates `script`/`Script`
//! elements with the structured-data MIME type and then recursively unwraps
//! template-literal, `JSON.stringify`, and `dangerouslySetInnerHTML`
//! wrapping before attempting a JSON parse. A parse failure degrades to
//! best-effort `@type` extraction via regex rather than aborting the
//! detection; a raw-text fallback covers files that did not parse at all.

use std::sync::OnceLock;

use regex::Regex;
use sb_core::{Detection, MatchStrategy, SchemaCategory, SchemaDetection, SourceSpan};
use sb_ts_parser::jsx;
use tree_sitter::Node;

use super::{Detector, FileContext, line_of_offset};

/// The structured-data MIME type.
const JSON_LD_MIME: &str = "application/ld+json";

/// Best-effort `@type` extraction when JSON parsing fails.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""@type"\s*:\s*"([^"]+)""#).unwrap()
    })
}

/// Detects inline JSON-LD blocks.
pub struct SchemaDetector;

impl Detector for SchemaDetector {
    fn name(&self) -> &'static str {
        "schemas"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        match ctx.tree {
            Some(tree) => detect_in_tree(ctx, tree),
            None => detect_in_text(ctx),
        }
    }
}

/// Tree pass: script elements with the JSON-LD MIME type.
fn detect_in_tree(ctx: &FileContext<'_>, tree: &tree_sitter::Tree) -> Vec<Detection> {
    let scripts = jsx::collect_nodes(tree, |node| {
        if !jsx::ELEMENT_KINDS.contains(&node.kind()) {
            return false;
        }
        matches!(
            jsx::element_name(node, ctx.source),
            Some("script" | "Script")
        ) && jsx::attribute_value(node, "type", ctx.source).as_deref() == Some(JSON_LD_MIME)
    });

    scripts
        .into_iter()
        .map(|script| {
            let raw = script_payload(script, ctx.source).unwrap_or_default();
            let payload = unwrap_payload(&raw);
            let (schema_type, raw_json) = extract_type(&payload);
            let category = SchemaCategory::from_type(&schema_type);

            Detection::Schema(SchemaDetection {
                file_path: ctx.path.to_owned(),
                span: jsx::span_of(script),
                strategy: MatchStrategy::Ast,
                schema_type,
                category,
                raw_json,
            })
        })
        .collect()
}

/// Raw-text fallback for unparsable files.
///
/// One detection per MIME-type occurrence, typed from the first `@type`
/// that follows it.
fn detect_in_text(ctx: &FileContext<'_>) -> Vec<Detection> {
    let mut detections = Vec::new();
    let mut search_from = 0usize;

    while let Some(rel) = ctx.source[search_from..].find(JSON_LD_MIME) {
        let at = search_from + rel;
        let window = &ctx.source[at..];
        let schema_type = type_regex()
            .captures(window)
            .and_then(|c| c.get(1))
            .map_or_else(String::new, |m| m.as_str().to_owned());

        detections.push(Detection::Schema(SchemaDetection {
            file_path: ctx.path.to_owned(),
            span: SourceSpan::line(line_of_offset(ctx.source, at)),
            strategy: MatchStrategy::Text,
            category: SchemaCategory::from_type(&schema_type),
            schema_type,
            raw_json: None,
        }));

        search_from = at + JSON_LD_MIME.len();
    }

    detections
}

/// Pulls the raw payload text out of a script element.
///
/// Checks the `dangerouslySetInnerHTML` attribute first, then the child
/// expression of a non-self-closing element.
fn script_payload(script: Node<'_>, source: &str) -> Option<String> {
    if let Some(html) = jsx::attribute_value(script, "dangerouslySetInnerHTML", source) {
        return Some(html);
    }

    // Child jsx_expression: <script type="...">{`...`}</script>
    let mut payload = None;
    jsx::visit(script, &mut |node| {
        if payload.is_none() && node.kind() == "jsx_expression" {
            if let Some(text) = jsx::node_text(node, source) {
                let inner = text
                    .strip_prefix('{')
                    .and_then(|t| t.strip_suffix('}'))
                    .unwrap_or(text);
                payload = Some(inner.trim().to_owned());
            }
        }
    });
    payload
}

/// Recursively unwraps the common wrappings around a JSON-LD payload.
///
/// Handles, in any nesting order:
///
/// - `{ __html: <inner> }` object wrappers
/// - `JSON.stringify(<inner>)` calls
/// - template literals
/// - plain string literals
fn unwrap_payload(raw: &str) -> String {
    let mut current = raw.trim().to_owned();

    loop {
        let before = current.len();

        // dangerouslySetInnerHTML object wrapper
        if current.starts_with('{') && current.contains("__html") {
            if let Some(idx) = current.find("__html") {
                let after = &current[idx + "__html".len()..];
                if let Some(colon) = after.find(':') {
                    let mut inner = after[colon + 1..].trim().to_owned();
                    if inner.ends_with('}') {
                        inner.truncate(inner.len() - 1);
                        let trimmed = inner.trim_end().trim_end_matches(',').trim_end();
                        inner = trimmed.to_owned();
                    }
                    current = inner;
                }
            }
        }

        // JSON.stringify(...) call
        if let Some(rest) = current.strip_prefix("JSON.stringify(") {
            if let Some(close) = rest.rfind(')') {
                current = rest[..close].trim().to_owned();
            }
        }

        // Template literal
        if current.starts_with('`') && current.ends_with('`') && current.len() >= 2 {
            current = current[1..current.len() - 1].trim().to_owned();
        }

        // Plain string literal: JSON objects start with '{', never a quote
        let quoted = (current.starts_with('"') && current.ends_with('"'))
            || (current.starts_with('\'') && current.ends_with('\''));
        if quoted && current.len() >= 2 {
            current = current[1..current.len() - 1].trim().to_owned();
        }

        if current.len() == before {
            return current;
        }
    }
}

/// Parses the payload as JSON to read `@type`; degrades to regex on
/// failure.
///
/// Returns the type name (possibly empty) and the raw JSON when it parsed
/// cleanly.
fn extract_type(payload: &str) -> (String, Option<String>) {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) {
        let schema_type = json_type_of(&value).unwrap_or_default();
        return (schema_type, Some(payload.to_owned()));
    }

    let schema_type = type_regex()
        .captures(payload)
        .and_then(|c| c.get(1))
        .map_or_else(String::new, |m| m.as_str().to_owned());
    (schema_type, None)
}

/// Reads `@type` from a parsed JSON-LD document.
///
/// Accepts a top-level string, the first element of a `@type` array, or
/// the first node of a `@graph`.
fn json_type_of(value: &serde_json::Value) -> Option<String> {
    match value.get("@type") {
        Some(serde_json::Value::String(s)) => return Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            if let Some(serde_json::Value::String(s)) = items.first() {
                return Some(s.clone());
            }
        }
        _ => {}
    }

    if let Some(serde_json::Value::Array(graph)) = value.get("@graph") {
        if let Some(first) = graph.first() {
            return json_type_of(first);
        }
    }

    None
}
