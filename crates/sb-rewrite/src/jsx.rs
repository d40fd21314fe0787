//! Anchored markup insertion and balanced element-block location.
//!
//! New elements are injected immediately after a recognized structural
//! landmark rather than at an arbitrary offset; when no landmark matches,
//! the file is left unchanged and the caller records that a manual insertion
//! is required.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Ordered structural anchor patterns for [`insert_after_anchor`].
///
/// Tried in order: fragment open, explicit `Fragment`, first element's
/// opening tag (parenthesized return, then bare return). The first pattern
/// that matches anywhere wins.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn anchor_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"return\s*\(\s*<>").unwrap(),
            Regex::new(r"return\s*\(\s*<(?:React\.)?Fragment[^>]*>").unwrap(),
            Regex::new(r"return\s*\(\s*<[A-Za-z](?:[^>]*[^/>])?>").unwrap(),
            Regex::new(r"return\s+<[A-Za-z](?:[^>]*[^/>])?>").unwrap(),
        ]
    })
}

/// Inserts `element` as the first child of a component's render output.
///
/// Tries the anchor patterns in order and splices `element` on a new line
/// immediately after the first match, indented two spaces past the anchor
/// line. Returns `None` when no structural anchor matches; the caller must
/// then record that a manual insertion is required and leave the file
/// unchanged.
///
/// # Examples
///
/// ```
/// use sb_rewrite::insert_after_anchor;
///
/// let content = r#"
/// export default function Page() {
///   return (
///     <main className="page">
///       <h1>Hello</h1>
///     </main>
///   );
/// }
/// "#;
///
/// let updated = insert_after_anchor(content, r#"<BridgeSchema schemaId="s1" />"#).unwrap();
/// assert!(updated.contains("<main className=\"page\">\n      <BridgeSchema"));
///
/// // No render output, no anchor
/// assert!(insert_after_anchor("export const x = 1;", "<BridgeSchema />").is_none());
/// ```
#[must_use]
pub fn insert_after_anchor(content: &str, element: &str) -> Option<String> {
    let m = anchor_patterns().iter().find_map(|re| re.find(content))?;

    // Indent relative to the line the anchor tag ends on
    let indent = line_indent(content, m.end().saturating_sub(1));
    let insertion = format!("\n{indent}  {element}");

    let mut out = String::with_capacity(content.len() + insertion.len());
    out.push_str(&content[..m.end()]);
    out.push_str(&insertion);
    out.push_str(&content[m.end()..]);
    Some(out)
}

/// Returns the leading whitespace of the line containing `offset`.
fn line_indent(content: &str, offset: usize) -> &str {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &content[line_start..];
    let indent_len = line.len() - line.trim_start().len();
    &line[..indent_len]
}

/// Locates the full `<tag ...>...</tag>` block for the first occurrence of
/// an element, by open/close depth counting.
///
/// Handles nested same-name elements and a self-closing first occurrence
/// (`<tag ... />`). Returns the byte range of the block, or `None` when the
/// element does not occur or its close tag is missing.
///
/// Angle brackets inside attribute strings are not special-cased; like the
/// brace scanner, a pathological attribute value makes the scan miss and
/// the caller skips the rewrite.
///
/// # Examples
///
/// ```
/// use sb_rewrite::element_block;
///
/// let content = r#"<div><form onSubmit={go}><input name="a" /></form></div>"#;
/// let range = element_block(content, "form").unwrap();
/// assert_eq!(&content[range], r#"<form onSubmit={go}><input name="a" /></form>"#);
///
/// assert!(element_block("<div>no form here</div>", "form").is_none());
/// assert!(element_block("<form>unclosed", "form").is_none());
/// ```
#[must_use]
pub fn element_block(content: &str, tag: &str) -> Option<Range<usize>> {
    let token_re = Regex::new(&format!(r"</?{}\b", regex::escape(tag))).ok()?;

    let mut start: Option<usize> = None;
    let mut depth = 0usize;

    for token in token_re.find_iter(content) {
        let is_close = content[token.start()..].starts_with("</");

        if is_close {
            if start.is_none() {
                continue;
            }
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                let gt = content[token.end()..].find('>')?;
                return Some(start?..token.end() + gt + 1);
            }
        } else {
            // Find the end of this opening tag to test for self-closing
            let gt = token.end() + content[token.end()..].find('>')?;
            let self_closing = content[..gt].ends_with('/');

            if start.is_none() {
                if self_closing {
                    return Some(token.start()..gt + 1);
                }
                start = Some(token.start());
                depth = 1;
            } else if !self_closing {
                depth += 1;
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_fragment_open() {
        let content = "function X() {\n  return (\n    <>\n      <p>hi</p>\n    </>\n  );\n}\n";
        let updated = insert_after_anchor(content, "<BridgeChat />").expect("anchored");
        assert!(updated.contains("<>\n      <BridgeChat />"));
    }

    #[test]
    fn test_anchor_explicit_fragment() {
        let content = "function X() {\n  return (\n    <Fragment key={k}>\n      <p>hi</p>\n    </Fragment>\n  );\n}\n";
        let updated = insert_after_anchor(content, "<BridgeChat />").expect("anchored");
        assert!(updated.contains("<Fragment key={k}>\n      <BridgeChat />"));
    }

    #[test]
    fn test_anchor_first_element() {
        let content = "function X() {\n  return (\n    <main id=\"root\">\n      <p>hi</p>\n    </main>\n  );\n}\n";
        let updated = insert_after_anchor(content, "<BridgeFaq faqId=\"f\" />").expect("anchored");
        assert!(updated.contains("<main id=\"root\">\n      <BridgeFaq faqId=\"f\" />"));
    }

    #[test]
    fn test_anchor_bare_return() {
        let content = "const X = () => {\n  return <div>\n    hi\n  </div>;\n};\n";
        let updated = insert_after_anchor(content, "<BridgeChat />").expect("anchored");
        assert!(updated.contains("<div>\n    <BridgeChat />"));
    }

    #[test]
    fn test_anchor_ordering_prefers_fragment() {
        // Both a fragment and an element exist; the fragment pattern wins
        let content = "function X() {\n  return (\n    <>\n      <div>hi</div>\n    </>\n  );\n}\n";
        let updated = insert_after_anchor(content, "<M />").expect("anchored");
        let frag_at = updated.find("<>").expect("fragment");
        let marker_at = updated.find("<M />").expect("marker");
        assert!(marker_at > frag_at);
        assert!(marker_at < updated.find("<div>").expect("div"));
    }

    #[test]
    fn test_no_anchor_returns_none() {
        assert!(insert_after_anchor("export const x = 1;\n", "<M />").is_none());
        // A self-closing first element is not an anchor
        assert!(insert_after_anchor("function X() {\n  return (\n    <img src=\"a\" />\n  );\n}\n", "<M />").is_none());
    }

    #[test]
    fn test_element_block_simple() {
        let content = "<form onSubmit={go}><input /></form>";
        let range = element_block(content, "form").expect("block");
        assert_eq!(&content[range], content);
    }

    #[test]
    fn test_element_block_nested_same_tag() {
        let content = "<form id=\"outer\"><form id=\"inner\"></form></form> tail";
        let range = element_block(content, "form").expect("block");
        assert_eq!(
            &content[range],
            "<form id=\"outer\"><form id=\"inner\"></form></form>"
        );
    }

    #[test]
    fn test_element_block_word_boundary() {
        // <formation> must not match as <form
        let content = "<formation>x</formation><form>y</form>";
        let range = element_block(content, "form").expect("block");
        assert_eq!(&content[range], "<form>y</form>");
    }

    #[test]
    fn test_element_block_self_closing() {
        let content = "before <Widget a={1} /> after";
        let range = element_block(content, "Widget").expect("block");
        assert_eq!(&content[range], "<Widget a={1} />");
    }

    #[test]
    fn test_element_block_unclosed() {
        assert!(element_block("<form><input />", "form").is_none());
        assert!(element_block("no markup", "form").is_none());
    }

    #[test]
    fn test_element_block_nested_self_closing_same_tag() {
        // A self-closing same-name element inside must not change depth
        let content = "<Widget><Widget inline /></Widget>";
        let range = element_block(content, "Widget").expect("block");
        assert_eq!(&content[range], content);
    }
}
