//! JSX tree helpers shared by the tree-based detectors.
//!
//! These helpers stay deliberately close to the raw tree-sitter API: they
//! read names, attributes, and text out of `jsx_element` /
//! `jsx_self_closing_element` nodes without building any intermediate
//! representation.

use sb_core::SourceSpan;
use tree_sitter::{Node, Tree};

/// JSX node kinds that represent an element with a name and attributes.
pub const ELEMENT_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element"];

/// Visits every node of the tree in preorder.
///
/// # Examples
///
/// ```
/// use sb_ts_parser::{SourceParser, jsx};
///
/// let mut parser = SourceParser::tsx()?;
/// let tree = parser.parse("const x = <div><span /></div>;")?;
///
/// let mut kinds = Vec::new();
/// jsx::visit(tree.root_node(), &mut |node| {
///     if jsx::ELEMENT_KINDS.contains(&node.kind()) {
///         kinds.push(node.kind());
///     }
/// });
/// assert_eq!(kinds, ["jsx_element", "jsx_self_closing_element"]);
/// # Ok::<(), sb_ts_parser::ParseError>(())
/// ```
pub fn visit<'t>(node: Node<'t>, f: &mut impl FnMut(Node<'t>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, f);
    }
}

/// Collects every node of the tree matching a predicate, in preorder.
pub fn collect_nodes<'t>(tree: &'t Tree, pred: impl Fn(Node<'t>) -> bool) -> Vec<Node<'t>> {
    let mut nodes = Vec::new();
    visit(tree.root_node(), &mut |node| {
        if pred(node) {
            nodes.push(node);
        }
    });
    nodes
}

/// Returns the tag name of a JSX element node.
///
/// Works for both `jsx_element` (via its opening element) and
/// `jsx_self_closing_element`. Returns `None` for fragments and non-element
/// nodes.
#[must_use]
pub fn element_name<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    let named = match node.kind() {
        "jsx_self_closing_element" => node,
        "jsx_element" => node
            .children(&mut node.walk())
            .find(|c| c.kind() == "jsx_opening_element")?,
        _ => return None,
    };
    let name = named.child_by_field_name("name")?;
    node_text(name, source)
}

/// Returns the node that directly holds a JSX element's attributes.
fn attribute_holder<'t>(node: Node<'t>) -> Option<Node<'t>> {
    match node.kind() {
        "jsx_self_closing_element" => Some(node),
        "jsx_element" => node
            .children(&mut node.walk())
            .find(|c| c.kind() == "jsx_opening_element"),
        _ => None,
    }
}

/// Finds a named attribute node on a JSX element.
#[must_use]
pub fn find_attribute<'t>(node: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    let holder = attribute_holder(node)?;
    let mut cursor = holder.walk();
    holder
        .children(&mut cursor)
        .filter(|c| c.kind() == "jsx_attribute")
        .find(|attr| {
            attr.child(0)
                .and_then(|n| node_text(n, source))
                .is_some_and(|n| n == name)
        })
}

/// Returns `true` if the element carries the named attribute (with or
/// without a value).
#[must_use]
pub fn has_attribute(node: Node<'_>, name: &str, source: &str) -> bool {
    find_attribute(node, name, source).is_some()
}

/// Returns the value of a named attribute.
///
/// String values come back with their quotes stripped; expression values
/// (`attr={...}`) come back as the inner expression text with the braces
/// stripped. A bare attribute (`required`) returns `None`; use
/// [`has_attribute`] for presence checks.
#[must_use]
pub fn attribute_value(node: Node<'_>, name: &str, source: &str) -> Option<String> {
    let attr = find_attribute(node, name, source)?;
    let mut cursor = attr.walk();
    let value = attr
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "string" | "jsx_expression"))?;
    let text = node_text(value, source)?;

    let cleaned = match value.kind() {
        "string" => text.trim_matches(|c| c == '\'' || c == '"'),
        // Strip exactly one brace layer: the jsx_expression's own
        _ => text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .unwrap_or(text)
            .trim(),
    };
    Some(cleaned.to_owned())
}

/// Concatenates the `jsx_text` descendants of a node.
///
/// Used for option labels and question counting, where the visible text is
/// what matters.
#[must_use]
pub fn element_text(node: Node<'_>, source: &str) -> String {
    let mut out = String::new();
    visit(node, &mut |n| {
        if n.kind() != "jsx_text" {
            return;
        }
        if let Some(text) = node_text(n, source) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(trimmed);
            }
        }
    });
    out
}

/// Extracts the raw text of a node.
#[must_use]
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Converts a node's position into a 1-based [`SourceSpan`].
#[must_use]
#[allow(clippy::cast_possible_truncation)] // source files fit in u32 lines
pub fn span_of(node: Node<'_>) -> SourceSpan {
    SourceSpan::new(
        node.start_position().row as u32 + 1,
        node.end_position().row as u32 + 1,
    )
}

/// Walks ancestors to find the name of the enclosing component.
///
/// Recognizes `function Name() {...}` declarations and
/// `const Name = () => {...}` declarators. Returns `None` for module-level
/// markup with no enclosing function.
#[must_use]
pub fn enclosing_component_name(node: Node<'_>, source: &str) -> Option<String> {
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            "function_declaration" | "generator_function_declaration" | "variable_declarator" => {
                if let Some(text) = n
                    .child_by_field_name("name")
                    .and_then(|name| node_text(name, source))
                {
                    return Some(text.to_owned());
                }
            }
            _ => {}
        }
        current = n.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceParser;

    fn parse(source: &str) -> Tree {
        let mut parser = SourceParser::tsx().expect("parser");
        parser.parse(source).expect("parse")
    }

    #[test]
    fn test_element_name() {
        let source = r#"const x = <form onSubmit={go}><input name="a" /></form>;"#;
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| ELEMENT_KINDS.contains(&n.kind()));
        assert_eq!(elements.len(), 2);
        assert_eq!(element_name(elements[0], source), Some("form"));
        assert_eq!(element_name(elements[1], source), Some("input"));
    }

    #[test]
    fn test_attribute_value_string() {
        let source = r#"const x = <input name="email" type="email" required />;"#;
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| n.kind() == "jsx_self_closing_element");
        let input = elements[0];

        assert_eq!(
            attribute_value(input, "name", source).as_deref(),
            Some("email")
        );
        assert_eq!(
            attribute_value(input, "type", source).as_deref(),
            Some("email")
        );
        assert!(has_attribute(input, "required", source));
        assert!(attribute_value(input, "required", source).is_none());
        assert!(!has_attribute(input, "placeholder", source));
    }

    #[test]
    fn test_attribute_value_expression() {
        let source = r#"const x = <form onSubmit={handleSubmit}>hi</form>;"#;
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| n.kind() == "jsx_element");
        assert_eq!(
            attribute_value(elements[0], "onSubmit", source).as_deref(),
            Some("handleSubmit")
        );
    }

    #[test]
    fn test_element_text() {
        let source = r"const x = <select><option>Small</option><option>Large</option></select>;";
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| n.kind() == "jsx_element");
        assert_eq!(element_text(elements[0], source), "Small Large");
    }

    #[test]
    fn test_span_of() {
        let source = "const x =\n  <div>\n    hi\n  </div>;";
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| n.kind() == "jsx_element");
        let span = span_of(elements[0]);
        assert_eq!(span.start_line, 2);
        assert_eq!(span.end_line, 4);
    }

    #[test]
    fn test_enclosing_component_name_function() {
        let source = r"
export default function ContactPage() {
  return <form onSubmit={go}>x</form>;
}
";
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| n.kind() == "jsx_element");
        assert_eq!(
            enclosing_component_name(elements[0], source).as_deref(),
            Some("ContactPage")
        );
    }

    #[test]
    fn test_enclosing_component_name_arrow() {
        let source = r"const SignupForm = () => <form onSubmit={go}>x</form>;";
        let tree = parse(source);
        let elements = collect_nodes(&tree, |n| n.kind() == "jsx_element");
        assert_eq!(
            enclosing_component_name(elements[0], source).as_deref(),
            Some("SignupForm")
        );
    }

    #[test]
    fn test_enclosing_component_name_none() {
        let source = r"const x = 1;";
        let tree = parse(source);
        assert!(enclosing_component_name(tree.root_node(), source).is_none());
    }
}
