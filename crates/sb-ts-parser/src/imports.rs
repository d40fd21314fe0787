//! Import extraction from parsed source using tree-sitter queries.
//!
//! The detectors use imports for two things: recognizing third-party form
//! libraries (react-hook-form, formik) and returning early when a file
//! already uses the managed SDK.

use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::queries::{
    CAPTURE_IMPORT_DEFAULT_NAME, CAPTURE_IMPORT_NAMED_NAME, CAPTURE_IMPORT_SOURCE,
    CAPTURE_IMPORT_STATEMENT,
};

/// One static import statement: the module path plus its bindings.
///
/// # Examples
///
/// ```
/// use sb_ts_parser::ImportBinding;
/// use smallvec::smallvec;
///
/// let binding = ImportBinding {
///     module: "react-hook-form".to_owned(),
///     names: smallvec!["useForm".to_owned(), "Controller".to_owned()],
///     line: 2,
/// };
/// assert!(binding.imports_name("useForm"));
/// assert!(!binding.imports_name("Formik"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// The module path, quotes stripped (e.g. `react-hook-form`).
    pub module: String,

    /// The imported names (named and default bindings together).
    pub names: SmallVec<[String; 4]>,

    /// 1-indexed line of the import statement.
    pub line: u32,
}

impl ImportBinding {
    /// Returns `true` if the binding imports the given name.
    #[inline]
    #[must_use]
    pub fn imports_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Extracts all static imports from a parsed tree.
///
/// Captures are grouped per `import_statement` node, so one statement with
/// several named bindings produces one [`ImportBinding`]. Results are sorted
/// by line for deterministic ordering.
///
/// # Examples
///
/// ```
/// use sb_ts_parser::{SourceGrammar, SourceParser, extract_imports, import_query_for};
///
/// let mut parser = SourceParser::tsx()?;
/// let source = r#"
/// import { useForm } from 'react-hook-form';
/// import Head from 'next/head';
/// "#;
/// let tree = parser.parse(source)?;
/// let query = import_query_for(SourceGrammar::Tsx)?;
///
/// let imports = extract_imports(&tree, source, query);
/// assert_eq!(imports.len(), 2);
/// assert_eq!(imports[0].module, "react-hook-form");
/// assert!(imports[0].imports_name("useForm"));
/// assert_eq!(imports[1].names[0], "Head");
/// # Ok::<(), sb_ts_parser::ParseError>(())
/// ```
pub fn extract_imports(tree: &Tree, source: &str, query: &Query) -> Vec<ImportBinding> {
    let source_bytes = source.as_bytes();
    let root = tree.root_node();

    let mut cursor = QueryCursor::new();

    // Group captures by the (start, end) byte range of their statement node
    let mut builders: FxHashMap<(usize, usize), ImportBinding> = FxHashMap::default();

    let mut matches = cursor.matches(query, root, source_bytes);
    while let Some(match_) = matches.next() {
        for capture in match_.captures {
            let node = capture.node;
            match capture.index {
                idx if idx == CAPTURE_IMPORT_STATEMENT => {
                    let key = (node.start_byte(), node.end_byte());
                    builders.entry(key).or_insert_with(|| new_binding(node));
                }
                idx if idx == CAPTURE_IMPORT_SOURCE => {
                    if let Some(parent) = statement_parent(node) {
                        let key = (parent.start_byte(), parent.end_byte());
                        let builder = builders.entry(key).or_insert_with(|| new_binding(parent));
                        if let Some(text) = node_text(node, source_bytes) {
                            builder.module = strip_quotes(text).to_owned();
                        }
                    }
                }
                idx if idx == CAPTURE_IMPORT_NAMED_NAME || idx == CAPTURE_IMPORT_DEFAULT_NAME => {
                    if let Some(parent) = statement_parent(node) {
                        let key = (parent.start_byte(), parent.end_byte());
                        let builder = builders.entry(key).or_insert_with(|| new_binding(parent));
                        if let Some(text) = node_text(node, source_bytes) {
                            builder.names.push(text.to_owned());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    let mut imports: Vec<ImportBinding> = builders
        .into_values()
        .filter(|b| !b.module.is_empty())
        .collect();
    imports.sort_by_key(|i| i.line);
    imports
}

/// Creates an empty binding positioned at a statement node.
fn new_binding(statement: Node<'_>) -> ImportBinding {
    #[allow(clippy::cast_possible_truncation)] // files are far below 4G lines
    let line = statement.start_position().row as u32 + 1;
    ImportBinding {
        module: String::new(),
        names: smallvec![],
        line,
    }
}

/// Finds the enclosing `import_statement` node.
fn statement_parent(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = Some(node);
    while let Some(n) = current {
        if n.kind() == "import_statement" {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Extracts text from a node.
fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    std::str::from_utf8(source.get(node.start_byte()..node.end_byte())?).ok()
}

/// Strips matching single or double quotes from a string literal.
fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SourceGrammar, SourceParser};
    use crate::queries::import_query_for;

    fn parse_imports(source: &str) -> Vec<ImportBinding> {
        let mut parser = SourceParser::tsx().expect("parser");
        let tree = parser.parse(source).expect("parse");
        let query = import_query_for(SourceGrammar::Tsx).expect("query");
        extract_imports(&tree, source, query)
    }

    #[test]
    fn test_extract_named_imports() {
        let imports = parse_imports(r#"import { useForm, Controller } from 'react-hook-form';"#);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "react-hook-form");
        assert!(imports[0].imports_name("useForm"));
        assert!(imports[0].imports_name("Controller"));
        assert_eq!(imports[0].line, 1);
    }

    #[test]
    fn test_extract_default_import() {
        let imports = parse_imports(r#"import Head from 'next/head';"#);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "next/head");
        assert_eq!(imports[0].names.len(), 1);
        assert_eq!(imports[0].names[0], "Head");
    }

    #[test]
    fn test_extract_multiple_imports_ordered() {
        let imports = parse_imports(
            r#"
import { Formik } from 'formik';
import Script from 'next/script';
"#,
        );
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].module, "formik");
        assert_eq!(imports[1].module, "next/script");
        assert!(imports[0].line < imports[1].line);
    }

    #[test]
    fn test_side_effect_import_has_no_names() {
        let imports = parse_imports(r#"import './globals.css';"#);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "./globals.css");
        assert!(imports[0].names.is_empty());
    }

    #[test]
    fn test_double_quoted_module() {
        let imports = parse_imports(r#"import { NextSeo } from "next-seo";"#);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "next-seo");
    }

    #[test]
    fn test_no_imports() {
        let imports = parse_imports("const x = 1;");
        assert!(imports.is_empty());
    }
}
