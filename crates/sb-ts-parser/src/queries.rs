//! Pre-compiled tree-sitter queries for import extraction.
//!
//! This module provides the [`IMPORT_QUERY`] source and
//! [`import_query_for`], which lazily compiles and caches the query per
//! grammar.

use std::sync::OnceLock;

use tree_sitter::Query;

use crate::error::ParseError;
use crate::parser::SourceGrammar;

/// Tree-sitter query for extracting static import statements.
///
/// # Capture Names
///
/// - `import.source` - The import path string literal
/// - `import.statement` - The full `import_statement` node
/// - `import.named.name` - Named import identifiers
/// - `import.default.name` - Default import identifier
pub const IMPORT_QUERY: &str = r"
; Static imports with source path
(import_statement
  source: (string) @import.source) @import.statement

; Named imports: import { Foo, Bar } from '...'
(import_statement
  (import_clause
    (named_imports
      (import_specifier
        name: (identifier) @import.named.name))))

; Default imports: import Foo from '...'
(import_statement
  (import_clause
    (identifier) @import.default.name))
";

/// Capture index for `import.source`.
pub(crate) const CAPTURE_IMPORT_SOURCE: u32 = 0;

/// Capture index for `import.statement`.
pub(crate) const CAPTURE_IMPORT_STATEMENT: u32 = 1;

/// Capture index for `import.named.name`.
pub(crate) const CAPTURE_IMPORT_NAMED_NAME: u32 = 2;

/// Capture index for `import.default.name`.
pub(crate) const CAPTURE_IMPORT_DEFAULT_NAME: u32 = 3;

/// Global cache for the compiled import query (TypeScript grammar).
static COMPILED_QUERY_TS: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled import query (TSX grammar).
static COMPILED_QUERY_TSX: OnceLock<Query> = OnceLock::new();

/// Returns the compiled import query for the given grammar.
///
/// The query is compiled once per grammar and cached for all subsequent
/// calls. This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
///
/// # Examples
///
/// ```
/// use sb_ts_parser::{SourceGrammar, import_query_for};
///
/// let query = import_query_for(SourceGrammar::Tsx)?;
/// assert!(query.pattern_count() >= 3);
/// # Ok::<(), sb_ts_parser::ParseError>(())
/// ```
pub fn import_query_for(grammar: SourceGrammar) -> Result<&'static Query, ParseError> {
    let cache = match grammar {
        SourceGrammar::TypeScript => &COMPILED_QUERY_TS,
        SourceGrammar::Tsx => &COMPILED_QUERY_TSX,
    };

    if let Some(query) = cache.get() {
        return Ok(query);
    }

    let query = compile_query(grammar)?;
    Ok(cache.get_or_init(|| query))
}

/// Compiles the import query for the given grammar.
fn compile_query(grammar: SourceGrammar) -> Result<Query, ParseError> {
    Query::new(&grammar.language(), IMPORT_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_compiles_for_both_grammars() {
        assert!(compile_query(SourceGrammar::TypeScript).is_ok());
        assert!(compile_query(SourceGrammar::Tsx).is_ok());
    }

    #[test]
    fn test_capture_names() {
        let query = compile_query(SourceGrammar::Tsx).expect("query should compile");
        let names = query.capture_names();
        assert!(names.contains(&"import.source"));
        assert!(names.contains(&"import.statement"));
        assert!(names.contains(&"import.named.name"));
        assert!(names.contains(&"import.default.name"));
    }

    #[test]
    fn test_cached_query_is_shared() {
        let a = import_query_for(SourceGrammar::Tsx).expect("query");
        let b = import_query_for(SourceGrammar::Tsx).expect("query");
        assert!(std::ptr::eq(a, b));
    }
}
