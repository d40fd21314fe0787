//! Error types for the sb-ts-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! during parsing and query execution.

/// Errors that can occur while parsing source text.
///
/// Every variant is recoverable at the scan level: a file that cannot be
/// parsed is skipped by tree-based detectors while text-based detectors
/// still run over the raw content.
///
/// # Examples
///
/// ```
/// use sb_ts_parser::ParseError;
///
/// fn handle_error(err: ParseError) {
///     match err {
///         ParseError::LanguageInit => eprintln!("Failed to set grammar"),
///         ParseError::QueryCompile { offset, .. } => {
///             eprintln!("Query compilation failed at offset {offset}");
///         }
///         ParseError::Parse => eprintln!("Failed to parse source"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the grammar on the tree-sitter parser.
    #[error("failed to set language grammar")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    ///
    /// Contains the byte offset where the error occurred and the error kind.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The kind of query error.
        kind: tree_sitter::QueryError,
    },

    /// Failed to parse the source code.
    ///
    /// This typically indicates the parser ran out of memory or was
    /// cancelled.
    #[error("failed to parse source code")]
    Parse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_init_display() {
        let err = ParseError::LanguageInit;
        assert_eq!(err.to_string(), "failed to set language grammar");
    }

    #[test]
    fn test_parse_display() {
        let err = ParseError::Parse;
        assert_eq!(err.to_string(), "failed to parse source code");
    }
}
