//! Parser management over the TypeScript and TSX grammars.
//!
//! This module provides the [`SourceParser`] struct for turning file text
//! into a syntax tree, or failing gracefully per file.

use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;

/// The grammar a parser instance is configured for.
///
/// The TSX grammar is a superset used for `.tsx`, `.jsx`, and `.js` files;
/// plain `.ts` files need the TypeScript grammar because TSX changes how
/// angle-bracket type assertions parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceGrammar {
    /// The TypeScript grammar (no JSX).
    TypeScript,
    /// The TSX grammar (TypeScript + JSX; also covers JS/JSX).
    Tsx,
}

impl SourceGrammar {
    /// Picks the grammar for a file extension.
    ///
    /// Unknown extensions get the TSX grammar, the permissive default.
    ///
    /// # Examples
    ///
    /// ```
    /// use sb_ts_parser::SourceGrammar;
    ///
    /// assert_eq!(SourceGrammar::for_extension("ts"), SourceGrammar::TypeScript);
    /// assert_eq!(SourceGrammar::for_extension("tsx"), SourceGrammar::Tsx);
    /// assert_eq!(SourceGrammar::for_extension("jsx"), SourceGrammar::Tsx);
    /// assert_eq!(SourceGrammar::for_extension("js"), SourceGrammar::Tsx);
    /// ```
    #[must_use]
    pub fn for_extension(extension: &str) -> Self {
        match extension {
            "ts" | "mts" | "cts" => Self::TypeScript,
            _ => Self::Tsx,
        }
    }

    /// Returns the tree-sitter [`Language`] for this grammar.
    #[must_use]
    pub fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A reusable parser for JavaScript/TypeScript source files.
///
/// Wraps a tree-sitter parser configured for one grammar. The parser can be
/// reused for many files to avoid repeated initialization.
///
/// # Thread Safety
///
/// `SourceParser` is `Send` but not `Sync`. For parallel scanning, create
/// one parser per thread (e.g. via rayon's `map_init`).
///
/// # Examples
///
/// ```
/// use sb_ts_parser::SourceParser;
///
/// let mut parser = SourceParser::typescript()?;
/// let tree = parser.parse("const x: number = 1;")?;
/// assert!(!tree.root_node().has_error());
/// # Ok::<(), sb_ts_parser::ParseError>(())
/// ```
pub struct SourceParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// The grammar this parser is configured for.
    grammar: SourceGrammar,
}

impl SourceParser {
    /// Creates a parser for the given grammar.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be set.
    pub fn new(grammar: SourceGrammar) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, grammar })
    }

    /// Creates a parser for plain TypeScript (`.ts`).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be set.
    #[inline]
    pub fn typescript() -> Result<Self, ParseError> {
        Self::new(SourceGrammar::TypeScript)
    }

    /// Creates a parser for TSX/JSX/JS files.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be set.
    #[inline]
    pub fn tsx() -> Result<Self, ParseError> {
        Self::new(SourceGrammar::Tsx)
    }

    /// Parses source text into a syntax tree.
    ///
    /// This is always a fresh parse; nothing in a scan/migrate run
    /// re-parses a file after editing it, so no incremental path exists.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Parse`] if tree-sitter yields no tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser.parse(source, None).ok_or(ParseError::Parse)
    }

    /// Returns the grammar this parser is configured for.
    #[inline]
    #[must_use]
    pub const fn grammar(&self) -> SourceGrammar {
        self.grammar
    }
}

impl std::fmt::Debug for SourceParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceParser")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        assert!(SourceParser::typescript().is_ok());
        assert!(SourceParser::tsx().is_ok());
    }

    #[test]
    fn test_grammar_for_extension() {
        assert_eq!(
            SourceGrammar::for_extension("ts"),
            SourceGrammar::TypeScript
        );
        assert_eq!(
            SourceGrammar::for_extension("mts"),
            SourceGrammar::TypeScript
        );
        assert_eq!(SourceGrammar::for_extension("tsx"), SourceGrammar::Tsx);
        assert_eq!(SourceGrammar::for_extension("jsx"), SourceGrammar::Tsx);
        assert_eq!(SourceGrammar::for_extension("js"), SourceGrammar::Tsx);
        assert_eq!(SourceGrammar::for_extension("weird"), SourceGrammar::Tsx);
    }

    #[test]
    fn test_parse_typescript() {
        let mut parser = SourceParser::typescript().expect("parser");
        let tree = parser
            .parse("interface Props { title: string }")
            .expect("parse");
        assert_eq!(tree.root_node().kind(), "program");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_tsx_markup() {
        let mut parser = SourceParser::tsx().expect("parser");
        let source = r#"
export default function Page() {
  return <form onSubmit={submit}><input name="email" type="email" required /></form>;
}
"#;
        let tree = parser.parse(source).expect("parse");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_empty_source() {
        let mut parser = SourceParser::tsx().expect("parser");
        let tree = parser.parse("").expect("parse");
        assert_eq!(tree.root_node().child_count(), 0);
    }

    #[test]
    fn test_parser_debug() {
        let parser = SourceParser::tsx().expect("parser");
        let debug = format!("{parser:?}");
        assert!(debug.contains("SourceParser"));
        assert!(debug.contains("Tsx"));
    }
}
