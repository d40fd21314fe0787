//! JavaScript/TypeScript parser adapter using tree-sitter.
//!
//! This crate turns file text into a syntax tree covering the full module
//! grammar plus inline JSX markup and optional type annotations. One parser
//! is reused for both concern detection and later re-emission via text
//! splicing: the system never re-serializes from a mutated tree (all
//! rewrites are textual), so the parser's only job is *recognition*.
//!
//! # Overview
//!
//! The main entry point is [`SourceParser`], which wraps a tree-sitter
//! parser configured for either the TypeScript or the TSX grammar. The TSX
//! grammar also handles plain JavaScript and JSX files.
//!
//! ```
//! use sb_ts_parser::SourceParser;
//!
//! let mut parser = SourceParser::tsx()?;
//! let source = r#"const Page = () => <form onSubmit={go}><input name="email" /></form>;"#;
//! let tree = parser.parse(source)?;
//! assert_eq!(tree.root_node().kind(), "program");
//! # Ok::<(), sb_ts_parser::ParseError>(())
//! ```
//!
//! # Import Extraction
//!
//! [`extract_imports`] runs a pre-compiled tree-sitter query over a parsed
//! tree and returns the module path plus named bindings for every static
//! import. The detectors use this for form-library recognition and for
//! managed-import early returns.
//!
//! # JSX Helpers
//!
//! The [`jsx`] module provides preorder traversal and element/attribute
//! accessors shared by the tree-based detectors.
//!
//! # Failure Model
//!
//! A file that fails to parse is skipped by tree-based detectors but may
//! still be scanned by the text-based ones; [`ParseError`] is therefore
//! always a per-file, recoverable condition.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod imports;
pub mod jsx;
mod parser;
mod queries;

pub use error::ParseError;
pub use imports::{ImportBinding, extract_imports};
pub use parser::{SourceGrammar, SourceParser};
pub use queries::{IMPORT_QUERY, import_query_for};
