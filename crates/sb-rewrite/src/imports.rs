//! Safe import insertion and merge-into-import.
//!
//! Import insertion is the most repeated rewrite across migrators and the
//! one with the hardest invariant: a `'use client'`/`'use server'` directive
//! must stay on the first line of the file.

use std::sync::OnceLock;

use regex::Regex;

/// Matches a directive line (`'use client';` / `"use server"`).
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn directive_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(['"])use (client|server)['"];?\s*$"#).unwrap()
    })
}

/// Matches the first import statement line.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn first_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^import\b").unwrap()
    })
}

/// Inserts an import statement, or no-ops if the module is already present.
///
/// Returns `None` when `module_path` already appears anywhere in the file,
/// a deliberately coarse substring check so repeated runs never produce
/// duplicate imports. (The flip side: a module path that appears only in a
/// comment also suppresses insertion; tightening this to an AST check is a
/// strictness tradeoff, not a bug fix.)
///
/// Placement rules, in order:
///
/// 1. If the file begins with a `'use client'`/`'use server'` directive,
///    insert immediately after that directive line, never before it.
/// 2. Otherwise insert before the first existing import.
/// 3. Otherwise insert at the very top.
///
/// # Examples
///
/// ```
/// use sb_rewrite::add_import_safely;
///
/// let content = "import React from 'react';\n\nexport default function X() {}\n";
/// let updated = add_import_safely(
///     content,
///     "import { BridgeForm } from '@sitebridge/react';",
///     "@sitebridge/react",
/// )
/// .unwrap();
/// assert!(updated.starts_with("import { BridgeForm }"));
///
/// // Second run is a no-op
/// assert!(add_import_safely(&updated, "import { BridgeForm } from '@sitebridge/react';", "@sitebridge/react").is_none());
/// ```
#[must_use]
pub fn add_import_safely(
    content: &str,
    import_statement: &str,
    module_path: &str,
) -> Option<String> {
    if content.contains(module_path) {
        return None;
    }

    let statement = if import_statement.ends_with('\n') {
        import_statement.to_owned()
    } else {
        format!("{import_statement}\n")
    };

    // Directive first: the host framework requires it to stay on top
    if let Some(offset) = leading_directive_end(content) {
        let mut out = String::with_capacity(content.len() + statement.len() + 1);
        out.push_str(&content[..offset]);
        if !content[..offset].ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&statement);
        out.push_str(&content[offset..]);
        return Some(out);
    }

    // Before the first existing import, or at the very top
    let insert_at = first_import_regex()
        .find(content)
        .map_or(0, |m| m.start());

    let mut out = String::with_capacity(content.len() + statement.len());
    out.push_str(&content[..insert_at]);
    out.push_str(&statement);
    out.push_str(&content[insert_at..]);
    Some(out)
}

/// Returns the byte offset just past the leading directive line, if the
/// file begins with one.
fn leading_directive_end(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim().is_empty() {
            offset += line.len();
            continue;
        }
        if directive_line_regex().is_match(line.trim_end_matches('\n')) {
            return Some(offset + line.len());
        }
        return None;
    }
    None
}

/// Outcome of [`merge_into_import`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The export was appended to an existing clause; the new content is
    /// returned.
    Merged(String),

    /// The clause already imports the export; nothing to do.
    AlreadyImported,

    /// No `import { ... } from '<module>'` clause exists; the caller falls
    /// back to a fresh import statement.
    NoImportClause,
}

/// Appends a named export to an existing import clause for a module.
///
/// # Examples
///
/// ```
/// use sb_rewrite::{MergeOutcome, merge_into_import};
///
/// let content = "import { BridgeForm } from '@sitebridge/react';\n";
/// match merge_into_import(content, "@sitebridge/react", "BridgeSchema") {
///     MergeOutcome::Merged(updated) => {
///         assert!(updated.contains("{ BridgeForm, BridgeSchema }"));
///     }
///     other => panic!("unexpected: {other:?}"),
/// }
///
/// assert_eq!(
///     merge_into_import(content, "@sitebridge/react", "BridgeForm"),
///     MergeOutcome::AlreadyImported
/// );
/// assert_eq!(
///     merge_into_import(content, "other-module", "X"),
///     MergeOutcome::NoImportClause
/// );
/// ```
#[must_use]
pub fn merge_into_import(content: &str, module_path: &str, named_export: &str) -> MergeOutcome {
    let pattern = format!(
        r#"import\s*\{{([^}}]*)\}}\s*from\s*['"]{}['"]"#,
        regex::escape(module_path)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return MergeOutcome::NoImportClause;
    };

    let Some(captures) = re.captures(content) else {
        return MergeOutcome::NoImportClause;
    };
    let Some(names) = captures.get(1) else {
        return MergeOutcome::NoImportClause;
    };

    let already = names
        .as_str()
        .split(',')
        .any(|n| n.trim() == named_export);
    if already {
        return MergeOutcome::AlreadyImported;
    }

    let existing = names.as_str().trim_end();
    let separator = if existing.trim().is_empty() { "" } else { "," };
    let replacement = format!("{existing}{separator} {named_export} ");

    let mut out = String::with_capacity(content.len() + named_export.len() + 2);
    out.push_str(&content[..names.start()]);
    out.push_str(&replacement);
    out.push_str(&content[names.end()..]);
    MergeOutcome::Merged(out)
}
