//! Client/server component classification.
//!
//! Several migrators (schema, FAQ) require server rendering and must skip
//! client components rather than attempt an unsafe rewrite.

use std::sync::OnceLock;

use regex::Regex;

/// How many leading lines are inspected for a directive.
const DIRECTIVE_WINDOW: usize = 5;

/// Matches a `'use client'` / `"use client"` directive line.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(['"])use (client|server)['"];?\s*$"#).unwrap()
    })
}

/// Returns `true` if a `'use client'` or `'use server'` directive appears
/// within the first few lines of the file.
///
/// # Examples
///
/// ```
/// use sb_rewrite::has_directive;
///
/// assert!(has_directive("'use client';\nimport React from 'react';", "client"));
/// assert!(has_directive("\"use server\";\n", "server"));
/// assert!(!has_directive("import React from 'react';", "client"));
/// ```
#[must_use]
pub fn has_directive(content: &str, which: &str) -> bool {
    content.lines().take(DIRECTIVE_WINDOW).any(|line| {
        directive_regex()
            .captures(line)
            .is_some_and(|c| c.get(2).is_some_and(|m| m.as_str() == which))
    })
}

/// Returns `true` if the file is a client component.
///
/// A component is "client" if a `'use client'` directive appears within the
/// first few lines; comments or blank lines before the directive are
/// tolerated.
///
/// # Examples
///
/// ```
/// use sb_rewrite::is_client_component;
///
/// assert!(is_client_component("'use client';\nexport default function X() {}"));
/// assert!(is_client_component("// app code\n'use client'\nexport default function X() {}"));
/// assert!(!is_client_component("export default function X() {}"));
/// ```
#[must_use]
pub fn is_client_component(content: &str) -> bool {
    has_directive(content, "client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_directive_first_line() {
        assert!(is_client_component("'use client';\nconst x = 1;"));
        assert!(is_client_component("\"use client\"\nconst x = 1;"));
    }

    #[test]
    fn test_client_directive_after_comment() {
        assert!(is_client_component("// header\n\n'use client';\nconst x = 1;"));
    }

    #[test]
    fn test_directive_outside_window() {
        let content = "\n\n\n\n\n\n'use client';\nconst x = 1;";
        assert!(!is_client_component(content));
    }

    #[test]
    fn test_server_directive_is_not_client() {
        assert!(!is_client_component("'use server';\nconst x = 1;"));
        assert!(has_directive("'use server';\nconst x = 1;", "server"));
    }

    #[test]
    fn test_directive_in_string_is_ignored() {
        // A quoted mention inside code is not a directive line
        assert!(!is_client_component(r#"const s = "prefix 'use client'";"#));
    }

    #[test]
    fn test_no_directive() {
        assert!(!is_client_component("import React from 'react';"));
        assert!(!is_client_component(""));
    }
}
