//! Directory traversal for candidate source files.
//!
//! This module provides [`FileWalker`], which uses the `ignore` crate to
//! efficiently walk directories while respecting `.gitignore` patterns.
//!
//! # Features
//!
//! - Respects `.gitignore` and `.ignore` patterns
//! - Filters by a configurable extension set (source files by default, a
//!   narrower set for sitemap config discovery)
//! - Skips dependency/build/VCS directories
//! - Does not follow symlink cycles (links are not followed by default)
//! - Treats unreadable directories as empty: skipped, never fatal
//! - Converts paths to UTF-8 [`Utf8PathBuf`](camino::Utf8PathBuf)

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use tracing::warn;

use crate::error::ScanError;

/// Default directories to skip during scanning.
///
/// These are dependency, build, and VCS directories that never contain
/// application source worth analyzing.
const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "out",
    ".git",
    ".next",
    ".nuxt",
    ".turbo",
    ".vercel",
    "coverage",
];

/// Source file extensions included by default.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// A file walker that discovers candidate files in a directory tree.
///
/// Uses the `ignore` crate for efficient traversal with gitignore support.
///
/// # Design
///
/// The walker uses a "collect-then-parallelize" pattern:
///
/// 1. Walker collects all paths first (single-threaded, I/O bound)
/// 2. Paths are then processed in parallel with rayon
///
/// The collected list is finite and restartable: calling
/// [`collect_paths`](Self::collect_paths) again re-walks from the root.
///
/// # Examples
///
/// ```ignore
/// use sb_scanner::FileWalker;
/// use camino::Utf8Path;
///
/// let walker = FileWalker::new(Utf8Path::new("./app"))?;
/// let paths = walker.collect_paths()?;
/// println!("Found {} source files", paths.len());
/// ```
#[derive(Debug)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// File extensions to include.
    extensions: Vec<String>,
    /// Additional directories to skip (beyond the standard denylist).
    skip_dirs: Vec<String>,
    /// Restrict results to files whose name contains this substring.
    name_contains: Option<String>,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl FileWalker {
    /// Creates a new file walker for the given root directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
            extensions: SOURCE_EXTENSIONS.iter().map(ToString::to_string).collect(),
            skip_dirs: Vec::new(),
            name_contains: None,
            follow_links: false,
        })
    }

    /// Replaces the extension set.
    ///
    /// Used for the narrower sitemap-config discovery walk
    /// (`xml`/`js`/`ts`/...).
    #[must_use]
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(ToString::to_string).collect();
        self
    }

    /// Adds directories to skip during traversal.
    ///
    /// These are in addition to the default skip list (`node_modules`,
    /// `dist`, etc.).
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Restricts results to files whose name contains the given substring.
    #[must_use]
    pub fn with_name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Configures whether to follow symbolic links.
    ///
    /// By default, symbolic links are not followed.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collects all candidate file paths in the directory tree.
    ///
    /// Unreadable entries are skipped with a warning rather than failing
    /// the whole walk.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NonUtf8Path`] if a non-UTF-8 path is
    /// encountered.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let mut paths = Vec::new();
        let walker = self.build_walker();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable directory or file: treat as empty
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            // Skip directories and non-files
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();

            // Convert to UTF-8 path
            let utf8_path = Utf8Path::from_path(path)
                .ok_or_else(|| ScanError::NonUtf8Path(path.to_owned()))?;

            if !self.matches_extension(utf8_path) {
                continue;
            }

            if !self.matches_name(utf8_path) {
                continue;
            }

            // Skip files in excluded directories
            if self.should_skip_path(utf8_path) {
                continue;
            }

            paths.push(utf8_path.to_owned());
        }

        // Deterministic traversal order regardless of filesystem ordering
        paths.sort();

        Ok(paths)
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            // Enable standard filters (.gitignore, .ignore, hidden files)
            .standard_filters(true)
            .follow_links(self.follow_links)
            // Use a single thread for walking (we parallelize later)
            .threads(1)
            // Don't require the root to be a git repo
            .require_git(false)
            .build()
    }

    /// Checks if a path matches the configured extension set.
    fn matches_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Checks the optional filename substring filter.
    fn matches_name(&self, path: &Utf8Path) -> bool {
        match &self.name_contains {
            Some(needle) => path.file_name().is_some_and(|name| name.contains(needle)),
            None => true,
        }
    }

    /// Checks if a path should be skipped based on directory name.
    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        for component in path.components() {
            let component_str = component.as_str();

            if SKIP_DIRECTORIES.contains(&component_str) {
                return true;
            }

            if self.skip_dirs.iter().any(|d| d == component_str) {
                return true;
            }
        }

        false
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn bare_walker() -> FileWalker {
        FileWalker {
            root: Utf8PathBuf::from("."),
            extensions: SOURCE_EXTENSIONS.iter().map(ToString::to_string).collect(),
            skip_dirs: Vec::new(),
            name_contains: None,
            follow_links: false,
        }
    }

    #[test]
    fn test_matches_extension() {
        let walker = bare_walker();
        assert!(walker.matches_extension(Utf8Path::new("foo.ts")));
        assert!(walker.matches_extension(Utf8Path::new("foo.tsx")));
        assert!(walker.matches_extension(Utf8Path::new("app/page.jsx")));
        assert!(walker.matches_extension(Utf8Path::new("app/page.js")));
        assert!(!walker.matches_extension(Utf8Path::new("foo.css")));
        assert!(!walker.matches_extension(Utf8Path::new("foo")));
    }

    #[test]
    fn test_with_extensions_override() {
        let walker = bare_walker().with_extensions(&["xml", "ts"]);
        assert!(walker.matches_extension(Utf8Path::new("sitemap.xml")));
        assert!(walker.matches_extension(Utf8Path::new("sitemap.ts")));
        assert!(!walker.matches_extension(Utf8Path::new("page.tsx")));
    }

    #[test]
    fn test_name_contains_filter() {
        let walker = bare_walker().with_name_contains("sitemap");
        assert!(walker.matches_name(Utf8Path::new("public/sitemap.xml")));
        assert!(walker.matches_name(Utf8Path::new("next-sitemap.config.js")));
        assert!(!walker.matches_name(Utf8Path::new("app/page.tsx")));
    }

    #[test]
    fn test_should_skip_path() {
        let walker = bare_walker().with_skip_dirs(&["custom_skip"]);

        assert!(walker.should_skip_path(Utf8Path::new("node_modules/foo.ts")));
        assert!(walker.should_skip_path(Utf8Path::new("src/node_modules/bar.ts")));
        assert!(walker.should_skip_path(Utf8Path::new(".next/static/chunk.js")));
        assert!(walker.should_skip_path(Utf8Path::new("custom_skip/foo.ts")));

        assert!(!walker.should_skip_path(Utf8Path::new("app/page.tsx")));
        assert!(!walker.should_skip_path(Utf8Path::new("src/components/Form.tsx")));
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let result = FileWalker::new(Utf8Path::new("/nonexistent/path/xyz"));
        assert!(result.is_err());
    }

    #[test]
    fn test_collect_paths_from_temp_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");

        fs::create_dir_all(root.join("app/contact").as_std_path()).expect("mkdir");
        fs::create_dir_all(root.join("node_modules/pkg").as_std_path()).expect("mkdir");
        fs::write(root.join("app/page.tsx").as_std_path(), "export {}").expect("write");
        fs::write(root.join("app/contact/page.tsx").as_std_path(), "export {}").expect("write");
        fs::write(root.join("app/styles.css").as_std_path(), "").expect("write");
        fs::write(root.join("node_modules/pkg/index.js").as_std_path(), "").expect("write");

        let walker = FileWalker::new(root).expect("walker");
        let paths = walker.collect_paths().expect("paths");

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.extension() == Some("tsx")));
        assert!(paths.iter().all(|p| !p.as_str().contains("node_modules")));
        // Sorted, deterministic order
        assert!(paths[0] < paths[1]);
    }
}
