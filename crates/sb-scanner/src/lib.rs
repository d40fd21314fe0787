//! Source tree scanner with parallel detection of migratable concerns.
//!
//! This crate is the detection half of the migration engine. It walks a
//! source tree, parses each file, runs the eight concern detectors, and
//! merges everything into one ordered [`ScanResult`].
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which combines:
//!
//! - [`FileWalker`]: directory traversal respecting `.gitignore` patterns
//! - the [`detect`] modules: one detector per concern, AST-first with
//!   text fallbacks
//! - [`ScanStats`]: atomic statistics for progress reporting
//!
//! # Example
//!
//! ```ignore
//! use sb_scanner::{ScanOptions, Scanner};
//! use camino::Utf8Path;
//!
//! let scanner = Scanner::new(ScanOptions::new(Utf8Path::new("./app")))?;
//! let report = scanner.scan()?;
//! println!(
//!     "{} files, {} detections",
//!     report.stats.files_total,
//!     report.result.total()
//! );
//! ```
//!
//! # Ordering
//!
//! Files are analyzed in parallel with rayon, but `par_iter().collect()`
//! preserves input order, so detections always land in traversal order
//! (sorted file paths, then source order within each file). Detections are
//! immutable snapshots: they are only valid against the exact file contents
//! this scan read.
//!
//! # Architecture
//!
//! ```text
//! Scanner
//!     │
//!     ├── FileWalker (collect source paths; second narrow walk for sitemaps)
//!     │
//!     ├── rayon par_iter().map_init (per-thread SourceParser pair)
//!     │       │
//!     │       └── detectors (forms, metadata, widgets, schemas,
//!     │                      faqs, analytics, images)
//!     │
//!     ├── layout-metadata post-filter
//!     │
//!     └── ScanStats (atomic counters)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod detect;
mod error;
mod stats;
mod walker;

pub use detect::{Detector, FileContext};
pub use error::ScanError;
pub use stats::{ScanStats, StatsSnapshot};
pub use walker::FileWalker;

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use sb_core::{MetadataKind, ScanResult};
use sb_ts_parser::{ImportBinding, SourceGrammar, SourceParser, extract_imports, import_query_for};
use tracing::{debug, info, warn};

use detect::metadata::is_layout_file;
use detect::sitemaps::SitemapDetector;

/// Extensions of the narrower sitemap-discovery walk.
const SITEMAP_EXTENSIONS: &[&str] = &["xml", "js", "cjs", "mjs", "ts"];

/// Configuration for one scan run.
///
/// # Examples
///
/// ```
/// use sb_scanner::ScanOptions;
/// use camino::Utf8Path;
///
/// let options = ScanOptions::new(Utf8Path::new("./app"))
///     .with_skip_dirs(&["vendor"]);
/// assert_eq!(options.root.as_str(), "./app");
/// ```
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Root directory to scan.
    pub root: Utf8PathBuf,
    /// Additional directories to skip.
    pub skip_dirs: Vec<String>,
    /// Whether to follow symbolic links.
    pub follow_links: bool,
}

impl ScanOptions {
    /// Creates scan options for the given root directory.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            skip_dirs: Vec::new(),
            follow_links: false,
        }
    }

    /// Adds directories to skip during scanning.
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

/// Result of a scan run: detections, statistics, and non-fatal errors.
#[derive(Debug)]
pub struct ScanReport {
    /// All detections, one ordered list per category.
    pub result: ScanResult,
    /// Statistics snapshot from the scan.
    pub stats: StatsSnapshot,
    /// Non-fatal errors encountered (unreadable files).
    pub errors: Vec<(Utf8PathBuf, ScanError)>,
}

/// The main scanner.
///
/// Cheaply cloneable via an internal `Arc` for the statistics; clones share
/// counters, so a UI thread can snapshot progress while a scan runs.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Scanner configuration.
    options: ScanOptions,
    /// Statistics counters (shared via Arc for cloning).
    stats: Arc<ScanStats>,
}

impl Scanner {
    /// Creates a new scanner with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root directory doesn't exist
    /// or isn't a directory.
    pub fn new(options: ScanOptions) -> Result<Self, ScanError> {
        if !options.root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {}",
                options.root
            )));
        }
        if !options.root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {}",
                options.root
            )));
        }

        info!(root = %options.root, "Creating scanner");

        Ok(Self {
            options,
            stats: Arc::new(ScanStats::new()),
        })
    }

    /// Performs a full scan of the configured directory.
    ///
    /// This method:
    ///
    /// 1. Walks the tree to collect source file paths
    /// 2. Analyzes files in parallel (per-thread parsers via `map_init`)
    /// 3. Runs the narrow sitemap-discovery walk
    /// 4. Applies the layout-metadata post-filter
    /// 5. Updates statistics counters
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] or [`ScanError::NonUtf8Path`] if the
    /// directory walk itself fails; per-file read errors are collected in
    /// the report instead.
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        info!(root = %self.options.root, "Starting scan");
        self.stats.reset();

        let paths = self.source_walker()?.collect_paths()?;
        info!(count = paths.len(), "Collected source files");

        let detectors = detect::all_detectors();
        let root = &self.options.root;

        // Parallel analysis; collect() preserves path order
        let per_file: Vec<(Utf8PathBuf, Result<(ScanResult, bool), ScanError>)> = paths
            .par_iter()
            .map_init(
                // Per-thread initialization: one parser per grammar
                || {
                    (
                        SourceParser::typescript().ok(),
                        SourceParser::tsx().ok(),
                    )
                },
                |(ts_parser, tsx_parser), path| {
                    let outcome = analyze_file(
                        path,
                        root,
                        ts_parser.as_mut(),
                        tsx_parser.as_mut(),
                        &detectors,
                    );
                    (path.clone(), outcome)
                },
            )
            .collect();

        let mut result = ScanResult::new();
        let mut errors = Vec::new();

        for (path, outcome) in per_file {
            self.stats.increment_files();
            match outcome {
                Ok((file_result, parsed)) => {
                    if parsed {
                        self.stats.increment_parsed();
                    } else {
                        self.stats.increment_parse_failures();
                    }
                    debug!(path = %path, detections = file_result.total(), "Analyzed file");
                    result.merge(file_result);
                }
                Err(e) => {
                    self.stats.increment_read_failures();
                    warn!(path = %path, error = %e, "Failed to analyze file");
                    errors.push((path, e));
                }
            }
        }

        // Second, narrower walk for sitemap artifacts
        self.scan_sitemaps(&mut result, &mut errors)?;

        // Layout-level metadata is inherited by child pages
        apply_layout_metadata_filter(&mut result);

        self.stats.add_detections(result.total() as u64);

        let stats = self.stats.snapshot();
        info!(
            files = stats.files_total,
            parsed = stats.files_parsed,
            detections = stats.detections,
            errors = errors.len(),
            "Scan completed"
        );

        Ok(ScanReport {
            result,
            stats,
            errors,
        })
    }

    /// Runs the sitemap detector over the narrow discovery walk.
    fn scan_sitemaps(
        &self,
        result: &mut ScanResult,
        errors: &mut Vec<(Utf8PathBuf, ScanError)>,
    ) -> Result<(), ScanError> {
        let walker = self
            .source_walker()?
            .with_extensions(SITEMAP_EXTENSIONS)
            .with_name_contains("sitemap");
        let paths = walker.collect_paths()?;
        debug!(count = paths.len(), "Collected sitemap candidates");

        for path in paths {
            let source = match fs::read_to_string(path.as_std_path()) {
                Ok(source) => source,
                Err(e) => {
                    self.stats.increment_read_failures();
                    errors.push((path.clone(), ScanError::read(path, e)));
                    continue;
                }
            };
            let rel = relative_to(&path, &self.options.root);
            let ctx = FileContext {
                path: rel,
                source: &source,
                tree: None,
                imports: &[],
            };
            for detection in SitemapDetector.detect(&ctx) {
                result.push(detection);
            }
        }

        Ok(())
    }

    /// Builds a source file walker with the current options.
    fn source_walker(&self) -> Result<FileWalker, ScanError> {
        let mut walker = FileWalker::new(&self.options.root)?;
        if !self.options.skip_dirs.is_empty() {
            let skip: Vec<&str> = self.options.skip_dirs.iter().map(String::as_str).collect();
            walker = walker.with_skip_dirs(&skip);
        }
        Ok(walker.with_follow_links(self.options.follow_links))
    }

    /// Returns a snapshot of current statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the scanner options.
    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }
}

/// Reads, parses, and runs all detectors over one file.
///
/// A parse failure is not an error: the tree stays `None` and text-based
/// detectors still run. The bool in the result reports whether the file
/// parsed.
fn analyze_file(
    path: &Utf8Path,
    root: &Utf8Path,
    ts_parser: Option<&mut SourceParser>,
    tsx_parser: Option<&mut SourceParser>,
    detectors: &[Box<dyn Detector>],
) -> Result<(ScanResult, bool), ScanError> {
    let source =
        fs::read_to_string(path.as_std_path()).map_err(|e| ScanError::read(path, e))?;

    let grammar = SourceGrammar::for_extension(path.extension().unwrap_or_default());
    let parser = match grammar {
        SourceGrammar::TypeScript => ts_parser.or(tsx_parser),
        SourceGrammar::Tsx => tsx_parser.or(ts_parser),
    };

    // A tree with syntax errors is as unusable as no tree: detectors fall
    // back to text matching either way
    let tree = parser
        .and_then(|p| p.parse(&source).ok())
        .filter(|t| !t.root_node().has_error());
    let parsed = tree.is_some();

    let imports: Vec<ImportBinding> = match (&tree, import_query_for(grammar)) {
        (Some(tree), Ok(query)) => extract_imports(tree, &source, query),
        _ => Vec::new(),
    };

    let rel = relative_to(path, root);
    let ctx = FileContext {
        path: rel,
        source: &source,
        tree: tree.as_ref(),
        imports: &imports,
    };

    let mut result = ScanResult::new();
    for detector in detectors {
        for detection in detector.detect(&ctx) {
            result.push(detection);
        }
    }

    Ok((result, parsed))
}

/// Strips the scan root from a path, falling back to the full path.
fn relative_to<'a>(path: &'a Utf8Path, root: &Utf8Path) -> &'a Utf8Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Removes no-metadata detections for pages whose sibling layout already
/// carries non-empty metadata.
///
/// Layout-level metadata is inherited by child pages, so those pages are
/// not actually missing anything.
fn apply_layout_metadata_filter(result: &mut ScanResult) {
    let covered_dirs: FxHashSet<Utf8PathBuf> = result
        .metadata
        .iter()
        .filter(|m| is_layout_file(&m.file_path) && m.has_content())
        .filter_map(|m| m.file_path.parent().map(ToOwned::to_owned))
        .collect();

    if covered_dirs.is_empty() {
        return;
    }

    result.metadata.retain(|m| {
        m.kind != MetadataKind::NoMetadata
            || !m
                .file_path
                .parent()
                .is_some_and(|dir| covered_dirs.contains(dir))
    });
}
