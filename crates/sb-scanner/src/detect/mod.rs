//! The detector interface and the eight concern detectors.
//!
//! Each detector is a pure function from a [`FileContext`] (path, raw text,
//! optional syntax tree, extracted imports) to a list of
//! [`Detection`](sb_core::Detection)s. Detectors try the precise tree-based
//! strategy first and fall back to permissive text matching where the
//! concern is too heterogeneous for reliable tree matching; every detection
//! carries its [`MatchStrategy`](sb_core::MatchStrategy) tag.

use camino::Utf8Path;
use sb_core::Detection;
use sb_ts_parser::ImportBinding;
use tree_sitter::Tree;

pub mod analytics;
pub mod faqs;
pub mod forms;
pub mod images;
pub mod metadata;
pub mod schemas;
pub mod sitemaps;
pub mod widgets;

/// Module path of the managed component SDK.
pub const MANAGED_COMPONENT_MODULE: &str = "@sitebridge/react";

/// Module path of the managed metadata helper.
pub const MANAGED_SEO_MODULE: &str = "@sitebridge/seo";

/// Everything a detector may look at for one file.
///
/// The tree is `None` when the file failed to parse; tree-based detectors
/// return empty in that case while text-based detectors still run over
/// `source`.
#[derive(Debug)]
pub struct FileContext<'a> {
    /// Path of the file, relative to the scan root.
    pub path: &'a Utf8Path,

    /// The full file text (files are read whole, never streamed).
    pub source: &'a str,

    /// The parsed syntax tree, when parsing succeeded.
    pub tree: Option<&'a Tree>,

    /// Static imports extracted from the tree (empty when unparsed).
    pub imports: &'a [ImportBinding],
}

impl FileContext<'_> {
    /// Returns `true` if the file imports the given module.
    #[must_use]
    pub fn imports_module(&self, module: &str) -> bool {
        self.imports.iter().any(|i| i.module == module)
    }

    /// Returns `true` if the file name (without extension) matches one of
    /// the given stems.
    #[must_use]
    pub fn has_file_stem(&self, stems: &[&str]) -> bool {
        self.path
            .file_stem()
            .is_some_and(|stem| stems.contains(&stem))
    }
}

/// A single concern detector.
///
/// Implementations are stateless unit structs; the scanner holds one fixed
/// set and runs them per file in a fixed order.
pub trait Detector: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Emits zero or more detections for one file.
    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection>;
}

/// All detectors in their fixed run order.
#[must_use]
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(forms::FormDetector),
        Box::new(metadata::MetadataDetector),
        Box::new(widgets::WidgetDetector),
        Box::new(schemas::SchemaDetector),
        Box::new(faqs::FaqDetector),
        Box::new(analytics::AnalyticsDetector),
        Box::new(images::ImageDetector),
    ]
}

/// Converts a byte offset into a 1-based line number.
///
/// Used by text-based detectors to attach spans to regex matches.
#[must_use]
pub(crate) fn line_of_offset(source: &str, offset: usize) -> u32 {
    let clamped = offset.min(source.len());
    let newlines = source.as_bytes()[..clamped]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    #[allow(clippy::cast_possible_truncation)] // source files fit in u32 lines
    let line = newlines as u32 + 1;
    line
}
