//! FAQ section detection types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// The markup shape of a detected FAQ section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FaqKind {
    /// An accordion component (`<Accordion>`, `<AccordionItem>`, ...).
    Accordion,

    /// Native `<details>`/`<summary>` disclosure elements.
    DetailsSummary,

    /// A static list of question/answer pairs.
    StaticList,

    /// A dedicated FAQ component (`<Faq>`, `<FAQSection>`, ...).
    Component,
}

impl FaqKind {
    /// Returns a human-readable label for this kind.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accordion => "accordion",
            Self::DetailsSummary => "details-summary",
            Self::StaticList => "static-list",
            Self::Component => "component",
        }
    }
}

/// A hand-written FAQ section detected in a source file.
///
/// # Examples
///
/// ```
/// use sb_core::{FaqDetection, FaqKind, MatchStrategy, SourceSpan};
/// use camino::Utf8PathBuf;
///
/// let detection = FaqDetection {
///     file_path: Utf8PathBuf::from("app/help/page.tsx"),
///     span: SourceSpan::new(14, 52),
///     strategy: MatchStrategy::Ast,
///     kind: FaqKind::DetailsSummary,
///     component_name: None,
///     item_count: 6,
///     has_schema: false,
/// };
///
/// assert_eq!(detection.kind.label(), "details-summary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqDetection {
    /// Path of the file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the FAQ section.
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// The markup shape of the section.
    pub kind: FaqKind,

    /// Name of the FAQ component, when the section is component-based.
    pub component_name: Option<String>,

    /// Number of question/answer items counted.
    pub item_count: usize,

    /// Whether the same file already carries an `FAQPage` JSON-LD block.
    pub has_schema: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(FaqKind::Accordion.label(), "accordion");
        assert_eq!(FaqKind::DetailsSummary.label(), "details-summary");
        assert_eq!(FaqKind::StaticList.label(), "static-list");
        assert_eq!(FaqKind::Component.label(), "component");
    }

    #[test]
    fn test_detection_serialization() {
        let d = FaqDetection {
            file_path: Utf8PathBuf::from("app/help/page.tsx"),
            span: SourceSpan::new(1, 40),
            strategy: MatchStrategy::Text,
            kind: FaqKind::Accordion,
            component_name: Some("HelpAccordion".to_owned()),
            item_count: 4,
            has_schema: true,
        };
        let json = serde_json::to_string(&d).unwrap();
        let parsed: FaqDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }
}
