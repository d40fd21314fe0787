//! The [`Detection`] enum and its category/strategy tags.
//!
//! A detection is a pure, immutable snapshot of one legacy pattern found in
//! source. It never outlives the scan that produced it: line numbers are not
//! re-validated before rewriting, so scanning and migrating must operate on
//! the same read of each file.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use super::analytics::AnalyticsDetection;
use super::faq::FaqDetection;
use super::form::FormDetection;
use super::image::ImageDetection;
use super::metadata::MetadataDetection;
use super::schema::SchemaDetection;
use super::sitemap::SitemapDetection;
use super::span::SourceSpan;
use super::widget::WidgetDetection;

/// Which matching strategy produced a detection.
///
/// Detectors try the precise tree-based strategy first and fall back to
/// permissive text matching; the tag is carried for debuggability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MatchStrategy {
    /// Matched against the parsed syntax tree.
    Ast,
    /// Matched against raw text with regular expressions.
    Text,
}

impl MatchStrategy {
    /// Returns a human-readable label for this strategy.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ast => "ast",
            Self::Text => "text",
        }
    }
}

/// The eight concern categories the scanner knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DetectionCategory {
    /// HTML forms with submit handlers.
    Forms,
    /// Page metadata declarations.
    Metadata,
    /// Third-party chat widgets.
    Widgets,
    /// Inline JSON-LD structured data.
    Schemas,
    /// FAQ sections.
    Faqs,
    /// Sitemap artifacts.
    Sitemaps,
    /// Analytics tracking snippets.
    Analytics,
    /// Raster image usages.
    Images,
}

impl DetectionCategory {
    /// All categories in migration order.
    ///
    /// Migrations are applied category by category in this order; images
    /// are detected but never migrated (the upload pipeline is external).
    pub const ALL: [Self; 8] = [
        Self::Forms,
        Self::Widgets,
        Self::Metadata,
        Self::Schemas,
        Self::Faqs,
        Self::Sitemaps,
        Self::Analytics,
        Self::Images,
    ];

    /// Returns a human-readable label for this category.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Forms => "forms",
            Self::Metadata => "metadata",
            Self::Widgets => "widgets",
            Self::Schemas => "schemas",
            Self::Faqs => "faqs",
            Self::Sitemaps => "sitemaps",
            Self::Analytics => "analytics",
            Self::Images => "images",
        }
    }
}

/// One detected instance of a legacy pattern.
///
/// Each variant wraps the category-specific record; the shared accessors
/// below expose the base shape (file path, span, strategy, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Detection {
    /// A hand-written form.
    Form(FormDetection),
    /// A metadata declaration (or its absence).
    Metadata(MetadataDetection),
    /// A chat widget embed.
    Widget(WidgetDetection),
    /// An inline JSON-LD block.
    Schema(SchemaDetection),
    /// A FAQ section.
    Faq(FaqDetection),
    /// A sitemap artifact.
    Sitemap(SitemapDetection),
    /// An analytics snippet.
    Analytics(AnalyticsDetection),
    /// An image usage.
    Image(ImageDetection),
}

impl Detection {
    /// Returns the path of the file this detection was found in.
    #[must_use]
    pub fn file_path(&self) -> &Utf8Path {
        match self {
            Self::Form(d) => &d.file_path,
            Self::Metadata(d) => &d.file_path,
            Self::Widget(d) => &d.file_path,
            Self::Schema(d) => &d.file_path,
            Self::Faq(d) => &d.file_path,
            Self::Sitemap(d) => &d.file_path,
            Self::Analytics(d) => &d.file_path,
            Self::Image(d) => &d.file_path,
        }
    }

    /// Returns the source span of the matched construct.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::Form(d) => d.span,
            Self::Metadata(d) => d.span,
            Self::Widget(d) => d.span,
            Self::Schema(d) => d.span,
            Self::Faq(d) => d.span,
            Self::Sitemap(d) => d.span,
            Self::Analytics(d) => d.span,
            Self::Image(d) => d.span,
        }
    }

    /// Returns the strategy that produced this detection.
    #[must_use]
    pub const fn strategy(&self) -> MatchStrategy {
        match self {
            Self::Form(d) => d.strategy,
            Self::Metadata(d) => d.strategy,
            Self::Widget(d) => d.strategy,
            Self::Schema(d) => d.strategy,
            Self::Faq(d) => d.strategy,
            Self::Sitemap(d) => d.strategy,
            Self::Analytics(d) => d.strategy,
            Self::Image(d) => d.strategy,
        }
    }

    /// Returns the concern category of this detection.
    #[must_use]
    pub const fn category(&self) -> DetectionCategory {
        match self {
            Self::Form(_) => DetectionCategory::Forms,
            Self::Metadata(_) => DetectionCategory::Metadata,
            Self::Widget(_) => DetectionCategory::Widgets,
            Self::Schema(_) => DetectionCategory::Schemas,
            Self::Faq(_) => DetectionCategory::Faqs,
            Self::Sitemap(_) => DetectionCategory::Sitemaps,
            Self::Analytics(_) => DetectionCategory::Analytics,
            Self::Image(_) => DetectionCategory::Images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatProvider, ImageElement};
    use camino::Utf8PathBuf;

    #[test]
    fn test_strategy_labels() {
        assert_eq!(MatchStrategy::Ast.label(), "ast");
        assert_eq!(MatchStrategy::Text.label(), "text");
    }

    #[test]
    fn test_category_order() {
        assert_eq!(DetectionCategory::ALL[0], DetectionCategory::Forms);
        assert_eq!(DetectionCategory::ALL[1], DetectionCategory::Widgets);
        assert_eq!(DetectionCategory::ALL[2], DetectionCategory::Metadata);
        assert_eq!(DetectionCategory::ALL.len(), 8);
    }

    #[test]
    fn test_detection_accessors() {
        let detection = Detection::Widget(WidgetDetection {
            file_path: Utf8PathBuf::from("app/layout.tsx"),
            span: SourceSpan::new(3, 9),
            strategy: MatchStrategy::Text,
            provider: ChatProvider::Drift,
            widget_id: None,
        });

        assert_eq!(detection.file_path().as_str(), "app/layout.tsx");
        assert_eq!(detection.span(), SourceSpan::new(3, 9));
        assert_eq!(detection.strategy(), MatchStrategy::Text);
        assert_eq!(detection.category(), DetectionCategory::Widgets);
    }

    #[test]
    fn test_detection_tagged_serialization() {
        let detection = Detection::Image(ImageDetection {
            file_path: Utf8PathBuf::from("app/page.tsx"),
            span: SourceSpan::line(4),
            strategy: MatchStrategy::Ast,
            element: ImageElement::ImgTag,
            src: "/a.png".to_owned(),
            alt: None,
            is_raster: true,
        });
        let json = serde_json::to_string(&detection).unwrap();
        assert!(json.contains(r#""category":"image""#));
        let parsed: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(detection, parsed);
    }
}
