//! Page metadata detection types.
//!
//! This module provides types for representing how a page or layout file
//! declares its metadata (title, description), if at all.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// How a page or layout declares its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MetadataKind {
    /// A `metadata` export or `generateMetadata` function (app router).
    NextMetadata,

    /// A `<Head>`/`<head>` tag with title/meta children.
    HeadTag,

    /// The `next-seo` component family.
    NextSeo,

    /// A page file with no metadata declaration at all.
    NoMetadata,

    /// Some other recognizable metadata mechanism.
    Other,
}

impl MetadataKind {
    /// Returns `true` if the file actually declares metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use sb_core::MetadataKind;
    ///
    /// assert!(MetadataKind::NextMetadata.declares_metadata());
    /// assert!(!MetadataKind::NoMetadata.declares_metadata());
    /// ```
    #[inline]
    #[must_use]
    pub const fn declares_metadata(self) -> bool {
        !matches!(self, Self::NoMetadata)
    }

    /// Returns a human-readable label for this kind.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NextMetadata => "next-metadata",
            Self::HeadTag => "head",
            Self::NextSeo => "next-seo",
            Self::NoMetadata => "no-metadata",
            Self::Other => "other",
        }
    }
}

/// A metadata declaration (or its absence) detected in a page/layout file.
///
/// # Examples
///
/// ```
/// use sb_core::{MatchStrategy, MetadataDetection, MetadataKind, SourceSpan};
/// use camino::Utf8PathBuf;
///
/// let detection = MetadataDetection {
///     file_path: Utf8PathBuf::from("app/about/page.tsx"),
///     span: SourceSpan::new(3, 6),
///     strategy: MatchStrategy::Text,
///     kind: MetadataKind::NextMetadata,
///     title: Some("About us".to_owned()),
///     description: None,
///     is_client_component: false,
/// };
///
/// assert!(detection.has_content());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDetection {
    /// Path of the page/layout file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the metadata declaration (unknown for `NoMetadata`).
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// How the metadata is declared.
    pub kind: MetadataKind,

    /// Extracted page title, if one was found.
    pub title: Option<String>,

    /// Extracted page description, if one was found.
    pub description: Option<String>,

    /// Whether the file starts with a `'use client'` directive.
    pub is_client_component: bool,
}

impl MetadataDetection {
    /// Returns `true` if the declaration carries a non-empty title or
    /// description.
    ///
    /// Used by the scan post-filter: a layout with content excludes its
    /// sibling pages from the no-metadata list.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.kind.declares_metadata()
            && (self.title.as_ref().is_some_and(|t| !t.is_empty())
                || self.description.as_ref().is_some_and(|d| !d.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(kind: MetadataKind, title: Option<&str>) -> MetadataDetection {
        MetadataDetection {
            file_path: Utf8PathBuf::from("app/page.tsx"),
            span: SourceSpan::unknown(),
            strategy: MatchStrategy::Text,
            kind,
            title: title.map(ToOwned::to_owned),
            description: None,
            is_client_component: false,
        }
    }

    #[test]
    fn test_declares_metadata() {
        assert!(MetadataKind::NextMetadata.declares_metadata());
        assert!(MetadataKind::HeadTag.declares_metadata());
        assert!(MetadataKind::NextSeo.declares_metadata());
        assert!(MetadataKind::Other.declares_metadata());
        assert!(!MetadataKind::NoMetadata.declares_metadata());
    }

    #[test]
    fn test_has_content() {
        assert!(detection(MetadataKind::NextMetadata, Some("X")).has_content());
        assert!(!detection(MetadataKind::NextMetadata, Some("")).has_content());
        assert!(!detection(MetadataKind::NextMetadata, None).has_content());
        assert!(!detection(MetadataKind::NoMetadata, Some("X")).has_content());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(MetadataKind::NextMetadata.label(), "next-metadata");
        assert_eq!(MetadataKind::NoMetadata.label(), "no-metadata");
    }

    #[test]
    fn test_detection_serialization() {
        let d = detection(MetadataKind::HeadTag, Some("Title"));
        let json = serde_json::to_string(&d).unwrap();
        let parsed: MetadataDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }
}
