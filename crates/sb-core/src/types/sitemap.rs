//! Sitemap detection types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// How a project generates (or ships) its sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SitemapGenerator {
    /// A `next-sitemap.config.js`-style configuration file.
    NextSitemap,

    /// An app-router `sitemap.ts`/`sitemap.js` route handler.
    AppRouter,

    /// A checked-in static `sitemap.xml`.
    StaticXml,

    /// A hand-rolled generator script.
    Custom,
}

impl SitemapGenerator {
    /// Returns a human-readable label for this generator.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NextSitemap => "next-sitemap",
            Self::AppRouter => "app-router",
            Self::StaticXml => "static-xml",
            Self::Custom => "custom",
        }
    }
}

/// A sitemap artifact detected in the project tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapDetection {
    /// Path of the file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range (unknown for whole-file artifacts like static XML).
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// How the sitemap is generated.
    pub generator: SitemapGenerator,

    /// Number of `<url>` entries, for static XML artifacts.
    pub url_count: Option<usize>,
}
