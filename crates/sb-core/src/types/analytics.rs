//! Analytics snippet detection types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// An analytics provider recognized by its tracking snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AnalyticsProvider {
    /// Google Analytics 4 (`gtag('config', 'G-...')`).
    Ga4,
    /// Universal Analytics (`UA-...`).
    UniversalAnalytics,
    /// Google Tag Manager (`GTM-...`).
    GoogleTagManager,
    /// Meta Pixel (`fbq('init', ...)`).
    MetaPixel,
    /// Plausible (`plausible.io/js`).
    Plausible,
    /// Segment (`analytics.load('...')`).
    Segment,
    /// Hotjar (`hjid: ...`).
    Hotjar,
}

impl AnalyticsProvider {
    /// Returns a human-readable label for this provider.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ga4 => "ga4",
            Self::UniversalAnalytics => "universal-analytics",
            Self::GoogleTagManager => "google-tag-manager",
            Self::MetaPixel => "meta-pixel",
            Self::Plausible => "plausible",
            Self::Segment => "segment",
            Self::Hotjar => "hotjar",
        }
    }
}

/// An analytics tracking snippet detected in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsDetection {
    /// Path of the file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the snippet (unknown for text-only matches).
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// The recognized provider.
    pub provider: AnalyticsProvider,

    /// Tracking identifier (measurement id, container id, pixel id, ...).
    pub tracking_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_labels() {
        assert_eq!(AnalyticsProvider::Ga4.label(), "ga4");
        assert_eq!(
            AnalyticsProvider::GoogleTagManager.label(),
            "google-tag-manager"
        );
        assert_eq!(AnalyticsProvider::Hotjar.label(), "hotjar");
    }

    #[test]
    fn test_detection_serialization() {
        let d = AnalyticsDetection {
            file_path: Utf8PathBuf::from("app/layout.tsx"),
            span: SourceSpan::new(30, 38),
            strategy: MatchStrategy::Text,
            provider: AnalyticsProvider::Ga4,
            tracking_id: Some("G-ABC123XYZ".to_owned()),
        };
        let json = serde_json::to_string(&d).unwrap();
        let parsed: AnalyticsDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }
}
