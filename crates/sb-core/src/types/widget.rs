//! Chat widget detection types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// A third-party chat widget provider recognized by its embed snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ChatProvider {
    /// Intercom (`window.Intercom`, `widget.intercom.io`).
    Intercom,
    /// Drift (`drift.load`, `js.driftt.com`).
    Drift,
    /// Zendesk (`static.zdassets.com`).
    Zendesk,
    /// Crisp (`$crisp`, `client.crisp.chat`).
    Crisp,
    /// Tawk.to (`embed.tawk.to`).
    Tawk,
    /// HubSpot conversations (`js.hs-scripts.com`).
    HubSpot,
}

impl ChatProvider {
    /// Returns a human-readable label for this provider.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intercom => "intercom",
            Self::Drift => "drift",
            Self::Zendesk => "zendesk",
            Self::Crisp => "crisp",
            Self::Tawk => "tawk",
            Self::HubSpot => "hubspot",
        }
    }
}

/// A third-party chat widget embed detected in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDetection {
    /// Path of the file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the embed snippet (unknown for text-only matches).
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// The recognized provider.
    pub provider: ChatProvider,

    /// Provider-side identifier (app id, site id, key), when capturable.
    pub widget_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_labels() {
        assert_eq!(ChatProvider::Intercom.label(), "intercom");
        assert_eq!(ChatProvider::Tawk.label(), "tawk");
        assert_eq!(ChatProvider::HubSpot.label(), "hubspot");
    }

    #[test]
    fn test_detection_serialization() {
        let d = WidgetDetection {
            file_path: Utf8PathBuf::from("app/layout.tsx"),
            span: SourceSpan::unknown(),
            strategy: MatchStrategy::Text,
            provider: ChatProvider::Crisp,
            widget_id: Some("abcd-1234".to_owned()),
        };
        let json = serde_json::to_string(&d).unwrap();
        let parsed: WidgetDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }
}
