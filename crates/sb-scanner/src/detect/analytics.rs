//! Analytics snippet detection.
//!
//! Tracking snippets are injected as inline scripts, template strings, or
//! loader tags, so recognition is an ordered provider regex table over raw
//! text, with the tracking identifier captured where the snippet carries
//! one.

use std::sync::OnceLock;

use regex::Regex;
use sb_core::{AnalyticsDetection, AnalyticsProvider, Detection, MatchStrategy, SourceSpan};

use super::{Detector, FileContext, line_of_offset};

/// One provider's recognition rules.
struct ProviderPattern {
    provider: AnalyticsProvider,
    presence: Regex,
    id: Option<Regex>,
}

/// The ordered provider table, compiled once.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn provider_patterns() -> &'static Vec<ProviderPattern> {
    static PATTERNS: OnceLock<Vec<ProviderPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            ProviderPattern {
                provider: AnalyticsProvider::Ga4,
                presence: Regex::new(r#"gtag\(\s*['"]config['"]|G-[A-Z0-9]{6,}"#).unwrap(),
                id: Some(Regex::new(r"\b(G-[A-Z0-9]{6,})\b").unwrap()),
            },
            ProviderPattern {
                provider: AnalyticsProvider::UniversalAnalytics,
                presence: Regex::new(r"\bUA-\d{4,}-\d+\b").unwrap(),
                id: Some(Regex::new(r"\b(UA-\d{4,}-\d+)\b").unwrap()),
            },
            ProviderPattern {
                provider: AnalyticsProvider::GoogleTagManager,
                presence: Regex::new(r"googletagmanager\.com|\bGTM-[A-Z0-9]+\b").unwrap(),
                id: Some(Regex::new(r"\b(GTM-[A-Z0-9]+)\b").unwrap()),
            },
            ProviderPattern {
                provider: AnalyticsProvider::MetaPixel,
                presence: Regex::new(r#"fbq\(\s*['"]init['"]|connect\.facebook\.net"#).unwrap(),
                id: Some(Regex::new(r#"fbq\(\s*['"]init['"],\s*['"](\d+)['"]"#).unwrap()),
            },
            ProviderPattern {
                provider: AnalyticsProvider::Plausible,
                presence: Regex::new(r"plausible\.io/js").unwrap(),
                id: Some(Regex::new(r#"data-domain=["']([^"']+)["']"#).unwrap()),
            },
            ProviderPattern {
                provider: AnalyticsProvider::Segment,
                presence: Regex::new(r"analytics\.load\(").unwrap(),
                id: Some(Regex::new(r#"analytics\.load\(\s*['"]([^'"]+)['"]"#).unwrap()),
            },
            ProviderPattern {
                provider: AnalyticsProvider::Hotjar,
                presence: Regex::new(r"\bhjid\b|static\.hotjar\.com").unwrap(),
                id: Some(Regex::new(r"hjid\s*:\s*(\d+)").unwrap()),
            },
        ]
    })
}

/// Detects analytics tracking snippets.
pub struct AnalyticsDetector;

impl Detector for AnalyticsDetector {
    fn name(&self) -> &'static str {
        "analytics"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        let mut detections = Vec::new();

        for pattern in provider_patterns() {
            let Some(m) = pattern.presence.find(ctx.source) else {
                continue;
            };

            let tracking_id = pattern.id.as_ref().and_then(|re| {
                re.captures(ctx.source)
                    .and_then(|c| c.get(1))
                    .map(|g| g.as_str().to_owned())
            });

            detections.push(Detection::Analytics(AnalyticsDetection {
                file_path: ctx.path.to_owned(),
                span: SourceSpan::line(line_of_offset(ctx.source, m.start())),
                strategy: MatchStrategy::Text,
                provider: pattern.provider,
                tracking_id,
            }));
        }

        detections
    }
}
