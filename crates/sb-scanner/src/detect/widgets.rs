//! Chat widget detection.
//!
//! Embed snippets are too heterogeneous for tree matching (inline scripts,
//! template strings, loader functions), so recognition is an ordered set of
//! provider regexes over raw text. One detection is emitted per provider
//! per file.

use std::sync::OnceLock;

use regex::Regex;
use sb_core::{ChatProvider, Detection, MatchStrategy, SourceSpan, WidgetDetection};

use super::{Detector, FileContext, line_of_offset};

/// One provider's recognition rules.
struct ProviderPattern {
    provider: ChatProvider,
    /// Any hit marks the provider as present.
    presence: Regex,
    /// Captures the provider-side identifier, when the snippet carries one.
    id: Option<Regex>,
}

/// The ordered provider table, compiled once.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn provider_patterns() -> &'static Vec<ProviderPattern> {
    static PATTERNS: OnceLock<Vec<ProviderPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            ProviderPattern {
                provider: ChatProvider::Intercom,
                presence: Regex::new(r"widget\.intercom\.io|window\.Intercom").unwrap(),
                id: Some(Regex::new(r#"app_id:\s*['"]([^'"]+)['"]"#).unwrap()),
            },
            ProviderPattern {
                provider: ChatProvider::Drift,
                presence: Regex::new(r"js\.driftt\.com|drift\.load\(").unwrap(),
                id: Some(Regex::new(r#"drift\.load\(\s*['"]([^'"]+)['"]"#).unwrap()),
            },
            ProviderPattern {
                provider: ChatProvider::Zendesk,
                presence: Regex::new(r"static\.zdassets\.com").unwrap(),
                id: Some(Regex::new(r"snippet\.js\?key=([\w-]+)").unwrap()),
            },
            ProviderPattern {
                provider: ChatProvider::Crisp,
                presence: Regex::new(r"client\.crisp\.chat|\$crisp").unwrap(),
                id: Some(Regex::new(r#"CRISP_WEBSITE_ID\s*=\s*['"]([^'"]+)['"]"#).unwrap()),
            },
            ProviderPattern {
                provider: ChatProvider::Tawk,
                presence: Regex::new(r"embed\.tawk\.to").unwrap(),
                id: Some(Regex::new(r"embed\.tawk\.to/(\w+(?:/\w+)?)").unwrap()),
            },
            ProviderPattern {
                provider: ChatProvider::HubSpot,
                presence: Regex::new(r"js\.hs-scripts\.com").unwrap(),
                id: Some(Regex::new(r"js\.hs-scripts\.com/(\d+)").unwrap()),
            },
        ]
    })
}

/// Detects third-party chat widget embeds.
pub struct WidgetDetector;

impl Detector for WidgetDetector {
    fn name(&self) -> &'static str {
        "widgets"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        let mut detections = Vec::new();

        for pattern in provider_patterns() {
            let Some(m) = pattern.presence.find(ctx.source) else {
                continue;
            };

            let widget_id = pattern.id.as_ref().and_then(|re| {
                re.captures(ctx.source)
                    .and_then(|c| c.get(1))
                    .map(|g| g.as_str().to_owned())
            });

            detections.push(Detection::Widget(WidgetDetection {
                file_path: ctx.path.to_owned(),
                span: SourceSpan::line(line_of_offset(ctx.source, m.start())),
                strategy: MatchStrategy::Text,
                provider: pattern.provider,
                widget_id,
            }));
        }

        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;

    fn detect(source: &str) -> Vec<WidgetDetection> {
        let ctx = FileContext {
            path: Utf8Path::new("app/layout.tsx"),
            source,
            tree: None,
            imports: &[],
        };
        WidgetDetector
            .detect(&ctx)
            .into_iter()
            .map(|d| match d {
                Detection::Widget(w) => w,
                other => panic!("expected widget, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_intercom_with_app_id() {
        let source = r#"
window.Intercom('boot', {
  app_id: 'abc123',
});
"#;
        let widgets = detect(source);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].provider, ChatProvider::Intercom);
        assert_eq!(widgets[0].widget_id.as_deref(), Some("abc123"));
        assert_eq!(widgets[0].span.start_line, 2);
    }

    #[test]
    fn test_drift() {
        let source = r#"drift.load('xyzkey');"#;
        let widgets = detect(source);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].provider, ChatProvider::Drift);
        assert_eq!(widgets[0].widget_id.as_deref(), Some("xyzkey"));
    }

    #[test]
    fn test_zendesk() {
        let source = r#"<script src="https://static.zdassets.com/ekr/snippet.js?key=11112222-3333" />"#;
        let widgets = detect(source);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].provider, ChatProvider::Zendesk);
        assert_eq!(widgets[0].widget_id.as_deref(), Some("11112222-3333"));
    }

    #[test]
    fn test_crisp() {
        let source = r#"
window.$crisp = [];
window.CRISP_WEBSITE_ID = "site-42";
"#;
        let widgets = detect(source);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].provider, ChatProvider::Crisp);
        assert_eq!(widgets[0].widget_id.as_deref(), Some("site-42"));
    }

    #[test]
    fn test_tawk() {
        let source = r"s1.src = 'https://embed.tawk.to/abcdef/1hxyz';";
        let widgets = detect(source);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].provider, ChatProvider::Tawk);
        assert_eq!(widgets[0].widget_id.as_deref(), Some("abcdef/1hxyz"));
    }

    #[test]
    fn test_hubspot() {
        let source = r#"<script src="//js.hs-scripts.com/1234567.js" />"#;
        let widgets = detect(source);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].provider, ChatProvider::HubSpot);
        assert_eq!(widgets[0].widget_id.as_deref(), Some("1234567"));
    }

    #[test]
    fn test_no_widgets() {
        assert!(detect("export default function Page() { return null; }").is_empty());
    }

    #[test]
    fn test_multiple_providers_one_file() {
        let source = r#"
window.Intercom('boot', { app_id: 'a' });
window.$crisp = [];
"#;
        let widgets = detect(source);
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].provider, ChatProvider::Intercom);
        assert_eq!(widgets[1].provider, ChatProvider::Crisp);
    }
}
