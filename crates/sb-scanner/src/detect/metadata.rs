//! Page metadata detection.
//!
//! Restricted to files matching the page/layout naming convention. Checks,
//! in priority order: a static metadata export or dynamic metadata function,
//! a third-party SEO component, a markup head tag, and finally (for page
//! files only) the absence of any metadata. Files already using the managed
//! metadata API return early with no detection.

use std::sync::OnceLock;

use camino::Utf8Path;
use regex::Regex;
use sb_core::{Detection, MatchStrategy, MetadataDetection, MetadataKind, SourceSpan};
use sb_rewrite::{is_client_component, match_balanced_braces};

use super::{Detector, FileContext, MANAGED_SEO_MODULE, line_of_offset};

/// Matches a static metadata export or dynamic metadata function.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn metadata_export_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export\s+(?:const\s+metadata\b|(?:async\s+)?function\s+generateMetadata\b)")
            .unwrap()
    })
}

/// Extracts `title: '...'` from an object literal.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn title_property_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\btitle\s*:\s*['"]([^'"]*)['"]"#).unwrap()
    })
}

/// Extracts `description: '...'` from an object literal.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn description_property_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bdescription\s*:\s*['"]([^'"]*)['"]"#).unwrap()
    })
}

/// Matches `<NextSeo ... title="..." />` usage.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn next_seo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<NextSeo\b(?:[^>]*\btitle=["']([^"']*)["'])?"#).unwrap()
    })
}

/// Matches a `<Head>`/`<head>` opening tag.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn head_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(?:Head|head)>").unwrap()
    })
}

/// Extracts `<title>...</title>` content.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn title_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<title>([^<]*)</title>").unwrap()
    })
}

/// Extracts a description meta tag's content.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn meta_description_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<meta\s+name=["']description["']\s+content=["']([^"']*)["']"#).unwrap()
    })
}

/// Detects how page/layout files declare their metadata.
pub struct MetadataDetector;

impl Detector for MetadataDetector {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        if !is_page_file(ctx.path) && !is_layout_file(ctx.path) {
            return Vec::new();
        }

        // Already on the managed metadata API: nothing to report
        if ctx.source.contains(MANAGED_SEO_MODULE) {
            return Vec::new();
        }

        let is_client = is_client_component(ctx.source);

        let detection = detect_export(ctx, is_client)
            .or_else(|| detect_next_seo(ctx, is_client))
            .or_else(|| detect_head_tag(ctx, is_client))
            .or_else(|| {
                // Only pages are reported as missing metadata; layouts
                // without metadata are simply silent
                is_page_file(ctx.path).then(|| MetadataDetection {
                    file_path: ctx.path.to_owned(),
                    span: SourceSpan::unknown(),
                    strategy: MatchStrategy::Text,
                    kind: MetadataKind::NoMetadata,
                    title: None,
                    description: None,
                    is_client_component: is_client,
                })
            });

        detection.map(Detection::Metadata).into_iter().collect()
    }
}

/// Priority 1: a `metadata` export or `generateMetadata` function.
fn detect_export(ctx: &FileContext<'_>, is_client: bool) -> Option<MetadataDetection> {
    let m = metadata_export_regex().find(ctx.source)?;
    let start_line = line_of_offset(ctx.source, m.start());

    // Span through the balanced object literal when one follows
    let end_line = ctx.source[m.end()..]
        .find('{')
        .and_then(|rel| {
            let open = m.end() + rel;
            match_balanced_braces(ctx.source, open)
                .map(|object| line_of_offset(ctx.source, open + object.len()))
        })
        .unwrap_or(start_line);

    Some(MetadataDetection {
        file_path: ctx.path.to_owned(),
        span: SourceSpan::new(start_line, end_line),
        strategy: MatchStrategy::Text,
        kind: MetadataKind::NextMetadata,
        title: capture_first(title_property_regex(), ctx.source),
        description: capture_first(description_property_regex(), ctx.source),
        is_client_component: is_client,
    })
}

/// Priority 2: the next-seo component family.
fn detect_next_seo(ctx: &FileContext<'_>, is_client: bool) -> Option<MetadataDetection> {
    let uses_next_seo = ctx.imports_module("next-seo") || ctx.source.contains("<NextSeo");
    if !uses_next_seo {
        return None;
    }

    let captures = next_seo_regex().captures(ctx.source);
    let (span, title) = match &captures {
        Some(c) => {
            let whole = c.get(0)?;
            (
                SourceSpan::line(line_of_offset(ctx.source, whole.start())),
                c.get(1).map(|m| m.as_str().to_owned()),
            )
        }
        None => (SourceSpan::unknown(), None),
    };

    Some(MetadataDetection {
        file_path: ctx.path.to_owned(),
        span,
        strategy: MatchStrategy::Text,
        kind: MetadataKind::NextSeo,
        title,
        description: None,
        is_client_component: is_client,
    })
}

/// Priority 3: a markup head tag.
fn detect_head_tag(ctx: &FileContext<'_>, is_client: bool) -> Option<MetadataDetection> {
    let m = head_tag_regex().find(ctx.source)?;

    Some(MetadataDetection {
        file_path: ctx.path.to_owned(),
        span: SourceSpan::line(line_of_offset(ctx.source, m.start())),
        strategy: MatchStrategy::Text,
        kind: MetadataKind::HeadTag,
        title: capture_first(title_tag_regex(), ctx.source),
        description: capture_first(meta_description_regex(), ctx.source),
        is_client_component: is_client,
    })
}

/// Returns the first capture group of the first match.
fn capture_first(re: &Regex, source: &str) -> Option<String> {
    re.captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Returns `true` for files the app router treats as pages, plus
/// pages-router files under a `pages/` directory.
#[must_use]
pub fn is_page_file(path: &Utf8Path) -> bool {
    if path.file_stem() == Some("page") {
        return true;
    }
    // pages-router: anything under pages/ except framework files
    let under_pages = path.components().any(|c| c.as_str() == "pages");
    under_pages
        && path
            .file_stem()
            .is_some_and(|stem| !stem.starts_with('_') && stem != "api")
}

/// Returns `true` for app-router layout files.
#[must_use]
pub fn is_layout_file(path: &Utf8Path) -> bool {
    path.file_stem() == Some("layout")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(source: &str, path: &str) -> Vec<Detection> {
        let ctx = FileContext {
            path: Utf8Path::new(path),
            source,
            tree: None,
            imports: &[],
        };
        MetadataDetector.detect(&ctx)
    }

    fn single(source: &str, path: &str) -> MetadataDetection {
        let detections = detect(source, path);
        assert_eq!(detections.len(), 1, "expected one detection");
        match detections.into_iter().next() {
            Some(Detection::Metadata(m)) => m,
            other => panic!("expected metadata detection, got {other:?}"),
        }
    }

    #[test]
    fn test_static_metadata_export() {
        let source = r#"
export const metadata = {
  title: "About us",
  description: "Who we are",
};

export default function Page() { return null; }
"#;
        let m = single(source, "app/about/page.tsx");
        assert_eq!(m.kind, MetadataKind::NextMetadata);
        assert_eq!(m.title.as_deref(), Some("About us"));
        assert_eq!(m.description.as_deref(), Some("Who we are"));
        assert_eq!(m.span.start_line, 2);
        assert_eq!(m.span.end_line, 5);
        assert!(!m.is_client_component);
    }

    #[test]
    fn test_generate_metadata_function() {
        let source = r"
export async function generateMetadata({ params }) {
  return { title: params.slug };
}
";
        let m = single(source, "app/blog/page.tsx");
        assert_eq!(m.kind, MetadataKind::NextMetadata);
    }

    #[test]
    fn test_next_seo_component() {
        let source = r#"
const Page = () => <NextSeo title="Pricing" description="Plans" />;
export default Page;
"#;
        let m = single(source, "pages/pricing.tsx");
        assert_eq!(m.kind, MetadataKind::NextSeo);
        assert_eq!(m.title.as_deref(), Some("Pricing"));
    }

    #[test]
    fn test_head_tag() {
        let source = r#"
export default function About() {
  return (
    <div>
      <Head>
        <title>About</title>
        <meta name="description" content="Team page" />
      </Head>
    </div>
  );
}
"#;
        let m = single(source, "pages/about.tsx");
        assert_eq!(m.kind, MetadataKind::HeadTag);
        assert_eq!(m.title.as_deref(), Some("About"));
        assert_eq!(m.description.as_deref(), Some("Team page"));
    }

    #[test]
    fn test_page_without_metadata() {
        let source = "export default function Page() { return <div>hi</div>; }\n";
        let m = single(source, "app/contact/page.tsx");
        assert_eq!(m.kind, MetadataKind::NoMetadata);
        assert!(!m.span.is_located());
    }

    #[test]
    fn test_layout_without_metadata_is_silent() {
        let source = "export default function Layout({ children }) { return children; }\n";
        assert!(detect(source, "app/layout.tsx").is_empty());
    }

    #[test]
    fn test_non_page_file_is_skipped() {
        let source = "export const metadata = { title: 'X' };\n";
        assert!(detect(source, "src/components/Card.tsx").is_empty());
    }

    #[test]
    fn test_managed_api_returns_early() {
        let source = "import { buildMetadata } from '@sitebridge/seo';\nexport const metadata = buildMetadata({ pageId: 'p' });\n";
        assert!(detect(source, "app/page.tsx").is_empty());
    }

    #[test]
    fn test_client_component_flag() {
        let source = "'use client';\nexport default function Page() { return null; }\n";
        let m = single(source, "app/page.tsx");
        assert_eq!(m.kind, MetadataKind::NoMetadata);
        assert!(m.is_client_component);
    }

    #[test]
    fn test_pages_router_framework_files_skipped() {
        let source = "export default function App() { return null; }\n";
        assert!(detect(source, "pages/_app.tsx").is_empty());
        assert!(detect(source, "pages/_document.tsx").is_empty());
    }

    #[test]
    fn test_is_page_file() {
        assert!(is_page_file(Utf8Path::new("app/x/page.tsx")));
        assert!(is_page_file(Utf8Path::new("pages/about.tsx")));
        assert!(!is_page_file(Utf8Path::new("pages/_app.tsx")));
        assert!(!is_page_file(Utf8Path::new("app/x/layout.tsx")));
        assert!(!is_page_file(Utf8Path::new("src/Button.tsx")));
    }
}
