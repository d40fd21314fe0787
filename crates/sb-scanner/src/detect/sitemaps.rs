//! Sitemap artifact detection.
//!
//! Runs over a narrower file set than the source detectors: the aggregator
//! feeds it candidate files from a second walk (XML plus script files whose
//! name mentions `sitemap`). Everything here is text matching; sitemap
//! artifacts are rarely parseable application source.

use std::sync::OnceLock;

use regex::Regex;
use sb_core::{Detection, MatchStrategy, SitemapDetection, SitemapGenerator, SourceSpan};

use super::{Detector, FileContext, line_of_offset};

/// Matches one `<url>` entry of a static sitemap.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn url_entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<url[\s>]").unwrap()
    })
}

/// Detects how the project generates its sitemap.
pub struct SitemapDetector;

impl Detector for SitemapDetector {
    fn name(&self) -> &'static str {
        "sitemaps"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        classify(ctx).map(Detection::Sitemap).into_iter().collect()
    }
}

/// Ordered classification of a candidate file.
fn classify(ctx: &FileContext<'_>) -> Option<SitemapDetection> {
    let file_name = ctx.path.file_name().unwrap_or_default();
    let extension = ctx.path.extension().unwrap_or_default();

    // next-sitemap.config.js and friends
    if file_name.starts_with("next-sitemap.config") {
        return Some(detection(ctx, SitemapGenerator::NextSitemap, None));
    }

    // Checked-in static XML
    if extension == "xml" && ctx.source.contains("<urlset") {
        let url_count = url_entry_regex()
            .find_iter(ctx.source)
            .filter(|m| !ctx.source[m.start()..].starts_with("<urlset"))
            .count();
        return Some(detection(
            ctx,
            SitemapGenerator::StaticXml,
            Some(url_count),
        ));
    }

    // app-router sitemap.ts / sitemap.js route
    if ctx.path.file_stem() == Some("sitemap") && matches!(extension, "ts" | "js" | "mjs") {
        return Some(detection(ctx, SitemapGenerator::AppRouter, None));
    }

    // Hand-rolled generator scripts
    if ctx.source.contains("generateSitemap") || ctx.source.contains("sitemap.xml") {
        return Some(detection(ctx, SitemapGenerator::Custom, None));
    }

    None
}

/// Builds a detection; script generators get the line of the first
/// sitemap-ish mention, whole-file artifacts stay unlocated.
fn detection(
    ctx: &FileContext<'_>,
    generator: SitemapGenerator,
    url_count: Option<usize>,
) -> SitemapDetection {
    let span = match generator {
        SitemapGenerator::Custom => ctx
            .source
            .find("generateSitemap")
            .or_else(|| ctx.source.find("sitemap.xml"))
            .map_or(SourceSpan::unknown(), |at| {
                SourceSpan::line(line_of_offset(ctx.source, at))
            }),
        _ => SourceSpan::unknown(),
    };

    SitemapDetection {
        file_path: ctx.path.to_owned(),
        span,
        strategy: MatchStrategy::Text,
        generator,
        url_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;

    fn detect(source: &str, path: &str) -> Vec<SitemapDetection> {
        let ctx = FileContext {
            path: Utf8Path::new(path),
            source,
            tree: None,
            imports: &[],
        };
        SitemapDetector
            .detect(&ctx)
            .into_iter()
            .map(|d| match d {
                Detection::Sitemap(s) => s,
                other => panic!("expected sitemap, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_next_sitemap_config() {
        let source = "module.exports = { siteUrl: 'https://example.com' };\n";
        let found = detect(source, "next-sitemap.config.js");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].generator, SitemapGenerator::NextSitemap);
        assert!(found[0].url_count.is_none());
    }

    #[test]
    fn test_static_xml() {
        let source = r#"<?xml version="1.0"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url><loc>https://example.com/about</loc></url>
</urlset>
"#;
        let found = detect(source, "public/sitemap.xml");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].generator, SitemapGenerator::StaticXml);
        assert_eq!(found[0].url_count, Some(2));
    }

    #[test]
    fn test_app_router_sitemap() {
        let source = "import { MetadataRoute } from 'next';\nexport default function sitemap(): MetadataRoute.Sitemap { return []; }\n";
        let found = detect(source, "app/sitemap.ts");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].generator, SitemapGenerator::AppRouter);
    }

    #[test]
    fn test_custom_generator() {
        let source = "async function generateSitemap() {\n  // write public/sitemap.xml\n}\n";
        let found = detect(source, "scripts/build-sitemap.js");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].generator, SitemapGenerator::Custom);
        assert_eq!(found[0].span.start_line, 1);
    }

    #[test]
    fn test_unrelated_file() {
        assert!(detect("const x = 1;\n", "scripts/other-sitemap-helper.ts").is_empty());
    }
}
