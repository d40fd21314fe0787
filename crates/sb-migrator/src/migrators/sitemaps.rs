//! Sitemap migration.
//!
//! Sitemaps move wholesale to the managed endpoint, so there is no partial
//! text rewrite to do: the migrator registers the sitemap remotely and
//! emits per-generator guidance notes. The artifact files themselves are
//! never touched.

use camino::Utf8Path;
use sb_core::{MigrationResult, SitemapDetection, SitemapGenerator};
use sb_registry::{EntityKind, EntityRegistry};
use tracing::info;

use super::{ChangeLog, MigrateOptions, register_soft};

/// Migrates one detected sitemap artifact.
pub async fn migrate(
    detection: &SitemapDetection,
    _root: &Utf8Path,
    options: &MigrateOptions,
    registry: Option<&dyn EntityRegistry>,
) -> MigrationResult {
    let mut log = ChangeLog::new(options.dry_run);

    let payload = serde_json::json!({
        "generator": detection.generator.label(),
        "path": detection.file_path,
        "urlCount": detection.url_count,
    });
    register_soft(registry, EntityKind::Sitemap, payload, &mut log).await;

    log.push("Sitemap is now served by the managed /sitemap.xml endpoint");
    log.push(guidance(detection.generator));

    info!(path = %detection.file_path, generator = detection.generator.label(), "Registered sitemap");

    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result
}

/// Per-generator cleanup guidance.
fn guidance(generator: SitemapGenerator) -> &'static str {
    match generator {
        SitemapGenerator::NextSitemap => {
            "Remove next-sitemap.config and its postbuild step manually"
        }
        SitemapGenerator::AppRouter => "Remove the app-router sitemap route manually",
        SitemapGenerator::StaticXml => "Delete the static sitemap.xml manually",
        _ => "Retire the custom sitemap generator script manually",
    }
}
