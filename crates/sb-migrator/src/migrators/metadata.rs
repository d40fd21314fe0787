//! Metadata migration.
//!
//! Static `metadata` exports are rewritten to `buildMetadata(...)` by
//! replacing the balanced object literal; pages with no metadata get a
//! fresh export inserted. Dynamic `generateMetadata` functions, next-seo
//! usage, and head tags are registered remotely and annotated with
//! guidance notes instead of being rewritten; only forms get a
//! destructive rewrite.

use std::sync::OnceLock;

use camino::Utf8Path;
use regex::Regex;
use sb_core::{MetadataDetection, MetadataKind, MigrationResult};
use sb_registry::{EntityKind, EntityRegistry};
use sb_rewrite::{add_import_safely, match_balanced_braces};
use tracing::info;

use super::{
    ChangeLog, MANAGED_SEO_MODULE, MigrateOptions, absolute_path, page_id_for, read_file,
    register_soft, write_file,
};

/// Marker proving a file was already migrated.
const MARKER: &str = "buildMetadata";

/// Matches the static metadata export up to its `=`.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn static_export_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export\s+const\s+metadata\s*(?::\s*[A-Za-z][\w.]*\s*)?=\s*").unwrap()
    })
}

/// Migrates one metadata detection.
pub async fn migrate(
    detection: &MetadataDetection,
    root: &Utf8Path,
    options: &MigrateOptions,
    registry: Option<&dyn EntityRegistry>,
) -> MigrationResult {
    let path = absolute_path(root, &detection.file_path);
    let mut log = ChangeLog::new(options.dry_run);

    let content = match read_file(&path) {
        Ok(content) => content,
        Err(e) => return MigrationResult::failure(&detection.file_path, e),
    };

    if content.contains(MARKER) || content.contains(MANAGED_SEO_MODULE) {
        log.push("Metadata already migrated");
        return finish(detection, log);
    }

    // The host framework rejects metadata exports in client components
    if detection.is_client_component {
        log.push("Skipped: client component (metadata requires a server component)");
        return finish(detection, log);
    }

    let page_id = page_id_for(&detection.file_path);
    let payload = serde_json::json!({
        "pageId": page_id,
        "path": detection.file_path,
        "kind": detection.kind.label(),
        "title": detection.title,
        "description": detection.description,
    });
    register_soft(registry, EntityKind::Metadata, payload, &mut log).await;

    let updated = match detection.kind {
        MetadataKind::NextMetadata => rewrite_static_export(&content, &page_id, &mut log),
        MetadataKind::NoMetadata => insert_fresh_export(&content, &page_id, &mut log),
        MetadataKind::NextSeo => {
            log.push(
                "Replace the <NextSeo> usage with a buildMetadata export manually",
            );
            None
        }
        _ => {
            log.push("Replace the head-tag metadata with a buildMetadata export manually");
            None
        }
    };

    let Some(updated) = updated else {
        return finish(detection, log);
    };

    if let Err(e) = write_file(&path, &updated, options.dry_run) {
        return MigrationResult::failure(&detection.file_path, e);
    }

    info!(path = %detection.file_path, page_id = %page_id, "Migrated metadata");
    finish(detection, log)
}

/// Replaces a static export's object literal with a `buildMetadata` call.
///
/// The object is located by balanced-brace extraction; unbalanced input
/// skips the replacement and leaves the file unchanged. A dynamic
/// `generateMetadata` file (no static export) gets a guidance note.
fn rewrite_static_export(content: &str, page_id: &str, log: &mut ChangeLog) -> Option<String> {
    let Some(m) = static_export_regex().find(content) else {
        log.push("Dynamic generateMetadata requires manual migration");
        return None;
    };

    // The value must be an object literal starting right after the `=`
    if !content[m.end()..].starts_with('{') {
        log.push("Metadata export is not an object literal; left unchanged");
        return None;
    }
    let open = m.end();
    let Some(object) = match_balanced_braces(content, open) else {
        log.push("Metadata object is unbalanced; left unchanged");
        return None;
    };

    let call = format!("buildMetadata({{ pageId: '{page_id}' }})");
    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..open]);
    updated.push_str(&call);
    updated.push_str(&content[open + object.len()..]);
    log.push(format!(
        "Replaced metadata object with buildMetadata({{ pageId: '{page_id}' }})"
    ));

    Some(add_seo_import(updated, log))
}

/// Inserts a fresh metadata export for a page that had none.
fn insert_fresh_export(content: &str, page_id: &str, log: &mut ChangeLog) -> Option<String> {
    let export = format!("\nexport const metadata = buildMetadata({{ pageId: '{page_id}' }});\n");
    let insert_at = end_of_imports(content);

    let mut updated = String::with_capacity(content.len() + export.len());
    updated.push_str(&content[..insert_at]);
    updated.push_str(&export);
    updated.push_str(&content[insert_at..]);
    log.push(format!(
        "Added metadata export with buildMetadata({{ pageId: '{page_id}' }})"
    ));

    Some(add_seo_import(updated, log))
}

/// Adds the managed helper import, logging when it happens.
fn add_seo_import(content: String, log: &mut ChangeLog) -> String {
    let statement = format!("import {{ buildMetadata }} from '{MANAGED_SEO_MODULE}';");
    match add_import_safely(&content, &statement, MANAGED_SEO_MODULE) {
        Some(updated) => {
            log.push("Added import for buildMetadata");
            updated
        }
        None => content,
    }
}

/// Returns the byte offset just past the last top-level import line.
fn end_of_imports(content: &str) -> usize {
    let mut offset = 0;
    let mut end = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
            end = offset + line.len();
        }
        offset += line.len();
    }
    end
}

/// Builds the final result from the accumulated log.
fn finish(detection: &MetadataDetection, log: ChangeLog) -> MigrationResult {
    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result
}
