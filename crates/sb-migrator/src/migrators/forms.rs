//! Form migration: the one destructive rewrite.
//!
//! Replaces the whole `<form>...</form>` block with a managed
//! `<BridgeForm formId="..." />`, after registering the form definition
//! remotely and writing a `.backup` sibling. Complexity gates what this
//! migrator is permitted to touch: simple forms migrate unconditionally,
//! moderate ones only in assisted mode, complex ones never.

use camino::Utf8Path;
use sb_core::{FormDetection, MigrationResult, SuggestedAction};
use sb_registry::{EntityKind, EntityRegistry};
use sb_rewrite::element_block;
use tracing::info;

use super::{
    ChangeLog, MigrateOptions, absolute_path, add_bridge_import, read_file, register_soft,
    slugify, write_file,
};
use crate::backup::write_backup;

/// Marker element proving a file was already migrated.
const MARKER: &str = "<BridgeForm";

/// Migrates one detected form.
pub async fn migrate(
    detection: &FormDetection,
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

    // Idempotency: re-running on a migrated file is a safe no-op
    if content.contains(MARKER) {
        log.push("Form already migrated");
        return finish(detection, log, None);
    }

    // Complexity gate
    match detection.suggested_action() {
        SuggestedAction::Manual => {
            log.push(format!(
                "Skipped complex form '{}' ({} fields): manual migration required",
                detection.component_name,
                detection.field_count()
            ));
            return finish(detection, log, None);
        }
        SuggestedAction::Assisted if !options.allow_assisted => {
            log.push(format!(
                "Skipped moderate form '{}': enable assisted mode to migrate",
                detection.component_name
            ));
            return finish(detection, log, None);
        }
        _ => {}
    }

    // RemoteRegister (soft), then fall back to a deterministic slug id
    let payload = serde_json::json!({
        "name": detection.component_name,
        "library": detection.form_library.label(),
        "fields": detection.fields,
    });
    let form_id = register_soft(registry, EntityKind::Form, payload, &mut log)
        .await
        .unwrap_or_else(|| slugify(&detection.component_name));

    // Locate the form block; a miss leaves the file untouched
    let Some(range) = element_block(&content, "form") else {
        log.push("Form markup not found in current file contents; left unchanged");
        return finish(detection, log, None);
    };

    let replacement = format!(r#"<BridgeForm formId="{form_id}" />"#);

    // Backup before the only destructive rewrite in the system
    if options.backup && !options.dry_run {
        match write_backup(&path, &content) {
            Ok(backup_path) => log.push(format!("Wrote backup to {backup_path}")),
            Err(e) => {
                return MigrationResult::failure(
                    &detection.file_path,
                    format!("failed to write backup: {e}"),
                );
            }
        }
    } else if options.backup {
        log.push(format!("Would write backup to {path}.backup"));
    }

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..range.start]);
    updated.push_str(&replacement);
    updated.push_str(&content[range.end..]);
    log.push(format!(
        "Replaced <form> block with <BridgeForm formId=\"{form_id}\" />"
    ));

    updated = add_bridge_import(updated, "BridgeForm", &mut log);

    if let Err(e) = write_file(&path, &updated, options.dry_run) {
        return MigrationResult::failure(&detection.file_path, e);
    }

    info!(path = %detection.file_path, form_id = %form_id, "Migrated form");
    finish(detection, log, Some(form_id))
}

/// Builds the final result from the accumulated log.
fn finish(detection: &FormDetection, log: ChangeLog, form_id: Option<String>) -> MigrationResult {
    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result.form_id = form_id;
    result
}
