//! Schema migration.
//!
//! Inserts a managed `<BridgeSchema schemaId="..." />` after the render
//! anchor and registers the schema remotely. Requires server rendering:
//! client components are skipped with an explanatory no-op result rather
//! than an unsafe rewrite. The original inline JSON-LD block is left in
//! place (additive only) with a removal note.

use camino::Utf8Path;
use sb_core::{MigrationResult, SchemaDetection};
use sb_registry::{EntityKind, EntityRegistry};
use sb_rewrite::is_client_component;
use tracing::info;

use super::{
    ChangeLog, MigrateOptions, absolute_path, insert_component, read_file, register_soft, slugify,
    write_file,
};

/// Marker proving a file was already migrated.
const MARKER: &str = "<BridgeSchema";

/// Migrates one detected JSON-LD block.
pub async fn migrate(
    detection: &SchemaDetection,
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

    if content.contains(MARKER) {
        log.push("Schema already migrated");
        return finish(detection, log);
    }

    // Server rendering requirement
    if is_client_component(&content) {
        log.push("Skipped: client component (schema requires server rendering)");
        return finish(detection, log);
    }

    let payload = serde_json::json!({
        "schemaType": detection.schema_type,
        "category": detection.category.label(),
        "path": detection.file_path,
        "json": detection.raw_json,
    });
    let schema_id = register_soft(registry, EntityKind::Schema, payload, &mut log)
        .await
        .unwrap_or_else(|| fallback_id(detection));

    let element = format!(r#"<BridgeSchema schemaId="{schema_id}" />"#);
    let Some(updated) = insert_component(&content, &element, "BridgeSchema", &mut log) else {
        return finish(detection, log);
    };
    log.push("Remove the inline JSON-LD script manually once verified");

    if let Err(e) = write_file(&path, &updated, options.dry_run) {
        return MigrationResult::failure(&detection.file_path, e);
    }

    info!(path = %detection.file_path, schema_id = %schema_id, "Migrated schema");
    finish(detection, log)
}

/// Deterministic fallback id when the registry assigned none.
fn fallback_id(detection: &SchemaDetection) -> String {
    if detection.schema_type.is_empty() {
        "schema".to_owned()
    } else {
        slugify(&detection.schema_type)
    }
}

/// Builds the final result from the accumulated log.
fn finish(detection: &SchemaDetection, log: ChangeLog) -> MigrationResult {
    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result
}
