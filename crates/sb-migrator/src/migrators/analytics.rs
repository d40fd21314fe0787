//! Analytics migration.
//!
//! Inserts a managed `<BridgeAnalytics />` after the render anchor and
//! registers the tracking configuration remotely. The legacy snippet stays
//! in place with a removal note.

use camino::Utf8Path;
use sb_core::{AnalyticsDetection, MigrationResult};
use sb_registry::{EntityKind, EntityRegistry};
use tracing::info;

use super::{
    ChangeLog, MigrateOptions, absolute_path, insert_component, read_file, register_soft,
    write_file,
};

/// Marker proving a file was already migrated.
const MARKER: &str = "<BridgeAnalytics";

/// Migrates one detected analytics snippet.
pub async fn migrate(
    detection: &AnalyticsDetection,
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
        log.push("Analytics already migrated");
        return finish(detection, log);
    }

    let payload = serde_json::json!({
        "provider": detection.provider.label(),
        "trackingId": detection.tracking_id,
        "path": detection.file_path,
    });
    register_soft(registry, EntityKind::Analytics, payload, &mut log).await;

    let Some(updated) =
        insert_component(&content, "<BridgeAnalytics />", "BridgeAnalytics", &mut log)
    else {
        return finish(detection, log);
    };
    log.push(format!(
        "Remove the {} snippet manually once verified",
        detection.provider.label()
    ));

    if let Err(e) = write_file(&path, &updated, options.dry_run) {
        return MigrationResult::failure(&detection.file_path, e);
    }

    info!(path = %detection.file_path, provider = detection.provider.label(), "Migrated analytics");
    finish(detection, log)
}

/// Builds the final result from the accumulated log.
fn finish(detection: &AnalyticsDetection, log: ChangeLog) -> MigrationResult {
    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result
}
