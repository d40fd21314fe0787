//! Chat widget migration.
//!
//! Inserts a managed `<BridgeChat />` after the render anchor and registers
//! the widget configuration remotely. The provider's embed snippet is left
//! in place (additive only) with a removal note: deleting inline scripts
//! wholesale is exactly the kind of rewrite this system reserves for forms.

use camino::Utf8Path;
use sb_core::{MigrationResult, WidgetDetection};
use sb_registry::{EntityKind, EntityRegistry};
use tracing::info;

use super::{
    ChangeLog, MigrateOptions, absolute_path, insert_component, read_file, register_soft,
    write_file,
};

/// Marker proving a file was already migrated.
const MARKER: &str = "<BridgeChat";

/// Migrates one detected chat widget.
pub async fn migrate(
    detection: &WidgetDetection,
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
        log.push("Chat widget already migrated");
        return finish(detection, log);
    }

    let payload = serde_json::json!({
        "provider": detection.provider.label(),
        "widgetId": detection.widget_id,
        "path": detection.file_path,
    });
    register_soft(registry, EntityKind::Widget, payload, &mut log).await;

    let Some(updated) = insert_component(&content, "<BridgeChat />", "BridgeChat", &mut log)
    else {
        return finish(detection, log);
    };
    log.push(format!(
        "Remove the {} embed snippet manually once verified",
        detection.provider.label()
    ));

    if let Err(e) = write_file(&path, &updated, options.dry_run) {
        return MigrationResult::failure(&detection.file_path, e);
    }

    info!(path = %detection.file_path, provider = detection.provider.label(), "Migrated widget");
    finish(detection, log)
}

/// Builds the final result from the accumulated log.
fn finish(detection: &WidgetDetection, log: ChangeLog) -> MigrationResult {
    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{ChatProvider, MatchStrategy, SourceSpan};
    use std::fs;

    fn detection(file_path: &str) -> WidgetDetection {
        WidgetDetection {
            file_path: file_path.into(),
            span: SourceSpan::line(4),
            strategy: MatchStrategy::Text,
            provider: ChatProvider::Intercom,
            widget_id: Some("abc123".to_owned()),
        }
    }

    fn setup(content: &str) -> (tempfile::TempDir, camino::Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8").to_owned();
        fs::write(root.join("layout.tsx").as_std_path(), content).expect("write");
        (dir, root)
    }

    const SOURCE: &str = r"export default function Layout({ children }) {
  return (
    <html>
      <body>{children}</body>
    </html>
  );
}
";

    #[tokio::test]
    async fn test_widget_inserted() {
        let (_dir, root) = setup(SOURCE);
        let result = migrate(
            &detection("layout.tsx"),
            &root,
            &MigrateOptions::default(),
            None,
        )
        .await;
        assert!(result.success);
        assert!(result.mentions("intercom"));

        let updated = fs::read_to_string(root.join("layout.tsx").as_std_path()).expect("read");
        assert!(updated.contains("<BridgeChat />"));
        assert!(updated.contains("import { BridgeChat } from '@sitebridge/react';"));
    }

    #[tokio::test]
    async fn test_idempotent_second_run() {
        let (_dir, root) = setup(SOURCE);
        let d = detection("layout.tsx");
        let options = MigrateOptions::default();

        migrate(&d, &root, &options, None).await;
        let after_first = fs::read_to_string(root.join("layout.tsx").as_std_path()).expect("read");

        let second = migrate(&d, &root, &options, None).await;
        let after_second =
            fs::read_to_string(root.join("layout.tsx").as_std_path()).expect("read");

        assert!(second.mentions("already migrated"));
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_dry_run_no_writes() {
        let (_dir, root) = setup(SOURCE);
        let options = MigrateOptions {
            dry_run: true,
            ..MigrateOptions::default()
        };

        let result = migrate(&detection("layout.tsx"), &root, &options, None).await;
        assert!(result.success);
        assert!(result.is_dry_run());

        let on_disk = fs::read_to_string(root.join("layout.tsx").as_std_path()).expect("read");
        assert_eq!(on_disk, SOURCE);
    }
}
