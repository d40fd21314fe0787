//! FAQ migration.
//!
//! Inserts a managed `<BridgeFaq faqId="..." />` after the render anchor
//! and registers the FAQ collection remotely. Like the schema migrator,
//! this requires server rendering and skips client components with an
//! explanatory no-op.

use camino::Utf8Path;
use sb_core::{FaqDetection, MigrationResult};
use sb_registry::{EntityKind, EntityRegistry};
use sb_rewrite::is_client_component;
use tracing::info;

use super::{
    ChangeLog, MigrateOptions, absolute_path, insert_component, page_id_for, read_file,
    register_soft, slugify, write_file,
};

/// Marker proving a file was already migrated.
const MARKER: &str = "<BridgeFaq";

/// Migrates one detected FAQ section.
pub async fn migrate(
    detection: &FaqDetection,
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
        log.push("FAQ already migrated");
        return finish(detection, log);
    }

    // Server rendering requirement
    if is_client_component(&content) {
        log.push("Skipped: client component (FAQ requires server rendering)");
        return finish(detection, log);
    }

    let payload = serde_json::json!({
        "kind": detection.kind.label(),
        "path": detection.file_path,
        "itemCount": detection.item_count,
        "hasSchema": detection.has_schema,
    });
    let faq_id = register_soft(registry, EntityKind::Faq, payload, &mut log)
        .await
        .unwrap_or_else(|| fallback_id(detection));

    let element = format!(r#"<BridgeFaq faqId="{faq_id}" />"#);
    let Some(updated) = insert_component(&content, &element, "BridgeFaq", &mut log) else {
        return finish(detection, log);
    };
    log.push(format!(
        "Remove the legacy {} markup manually once verified",
        detection.kind.label()
    ));

    if let Err(e) = write_file(&path, &updated, options.dry_run) {
        return MigrationResult::failure(&detection.file_path, e);
    }

    info!(path = %detection.file_path, faq_id = %faq_id, "Migrated FAQ");
    finish(detection, log)
}

/// Deterministic fallback id when the registry assigned none.
fn fallback_id(detection: &FaqDetection) -> String {
    match &detection.component_name {
        Some(name) => slugify(name),
        None => format!("{}-faq", page_id_for(&detection.file_path)),
    }
}

/// Builds the final result from the accumulated log.
fn finish(detection: &FaqDetection, log: ChangeLog) -> MigrationResult {
    let mut result = MigrationResult::success(&detection.file_path);
    result.changes = log.into_changes();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{FaqKind, MatchStrategy, SourceSpan};
    use std::fs;

    fn detection(file_path: &str) -> FaqDetection {
        FaqDetection {
            file_path: file_path.into(),
            span: SourceSpan::new(3, 8),
            strategy: MatchStrategy::Ast,
            kind: FaqKind::DetailsSummary,
            component_name: None,
            item_count: 3,
            has_schema: false,
        }
    }

    fn setup(rel: &str, content: &str) -> (tempfile::TempDir, camino::Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8").to_owned();
        let file = root.join(rel);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent.as_std_path()).expect("mkdir");
        }
        fs::write(file.as_std_path(), content).expect("write");
        (dir, root)
    }

    const SOURCE: &str = r"export default function Help() {
  return (
    <section>
      <details><summary>Q1?</summary>A1</details>
      <details><summary>Q2?</summary>A2</details>
    </section>
  );
}
";

    #[tokio::test]
    async fn test_faq_inserted_with_page_fallback_id() {
        let (_dir, root) = setup("app/help/page.tsx", SOURCE);
        let result = migrate(
            &detection("app/help/page.tsx"),
            &root,
            &MigrateOptions::default(),
            None,
        )
        .await;
        assert!(result.success);

        let updated =
            fs::read_to_string(root.join("app/help/page.tsx").as_std_path()).expect("read");
        assert!(updated.contains(r#"<BridgeFaq faqId="help-faq" />"#));
        assert!(updated.contains("import { BridgeFaq } from '@sitebridge/react';"));
    }

    #[tokio::test]
    async fn test_component_name_fallback_id() {
        let (_dir, root) = setup("src/HelpAccordion.tsx", SOURCE);
        let mut d = detection("src/HelpAccordion.tsx");
        d.component_name = Some("HelpAccordion".to_owned());

        let result = migrate(&d, &root, &MigrateOptions::default(), None).await;
        assert!(result.success);

        let updated =
            fs::read_to_string(root.join("src/HelpAccordion.tsx").as_std_path()).expect("read");
        assert!(updated.contains(r#"faqId="help-accordion""#));
    }

    #[tokio::test]
    async fn test_client_component_skipped() {
        let source = format!("'use client';\n{SOURCE}");
        let (_dir, root) = setup("app/help/page.tsx", &source);

        let result = migrate(
            &detection("app/help/page.tsx"),
            &root,
            &MigrateOptions::default(),
            None,
        )
        .await;
        assert!(result.success);
        assert!(result.mentions("client component"));

        let on_disk =
            fs::read_to_string(root.join("app/help/page.tsx").as_std_path()).expect("read");
        assert_eq!(on_disk, source);
    }

    #[tokio::test]
    async fn test_idempotent_second_run() {
        let (_dir, root) = setup("app/help/page.tsx", SOURCE);
        let d = detection("app/help/page.tsx");
        let options = MigrateOptions::default();

        migrate(&d, &root, &options, None).await;
        let after_first =
            fs::read_to_string(root.join("app/help/page.tsx").as_std_path()).expect("read");

        let second = migrate(&d, &root, &options, None).await;
        let after_second =
            fs::read_to_string(root.join("app/help/page.tsx").as_std_path()).expect("read");

        assert!(second.mentions("already migrated"));
        assert_eq!(after_first, after_second);
    }
}
