//! The sequential migration engine.
//!
//! An explicit work queue over the detections of one scan: items are
//! processed one at a time, category by category, awaiting each I/O-bound
//! step before starting the next. Each item is a pure function over one
//! detection with isolated failure, so a future bounded worker pool could
//! replace the loop without changing the per-item contract.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use sb_core::{DetectionCategory, MigrationSummary, ScanResult};
use sb_registry::EntityRegistry;
use tracing::info;

use crate::migrators::{self, MigrateOptions};

/// Category processing order for a migration run.
///
/// Images are detected but never migrated; the upload pipeline is an
/// external collaborator.
const MIGRATION_ORDER: [DetectionCategory; 7] = [
    DetectionCategory::Forms,
    DetectionCategory::Widgets,
    DetectionCategory::Metadata,
    DetectionCategory::Schemas,
    DetectionCategory::Faqs,
    DetectionCategory::Sitemaps,
    DetectionCategory::Analytics,
];

/// Drives migrators over a scan result.
///
/// # Examples
///
/// ```ignore
/// use sb_migrator::{MigrateOptions, MigrationEngine};
/// use camino::Utf8Path;
///
/// let engine = MigrationEngine::new(Utf8Path::new("./app"), MigrateOptions::default());
/// let summary = engine.run(&report.result).await;
/// println!("{} ok, {} failed", summary.succeeded(), summary.failed());
/// ```
pub struct MigrationEngine {
    /// Scan root that detections' relative paths resolve against.
    root: Utf8PathBuf,
    /// Shared migrator options.
    options: MigrateOptions,
    /// Remote registry, when credentials were provided.
    registry: Option<Arc<dyn EntityRegistry>>,
}

impl MigrationEngine {
    /// Creates an engine with no remote registry.
    #[must_use]
    pub fn new(root: &Utf8Path, options: MigrateOptions) -> Self {
        Self {
            root: root.to_owned(),
            options,
            registry: None,
        }
    }

    /// Attaches a remote registry.
    ///
    /// Ignored in dry-run mode: a dry run performs zero network writes.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn EntityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Migrates every detection of the scan, in category order.
    pub async fn run(&self, scan: &ScanResult) -> MigrationSummary {
        self.run_categories(scan, &MIGRATION_ORDER).await
    }

    /// Migrates only the requested categories, preserving the canonical
    /// order.
    pub async fn run_categories(
        &self,
        scan: &ScanResult,
        categories: &[DetectionCategory],
    ) -> MigrationSummary {
        let mut summary = MigrationSummary::new();
        let registry = self.effective_registry();

        info!(
            dry_run = self.options.dry_run,
            remote = registry.is_some(),
            "Starting migration run"
        );

        for category in MIGRATION_ORDER {
            if !categories.contains(&category) {
                continue;
            }
            self.run_category(scan, category, registry, &mut summary)
                .await;
        }

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Migration run completed"
        );

        summary
    }

    /// Processes one category's queue sequentially.
    async fn run_category(
        &self,
        scan: &ScanResult,
        category: DetectionCategory,
        registry: Option<&dyn EntityRegistry>,
        summary: &mut MigrationSummary,
    ) {
        let root = &self.root;
        let options = &self.options;

        match category {
            DetectionCategory::Forms => {
                for detection in &scan.forms {
                    summary.push(migrators::forms::migrate(detection, root, options, registry).await);
                }
            }
            DetectionCategory::Widgets => {
                for detection in &scan.widgets {
                    summary
                        .push(migrators::widgets::migrate(detection, root, options, registry).await);
                }
            }
            DetectionCategory::Metadata => {
                for detection in &scan.metadata {
                    summary.push(
                        migrators::metadata::migrate(detection, root, options, registry).await,
                    );
                }
            }
            DetectionCategory::Schemas => {
                for detection in &scan.schemas {
                    summary
                        .push(migrators::schemas::migrate(detection, root, options, registry).await);
                }
            }
            DetectionCategory::Faqs => {
                for detection in &scan.faqs {
                    summary.push(migrators::faqs::migrate(detection, root, options, registry).await);
                }
            }
            DetectionCategory::Sitemaps => {
                for detection in &scan.sitemaps {
                    summary.push(
                        migrators::sitemaps::migrate(detection, root, options, registry).await,
                    );
                }
            }
            DetectionCategory::Analytics => {
                for detection in &scan.analytics {
                    summary.push(
                        migrators::analytics::migrate(detection, root, options, registry).await,
                    );
                }
            }
            // Images are never migrated; the upload pipeline is external
            _ => {}
        }
    }

    /// The registry to use for this run: none at all when dry-running.
    fn effective_registry(&self) -> Option<&dyn EntityRegistry> {
        if self.options.dry_run {
            None
        } else {
            self.registry.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{
        ChatProvider, FormComplexity, FormDetection, FormField, FormLibrary, MatchStrategy,
        SourceSpan, WidgetDetection,
    };
    use smallvec::smallvec;
    use std::fs;

    fn form_detection(file_path: &str) -> FormDetection {
        FormDetection {
            file_path: file_path.into(),
            span: SourceSpan::new(2, 4),
            strategy: MatchStrategy::Ast,
            component_name: "ContactForm".to_owned(),
            fields: smallvec![FormField::new("email", "email", true)],
            form_library: FormLibrary::Native,
            complexity: FormComplexity::Simple,
        }
    }

    fn widget_detection(file_path: &str) -> WidgetDetection {
        WidgetDetection {
            file_path: file_path.into(),
            span: SourceSpan::unknown(),
            strategy: MatchStrategy::Text,
            provider: ChatProvider::Crisp,
            widget_id: None,
        }
    }

    fn setup_project() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8").to_owned();
        fs::write(
            root.join("contact.tsx").as_std_path(),
            "export default function ContactForm() {\n  return (\n    <main>\n      <form onSubmit={go}><input name=\"email\" /></form>\n    </main>\n  );\n}\n",
        )
        .expect("write");
        fs::write(
            root.join("layout.tsx").as_std_path(),
            "export default function Layout({ children }) {\n  return (\n    <html>\n      <body>{children}</body>\n    </html>\n  );\n}\n",
        )
        .expect("write");
        (dir, root)
    }

    fn scan_with(forms: Vec<FormDetection>, widgets: Vec<WidgetDetection>) -> ScanResult {
        let mut scan = ScanResult::new();
        scan.forms = forms;
        scan.widgets = widgets;
        scan
    }

    #[tokio::test]
    async fn test_run_processes_in_category_order() {
        let (_dir, root) = setup_project();
        let scan = scan_with(
            vec![form_detection("contact.tsx")],
            vec![widget_detection("layout.tsx")],
        );

        let engine = MigrationEngine::new(&root, MigrateOptions::default());
        let summary = engine.run(&scan).await;

        assert_eq!(summary.results.len(), 2);
        // Forms before widgets, regardless of scan field ordering
        assert_eq!(summary.results[0].file_path.as_str(), "contact.tsx");
        assert_eq!(summary.results[1].file_path.as_str(), "layout.tsx");
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 0);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let (_dir, root) = setup_project();
        let scan = scan_with(
            vec![form_detection("contact.tsx")],
            vec![widget_detection("layout.tsx")],
        );

        let engine = MigrationEngine::new(&root, MigrateOptions::default());
        let summary = engine
            .run_categories(&scan, &[DetectionCategory::Widgets])
            .await;

        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].file_path.as_str(), "layout.tsx");
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let (_dir, root) = setup_project();
        let scan = scan_with(
            vec![form_detection("missing.tsx"), form_detection("contact.tsx")],
            Vec::new(),
        );

        let engine = MigrationEngine::new(&root, MigrateOptions::default());
        let summary = engine.run(&scan).await;

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.succeeded(), 1);
        // The second item still ran and rewrote its file
        let updated = fs::read_to_string(root.join("contact.tsx").as_std_path()).expect("read");
        assert!(updated.contains("<BridgeForm"));
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let (_dir, root) = setup_project();
        let before_contact =
            fs::read_to_string(root.join("contact.tsx").as_std_path()).expect("read");
        let before_layout =
            fs::read_to_string(root.join("layout.tsx").as_std_path()).expect("read");

        let scan = scan_with(
            vec![form_detection("contact.tsx")],
            vec![widget_detection("layout.tsx")],
        );

        let options = MigrateOptions {
            dry_run: true,
            ..MigrateOptions::default()
        };
        let engine = MigrationEngine::new(&root, options);
        let summary = engine.run(&scan).await;

        assert_eq!(summary.succeeded(), 2);
        assert!(summary.results.iter().all(|r| r.is_dry_run()));

        let after_contact =
            fs::read_to_string(root.join("contact.tsx").as_std_path()).expect("read");
        let after_layout =
            fs::read_to_string(root.join("layout.tsx").as_std_path()).expect("read");
        assert_eq!(before_contact, after_contact);
        assert_eq!(before_layout, after_layout);
        assert!(!root.join("contact.tsx.backup").exists());
    }

    #[tokio::test]
    async fn test_dry_run_disables_registry() {
        struct PanickyRegistry;

        #[async_trait::async_trait]
        impl EntityRegistry for PanickyRegistry {
            async fn register(
                &self,
                _kind: sb_registry::EntityKind,
                _payload: serde_json::Value,
            ) -> Result<sb_registry::RegisterOutcome, sb_registry::RegistryError> {
                // A dry run must never reach the network
                Err(sb_registry::RegistryError::config("should not be called"))
            }
        }

        let (_dir, root) = setup_project();
        let scan = scan_with(vec![form_detection("contact.tsx")], Vec::new());

        let options = MigrateOptions {
            dry_run: true,
            ..MigrateOptions::default()
        };
        let engine =
            MigrationEngine::new(&root, options).with_registry(Arc::new(PanickyRegistry));
        let summary = engine.run(&scan).await;

        assert_eq!(summary.succeeded(), 1);
        assert!(
            !summary.results[0].mentions("should not be called"),
            "registry must not be contacted during a dry run"
        );
    }
}
