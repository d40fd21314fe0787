//! The per-concern migrators and their shared plumbing.
//!
//! Each submodule exposes one async `migrate` function
//! `(detection, root, options, registry) -> MigrationResult`. The shared
//! pieces here keep the migrators honest about the batch contract:
//! [`ChangeLog`] applies the dry-run prefix uniformly, [`register_soft`]
//! folds registry outcomes into change notes without failing the file, and
//! the file helpers turn disk errors into hard per-file failures.

use camino::{Utf8Path, Utf8PathBuf};
use sb_core::{DRY_RUN_PREFIX, MigrateConfig};
use sb_registry::{EntityKind, EntityRegistry, RegisterOutcome};
use sb_rewrite::{MergeOutcome, add_import_safely, insert_after_anchor, merge_into_import};
use tracing::warn;

pub mod analytics;
pub mod faqs;
pub mod forms;
pub mod metadata;
pub mod schemas;
pub mod sitemaps;
pub mod widgets;

/// Module path of the managed component SDK.
pub const MANAGED_COMPONENT_MODULE: &str = "@sitebridge/react";

/// Module path of the managed metadata helper.
pub const MANAGED_SEO_MODULE: &str = "@sitebridge/seo";

/// Options shared by every migrator.
///
/// # Examples
///
/// ```
/// use sb_migrator::MigrateOptions;
///
/// let options = MigrateOptions::default();
/// assert!(!options.dry_run);
/// assert!(options.backup);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Report changes without touching the filesystem or the network.
    pub dry_run: bool,
    /// Write a `.backup` sibling before the destructive form rewrite.
    pub backup: bool,
    /// Permit migration of moderate-complexity forms.
    pub allow_assisted: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
            allow_assisted: false,
        }
    }
}

impl From<MigrateConfig> for MigrateOptions {
    fn from(config: MigrateConfig) -> Self {
        Self {
            dry_run: config.dry_run,
            backup: config.backup,
            allow_assisted: config.allow_assisted,
        }
    }
}

/// Ordered change collector that applies the dry-run prefix uniformly.
#[derive(Debug)]
pub(crate) struct ChangeLog {
    changes: Vec<String>,
    dry_run: bool,
}

impl ChangeLog {
    /// Creates a change log for the given mode.
    pub(crate) const fn new(dry_run: bool) -> Self {
        Self {
            changes: Vec::new(),
            dry_run,
        }
    }

    /// Appends one change description.
    pub(crate) fn push(&mut self, change: impl Into<String>) {
        let change = change.into();
        if self.dry_run {
            self.changes.push(format!("{DRY_RUN_PREFIX}{change}"));
        } else {
            self.changes.push(change);
        }
    }

    /// Consumes the log into the ordered change list.
    pub(crate) fn into_changes(self) -> Vec<String> {
        self.changes
    }
}

/// Registers an entity remotely, folding the outcome into change notes.
///
/// Soft by design: a 400/409 answer becomes a "may already exist" note and
/// any other failure becomes a change-log note; neither blocks the local
/// rewrite. Returns the registry-assigned id when one was created.
pub(crate) async fn register_soft(
    registry: Option<&dyn EntityRegistry>,
    kind: EntityKind,
    payload: serde_json::Value,
    log: &mut ChangeLog,
) -> Option<String> {
    let registry = registry?;

    match registry.register(kind, payload).await {
        Ok(RegisterOutcome::Created { id }) if !id.is_empty() => {
            log.push(format!("Registered {} (id {id})", kind.path()));
            Some(id)
        }
        Ok(RegisterOutcome::Created { .. }) => {
            log.push(format!("Registered {}", kind.path()));
            None
        }
        Ok(RegisterOutcome::AlreadyExists) => {
            log.push(format!("{} may already exist in registry", kind.path()));
            None
        }
        Err(e) => {
            warn!(kind = ?kind, error = %e, "Remote registration failed");
            log.push(format!("Remote registration failed (continuing): {e}"));
            None
        }
    }
}

/// Adds (or merges) an import of a managed component, logging the change.
pub(crate) fn add_bridge_import(content: String, export: &str, log: &mut ChangeLog) -> String {
    match merge_into_import(&content, MANAGED_COMPONENT_MODULE, export) {
        MergeOutcome::Merged(updated) => {
            log.push(format!(
                "Added {export} to the existing {MANAGED_COMPONENT_MODULE} import"
            ));
            updated
        }
        MergeOutcome::AlreadyImported => content,
        MergeOutcome::NoImportClause => {
            let statement = format!("import {{ {export} }} from '{MANAGED_COMPONENT_MODULE}';");
            match add_import_safely(&content, &statement, MANAGED_COMPONENT_MODULE) {
                Some(updated) => {
                    log.push(format!("Added import for {export}"));
                    updated
                }
                None => content,
            }
        }
    }
}

/// Inserts a managed component after a structural anchor and imports it.
///
/// Returns `None` (file unchanged) when no anchor matches; the caller's
/// change log then records that a manual insertion is required.
pub(crate) fn insert_component(
    content: &str,
    element: &str,
    export: &str,
    log: &mut ChangeLog,
) -> Option<String> {
    match insert_after_anchor(content, element) {
        Some(updated) => {
            log.push(format!("Inserted {element} after the render anchor"));
            Some(add_bridge_import(updated, export, log))
        }
        None => {
            log.push(format!(
                "No structural anchor found; insert {element} manually"
            ));
            None
        }
    }
}

/// Reads a file, mapping the error to a hard-failure message.
pub(crate) fn read_file(path: &Utf8Path) -> Result<String, String> {
    std::fs::read_to_string(path.as_std_path())
        .map_err(|e| format!("failed to read {path}: {e}"))
}

/// Writes a file unless dry-running; errors are hard failures.
pub(crate) fn write_file(path: &Utf8Path, content: &str, dry_run: bool) -> Result<(), String> {
    if dry_run {
        return Ok(());
    }
    std::fs::write(path.as_std_path(), content)
        .map_err(|e| format!("failed to write {path}: {e}"))
}

/// Resolves a root-relative detection path to an absolute one.
pub(crate) fn absolute_path(root: &Utf8Path, file_path: &Utf8Path) -> Utf8PathBuf {
    if file_path.is_absolute() {
        file_path.to_owned()
    } else {
        root.join(file_path)
    }
}

/// Converts a name to a kebab-case slug for deterministic fallback ids.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + 4);
    let mut prev_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && !prev_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "entity".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Derives a page identifier from a page/layout file path.
///
/// `app/pricing/page.tsx` becomes `pricing`; the root page becomes `home`.
/// A leading `src`/`app`/`pages` router directory does not contribute.
pub(crate) fn page_id_for(path: &Utf8Path) -> String {
    let mut parts: Vec<&str> = path
        .parent()
        .map(|p| p.components().map(|c| c.as_str()).collect())
        .unwrap_or_default();

    while parts
        .first()
        .is_some_and(|c| matches!(*c, "src" | "app" | "pages" | "."))
    {
        parts.remove(0);
    }

    if parts.is_empty() {
        // pages-router files carry the page name in the stem
        match path.file_stem() {
            Some(stem) if !matches!(stem, "page" | "layout" | "index") => slugify(stem),
            _ => "home".to_owned(),
        }
    } else {
        slugify(&parts.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_log_live() {
        let mut log = ChangeLog::new(false);
        log.push("Added import");
        assert_eq!(log.into_changes(), ["Added import"]);
    }

    #[test]
    fn test_change_log_dry_run_prefix() {
        let mut log = ChangeLog::new(true);
        log.push("Added import");
        log.push("Replaced form");
        let changes = log.into_changes();
        assert!(changes.iter().all(|c| c.starts_with("[DRY RUN] ")));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("ContactForm"), "contact-form");
        assert_eq!(slugify("FAQPage"), "f-a-q-page");
        assert_eq!(slugify("my form 2"), "my-form-2");
        assert_eq!(slugify(""), "entity");
    }

    #[test]
    fn test_page_id_for() {
        assert_eq!(page_id_for(Utf8Path::new("app/pricing/page.tsx")), "pricing");
        assert_eq!(page_id_for(Utf8Path::new("app/page.tsx")), "home");
        assert_eq!(
            page_id_for(Utf8Path::new("app/docs/getting-started/page.tsx")),
            "docs-getting-started"
        );
        assert_eq!(page_id_for(Utf8Path::new("pages/about.tsx")), "about");
        assert_eq!(page_id_for(Utf8Path::new("pages/index.tsx")), "home");
    }

    #[test]
    fn test_options_from_config() {
        let config = MigrateConfig {
            dry_run: true,
            backup: false,
            allow_assisted: true,
        };
        let options = MigrateOptions::from(config);
        assert!(options.dry_run);
        assert!(!options.backup);
        assert!(options.allow_assisted);
    }
}
