//! Migration result types.
//!
//! This module provides [`MigrationResult`], the per-detection outcome record,
//! and [`MigrationSummary`], the batch rollup. A result is created once per
//! detection processed and never mutated after return.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Prefix applied to every change entry produced during a dry run.
pub const DRY_RUN_PREFIX: &str = "[DRY RUN] ";

/// The outcome of migrating one detection.
///
/// The ordered `changes` list doubles as the dry-run output channel: in
/// dry-run mode the same entries are produced with a `[DRY RUN] ` prefix and
/// no filesystem or network writes happen.
///
/// # Examples
///
/// ```
/// use sb_core::MigrationResult;
/// use camino::Utf8Path;
///
/// let mut result = MigrationResult::success(Utf8Path::new("app/contact/page.tsx"));
/// result.push_change("Added import for BridgeForm");
/// assert!(result.success);
/// assert_eq!(result.changes.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Path of the migrated file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Whether the migration completed (including safe no-ops).
    pub success: bool,

    /// Human-readable descriptions of the changes made, in order.
    pub changes: Vec<String>,

    /// The failure reason, when `success` is false.
    pub error: Option<String>,

    /// Identifier of the remotely created entity, when one was registered.
    pub form_id: Option<String>,
}

impl MigrationResult {
    /// Creates a successful result with no changes yet.
    #[must_use]
    pub fn success(file_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            success: true,
            changes: Vec::new(),
            error: None,
            form_id: None,
        }
    }

    /// Creates a failed result with the given error message.
    #[must_use]
    pub fn failure(file_path: impl Into<Utf8PathBuf>, error: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            success: false,
            changes: Vec::new(),
            error: Some(error.into()),
            form_id: None,
        }
    }

    /// Appends a change description.
    pub fn push_change(&mut self, change: impl Into<String>) {
        self.changes.push(change.into());
    }

    /// Returns `true` if any change entry mentions the given text.
    #[must_use]
    pub fn mentions(&self, text: &str) -> bool {
        self.changes.iter().any(|c| c.contains(text))
    }

    /// Returns `true` if every change entry carries the dry-run prefix.
    ///
    /// Vacuously true for an empty change list.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.changes.iter().all(|c| c.starts_with(DRY_RUN_PREFIX))
    }
}

/// Rollup of a batch migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSummary {
    /// Every per-detection result, in processing order.
    pub results: Vec<MigrationResult>,
}

impl MigrationSummary {
    /// Creates an empty summary.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: MigrationResult) {
        self.results.push(result);
    }

    /// Returns the number of successful migrations.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Returns the number of failed migrations.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Returns the failed results for reporting.
    pub fn failures(&self) -> impl Iterator<Item = &MigrationResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// Returns results touching the given file.
    pub fn for_file<'a>(
        &'a self,
        path: &'a Utf8Path,
    ) -> impl Iterator<Item = &'a MigrationResult> + 'a {
        self.results.iter().filter(move |r| r.file_path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_constructor() {
        let result = MigrationResult::success(Utf8Path::new("src/a.tsx"));
        assert!(result.success);
        assert!(result.error.is_none());
        assert!(result.changes.is_empty());
        assert!(result.form_id.is_none());
    }

    #[test]
    fn test_failure_constructor() {
        let result = MigrationResult::failure(Utf8Path::new("src/a.tsx"), "disk full");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_push_change_and_mentions() {
        let mut result = MigrationResult::success(Utf8Path::new("src/a.tsx"));
        result.push_change("Added import for BridgeForm");
        result.push_change("Replaced form markup");
        assert!(result.mentions("BridgeForm"));
        assert!(result.mentions("Replaced"));
        assert!(!result.mentions("BridgeChat"));
    }

    #[test]
    fn test_is_dry_run() {
        let mut result = MigrationResult::success(Utf8Path::new("src/a.tsx"));
        assert!(result.is_dry_run());

        result.push_change(format!("{DRY_RUN_PREFIX}Would add import"));
        assert!(result.is_dry_run());

        result.push_change("Added import");
        assert!(!result.is_dry_run());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = MigrationSummary::new();
        summary.push(MigrationResult::success(Utf8Path::new("a.tsx")));
        summary.push(MigrationResult::failure(Utf8Path::new("b.tsx"), "io"));
        summary.push(MigrationResult::success(Utf8Path::new("a.tsx")));

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures().count(), 1);
        assert_eq!(summary.for_file(Utf8Path::new("a.tsx")).count(), 2);
    }

    #[test]
    fn test_result_serialization() {
        let mut result = MigrationResult::success(Utf8Path::new("src/a.tsx"));
        result.form_id = Some("frm_123".to_owned());
        let json = serde_json::to_string(&result).unwrap();
        let parsed: MigrationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, parsed);
    }
}
