//! Configuration structures for the SiteBridge migration tool.
//!
//! This module provides configuration types for all components of the
//! application:
//!
//! - [`ScanConfig`] - Scanner settings (root path, extensions, skip list)
//! - [`RegistryConfig`] - Remote registry settings (base URL, credentials)
//! - [`MigrateConfig`] - Migrator behavior (dry run, backups, assisted mode)
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with sensible values for a
//! Next.js-style project layout.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Configuration for the file scanner.
///
/// Controls how the scanner traverses the filesystem and which files to
/// analyze.
///
/// # Examples
///
/// ```
/// use sb_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.file_extensions.iter().any(|e| e == "tsx"));
/// assert!(config.skip_dirs.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root path of the source tree to scan.
    pub root_path: Utf8PathBuf,

    /// File extensions to scan for source-level detections.
    pub file_extensions: Vec<String>,

    /// Directory names to skip during traversal, in addition to the
    /// walker's built-in denylist.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links while walking.
    pub follow_links: bool,

    /// Maximum number of parallel analysis jobs.
    /// `None` means use all available CPU cores.
    pub max_parallel_jobs: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: Utf8PathBuf::new(),
            file_extensions: vec![
                "js".to_owned(),
                "jsx".to_owned(),
                "ts".to_owned(),
                "tsx".to_owned(),
            ],
            skip_dirs: Vec::new(),
            follow_links: false,
            max_parallel_jobs: None,
        }
    }
}

/// Configuration for the remote registry client.
///
/// The registry is the managed-service HTTP API that migrated entities
/// (forms, metadata, schemas, ...) are registered with. All endpoints use
/// create-or-409 semantics.
///
/// # Examples
///
/// ```
/// use sb_core::RegistryConfig;
///
/// let config = RegistryConfig::default();
/// assert_eq!(config.base_url, "https://api.sitebridge.dev");
/// assert!(config.api_key.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the registry API.
    pub base_url: String,

    /// Project identifier sent with every registration payload.
    pub project_id: String,

    /// API credential. `None` disables remote registration entirely
    /// (local rewrites still run).
    pub api_key: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sitebridge.dev".to_owned(),
            project_id: String::new(),
            api_key: None,
        }
    }
}

impl RegistryConfig {
    /// Returns `true` if the configuration carries enough information to
    /// talk to the remote registry.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some() && !self.project_id.is_empty()
    }
}

/// Configuration for the migration engine.
///
/// # Examples
///
/// ```
/// use sb_core::MigrateConfig;
///
/// let config = MigrateConfig::default();
/// assert!(config.backup);
/// assert!(!config.dry_run);
/// assert!(!config.allow_assisted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Report changes without touching the filesystem or the network.
    pub dry_run: bool,

    /// Write a `.backup` sibling before the one destructive rewrite
    /// (full form replacement).
    pub backup: bool,

    /// Permit migration of moderate-complexity forms.
    ///
    /// Simple forms migrate unconditionally; complex forms never do.
    pub allow_assisted: bool,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
            allow_assisted: false,
        }
    }
}

/// Root configuration for the SiteBridge migration tool.
///
/// Combines all component configurations into a single structure that can be
/// loaded from a configuration file or constructed programmatically.
///
/// # Examples
///
/// ```
/// use sb_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("scan"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanner configuration.
    pub scan: ScanConfig,

    /// Remote registry configuration.
    pub registry: RegistryConfig,

    /// Migration engine configuration.
    pub migrate: MigrateConfig,
}
