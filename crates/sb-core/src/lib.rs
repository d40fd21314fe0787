//! Core types, errors, and configuration for the SiteBridge migration tool.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Error types for consistent error handling
//! - Configuration structures for the scanner, registry client, and migrators
//! - Domain types: the eight [`Detection`] variants, [`ScanResult`],
//!   [`MigrationResult`]
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{Config, MigrateConfig, RegistryConfig, ScanConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet};
pub use types::{
    AnalyticsDetection, AnalyticsProvider, ChatProvider, DRY_RUN_PREFIX, Detection,
    DetectionCategory, FaqDetection, FaqKind, FieldOption, FormComplexity, FormDetection,
    FormField, FormLibrary, ImageDetection, ImageElement, MatchStrategy, MetadataDetection,
    MetadataKind, MigrationResult, MigrationSummary, ScanResult, SchemaCategory, SchemaDetection,
    SitemapDetection, SitemapGenerator, SourceSpan, SuggestedAction, WidgetDetection,
};
