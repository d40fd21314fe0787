//! HTTP client for the SiteBridge entity registry.
//!
//! The registry is a black-box HTTP API with create/update semantics: one
//! endpoint family per concern, JSON bodies, and idempotent-by-convention
//! behavior. A `2xx` response is success; `400`/`409` means the entity
//! already exists (soft success, not retried, not failed); anything else is
//! an error the caller folds into its own failure policy.
//!
//! Migrators talk to the [`EntityRegistry`] trait rather than the concrete
//! client, so tests substitute a stub without a network.
//!
//! # Example
//!
//! ```ignore
//! use sb_registry::{EntityKind, EntityRegistry, RegistryClient};
//!
//! let client = RegistryClient::new("https://api.sitebridge.dev", "proj_1", "sk_live")?;
//! let outcome = client
//!     .register(EntityKind::Form, serde_json::json!({ "name": "ContactForm" }))
//!     .await?;
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod client;
mod error;

pub use client::RegistryClient;
pub use error::RegistryError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The entity families the registry knows about.
///
/// Each maps to one endpoint path under the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EntityKind {
    /// A managed form definition.
    Form,
    /// Page metadata.
    Metadata,
    /// A chat widget configuration.
    Widget,
    /// A structured-data schema.
    Schema,
    /// A FAQ collection.
    Faq,
    /// A sitemap registration.
    Sitemap,
    /// An analytics configuration.
    Analytics,
}

impl EntityKind {
    /// Returns the endpoint path segment for this entity family.
    #[inline]
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Form => "forms",
            Self::Metadata => "metadata",
            Self::Widget => "widgets",
            Self::Schema => "schemas",
            Self::Faq => "faqs",
            Self::Sitemap => "sitemaps",
            Self::Analytics => "analytics",
        }
    }
}

/// Outcome of a successful registry round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The entity was created; the registry assigned this identifier.
    Created {
        /// Registry-assigned entity id.
        id: String,
    },

    /// The registry answered 400/409: the entity already exists.
    ///
    /// Treated as soft success: not retried, not failed.
    AlreadyExists,
}

impl RegisterOutcome {
    /// Returns the created id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Created { id } => Some(id),
            Self::AlreadyExists => None,
        }
    }
}

/// The registry seam used by migrators.
///
/// The production implementation is [`RegistryClient`]; tests use in-memory
/// stubs.
#[async_trait]
pub trait EntityRegistry: Send + Sync {
    /// Registers one entity, returning the outcome or a transport/status
    /// error.
    async fn register(
        &self,
        kind: EntityKind,
        payload: serde_json::Value,
    ) -> Result<RegisterOutcome, RegistryError>;
}
