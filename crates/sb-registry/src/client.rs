//! The reqwest-backed registry client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::{EntityKind, EntityRegistry, RegisterOutcome};

/// Response body of a successful create.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    /// Registry-assigned entity id.
    id: String,
}

/// HTTP client for the SiteBridge registry.
///
/// All endpoints are `POST {base}/v1/{entity}` with a JSON payload carrying
/// the detection fields plus the project identifier; the credential rides
/// in a bearer header. The client assumes nothing about the transport
/// beyond create-or-409 semantics and JSON bodies.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Base URL of the registry API, without a trailing slash.
    base_url: String,
    /// Project identifier folded into every payload.
    project_id: String,
    /// API credential.
    api_key: String,
    /// The underlying HTTP client (connection pooling, TLS).
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a new registry client.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] when the base URL or credential is
    /// empty.
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let base_url = base_url.into();
        let project_id = project_id.into();
        let api_key = api_key.into();

        if base_url.is_empty() {
            return Err(RegistryError::config("base URL must not be empty"));
        }
        if api_key.is_empty() {
            return Err(RegistryError::config("API key must not be empty"));
        }
        if project_id.is_empty() {
            return Err(RegistryError::config("project id must not be empty"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            project_id,
            api_key,
            http: reqwest::Client::new(),
        })
    }

    /// Returns the endpoint URL for an entity family.
    fn endpoint(&self, kind: EntityKind) -> String {
        format!("{}/v1/{}", self.base_url, kind.path())
    }
}

#[async_trait]
impl EntityRegistry for RegistryClient {
    async fn register(
        &self,
        kind: EntityKind,
        payload: serde_json::Value,
    ) -> Result<RegisterOutcome, RegistryError> {
        let url = self.endpoint(kind);

        // Fold the project id into the payload
        let mut body = payload;
        if let Some(object) = body.as_object_mut() {
            object.insert(
                "projectId".to_owned(),
                serde_json::Value::String(self.project_id.clone()),
            );
        }

        debug!(url = %url, kind = ?kind, "Registering entity");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            // Fall back to a registry-less id when the body has none
            let id = response
                .json::<CreateResponse>()
                .await
                .map(|r| r.id)
                .unwrap_or_default();
            return Ok(RegisterOutcome::Created { id });
        }

        // Already-exists convention: 400/409 is soft success
        if status.as_u16() == 400 || status.as_u16() == 409 {
            debug!(kind = ?kind, status = status.as_u16(), "Entity already exists");
            return Ok(RegisterOutcome::AlreadyExists);
        }

        let body_text = response.text().await.unwrap_or_default();
        warn!(kind = ?kind, status = status.as_u16(), "Registry error response");
        Err(RegistryError::status(status.as_u16(), body_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_credentials() {
        assert!(RegistryClient::new("", "p", "k").is_err());
        assert!(RegistryClient::new("https://api.example.com", "p", "").is_err());
        assert!(RegistryClient::new("https://api.example.com", "", "k").is_err());
        assert!(RegistryClient::new("https://api.example.com", "p", "k").is_ok());
    }

    #[test]
    fn test_endpoint_building() {
        let client =
            RegistryClient::new("https://api.example.com/", "proj", "key").expect("client");
        assert_eq!(
            client.endpoint(EntityKind::Form),
            "https://api.example.com/v1/forms"
        );
        assert_eq!(
            client.endpoint(EntityKind::Analytics),
            "https://api.example.com/v1/analytics"
        );
    }
}
