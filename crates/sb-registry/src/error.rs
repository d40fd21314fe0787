//! Error types for the sb-registry crate.

/// Errors from a registry round trip.
///
/// 400/409 responses are not errors; they surface as
/// [`RegisterOutcome::AlreadyExists`](crate::RegisterOutcome::AlreadyExists).
/// Everything here is either a transport failure or an unexpected status,
/// and the migrators decide whether that is soft (a change-log note) or
/// hard (a failed migration).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The HTTP request itself failed (connection, DNS, timeout).
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry answered with an unexpected status code.
    #[error("registry answered {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The client was constructed with an invalid base URL or credential.
    #[error("invalid registry configuration: {0}")]
    Config(String),
}

impl RegistryError {
    /// Creates a new [`RegistryError::Status`] error.
    #[inline]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a new [`RegistryError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
