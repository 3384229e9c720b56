//! Signing-provider error types.

use serde_json::Value;

use crate::config::ConfigError;

/// Errors from a signing-provider submission.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status, or with a success
    /// status whose body reports errors. `body` is relayed verbatim.
    #[error("signing provider rejected the document with HTTP {status}")]
    Rejected { status: u16, body: Value },
    /// No answer within the configured timeout.
    #[error("signing provider {endpoint} did not answer within {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// HTTP transport error (connection refused, DNS, TLS, truncated body).
    #[error("HTTP error calling {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ProviderError {
    /// Payload relayed to the caller in the error envelope.
    ///
    /// A rejection carries the provider's own body; every other failure is
    /// reported by its message.
    pub fn detail(&self) -> Value {
        match self {
            Self::Rejected { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }

    /// HTTP status the provider answered with, if it answered at all.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
