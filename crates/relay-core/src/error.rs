//! Errors raised before a contract reaches the signing provider.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::request::FieldSource;

/// One of the three logical fields every contract request must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalField {
    /// Client name (`nome`).
    #[serde(rename = "nome")]
    Name,
    /// Client email (`email`).
    #[serde(rename = "email")]
    Email,
    /// Unlock type (`tipo`).
    #[serde(rename = "tipo")]
    UnlockType,
}

impl LogicalField {
    /// Canonical inbound field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Email => "email",
            Self::UnlockType => "tipo",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The inbound payload did not resolve all required fields.
///
/// Carries the field source exactly as parsed and the declared content type
/// so the caller can see what the relay actually received.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("incomplete contract request: missing {}", join_fields(.missing))]
pub struct MissingFieldsError {
    /// Fields that had no non-empty value under any alias, in canonical order.
    pub missing: Vec<LogicalField>,
    /// The parsed field source (empty when nothing could be parsed).
    pub received: FieldSource,
    /// Raw `Content-Type` header value, if one was sent.
    pub content_type: Option<String>,
}

fn join_fields(fields: &[LogicalField]) -> String {
    fields
        .iter()
        .map(LogicalField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The contract template could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to load contract template {}: {source}", .path.display())]
pub struct TemplateLoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
