//! # Payload Normalizer
//!
//! Callers of the relay do not agree on a payload shape. Some send JSON with
//! the right header, some send form posts, some send JSON as `text/plain`,
//! and the field names vary between front-end revisions. This module turns
//! all of that into one [`ContractRequest`] or a [`MissingFieldsError`].
//!
//! ## Dispatch
//!
//! | Declared content type               | Field source                          |
//! |-------------------------------------|---------------------------------------|
//! | `application/json`, `*+json`        | JSON object, else empty               |
//! | `application/x-www-form-urlencoded` | `key=value&...` pairs                 |
//! | anything else / absent              | JSON object, else querystring, else empty |
//!
//! ## Alias search
//!
//! Each logical field is looked up under its aliases in priority order; the
//! first non-empty value wins. Strings are trimmed, numbers and booleans are
//! taken as text, nulls and nested values are skipped.

use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::{LogicalField, MissingFieldsError};

/// Aliases for the client name, highest priority first.
pub const NAME_ALIASES: &[&str] = &["nome", "name", "fullName", "cliente", "nomeCompleto"];

/// Aliases for the client email, highest priority first.
pub const EMAIL_ALIASES: &[&str] = &["email", "mail", "e-mail"];

/// Aliases for the unlock type, highest priority first.
pub const UNLOCK_TYPE_ALIASES: &[&str] =
    &["tipo", "tipoDesbloqueio", "type", "desbloqueio", "servico"];

/// Untyped key/value view of an inbound body.
pub type FieldSource = Map<String, Value>;

/// How the inbound body is interpreted, derived from its `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Declared JSON.
    Json,
    /// Declared `application/x-www-form-urlencoded`.
    Form,
    /// Anything else, including a missing header.
    Raw,
}

impl BodyEncoding {
    /// Classify a `Content-Type` header value by its MIME essence.
    pub fn detect(content_type: Option<&str>) -> Self {
        let Some(raw) = content_type else {
            return Self::Raw;
        };
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Raw
        }
    }

    /// Parse `body` into a field source according to this encoding.
    ///
    /// Never fails: a body that cannot be read yields an empty source, and
    /// validation reports the missing fields.
    pub fn field_source(self, body: &[u8]) -> FieldSource {
        match self {
            Self::Json => parse_json_object(body).unwrap_or_default(),
            Self::Form => parse_form(body),
            Self::Raw => parse_json_object(body)
                .or_else(|| parse_querystring(body))
                .unwrap_or_default(),
        }
    }
}

fn parse_json_object(body: &[u8]) -> Option<FieldSource> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Form pairs; the first occurrence of a repeated key wins.
fn parse_form(body: &[u8]) -> FieldSource {
    let mut source = FieldSource::new();
    for (key, value) in form_urlencoded::parse(body) {
        source
            .entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    source
}

fn parse_querystring(body: &[u8]) -> Option<FieldSource> {
    let text = std::str::from_utf8(body).ok()?.trim();
    if !text.contains('=') {
        return None;
    }
    let source = parse_form(text.as_bytes());
    (!source.is_empty()).then_some(source)
}

fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn lookup(source: &FieldSource, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| source.get(*alias))
        .find_map(text_value)
}

/// A contract-signing request with all three fields resolved and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRequest {
    client_name: String,
    client_email: String,
    unlock_type: String,
}

impl ContractRequest {
    /// Build a request from already-extracted values.
    ///
    /// Values are trimmed. Returns `None` if any of them is empty.
    pub fn new(
        client_name: impl Into<String>,
        client_email: impl Into<String>,
        unlock_type: impl Into<String>,
    ) -> Option<Self> {
        let client_name = client_name.into().trim().to_string();
        let client_email = client_email.into().trim().to_string();
        let unlock_type = unlock_type.into().trim().to_string();
        if client_name.is_empty() || client_email.is_empty() || unlock_type.is_empty() {
            return None;
        }
        Some(Self {
            client_name,
            client_email,
            unlock_type,
        })
    }

    /// Run the alias search over a field source.
    ///
    /// On failure returns every unresolved field, in canonical order.
    pub fn from_source(source: &FieldSource) -> Result<Self, Vec<LogicalField>> {
        let name = lookup(source, NAME_ALIASES);
        let email = lookup(source, EMAIL_ALIASES);
        let unlock_type = lookup(source, UNLOCK_TYPE_ALIASES);

        match (name, email, unlock_type) {
            (Some(client_name), Some(client_email), Some(unlock_type)) => Ok(Self {
                client_name,
                client_email,
                unlock_type,
            }),
            (name, email, unlock_type) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push(LogicalField::Name);
                }
                if email.is_none() {
                    missing.push(LogicalField::Email);
                }
                if unlock_type.is_none() {
                    missing.push(LogicalField::UnlockType);
                }
                Err(missing)
            }
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn unlock_type(&self) -> &str {
        &self.unlock_type
    }
}

/// Normalize an inbound body into a [`ContractRequest`].
///
/// `content_type` is the raw `Content-Type` header value, if any. This is
/// the only validation gate in front of rendering and submission.
pub fn normalize(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<ContractRequest, MissingFieldsError> {
    let encoding = BodyEncoding::detect(content_type);
    let source = encoding.field_source(body);
    tracing::debug!(?encoding, fields = source.len(), "parsed inbound field source");

    ContractRequest::from_source(&source).map_err(|missing| MissingFieldsError {
        missing,
        received: source,
        content_type: content_type.map(str::to_string),
    })
}
