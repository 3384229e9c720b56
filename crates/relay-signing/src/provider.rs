//! # Provider Client
//!
//! [`SigningProvider`] is the seam the orchestrator calls through.
//! [`HttpSigningProvider`] is the production implementation: an HTTP client
//! with the provider's auth header baked in, paired with the
//! [`RequestSchema`] of the configured variant.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use relay_core::{ContractDocument, SignerSpec};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ConfigError, ProviderVariant, SigningConfig};
use crate::error::ProviderError;
use crate::{docs, graphql, rest};

/// The provider's success body, relayed to the caller unmodified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProviderResponse(Value);

impl ProviderResponse {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Submit a rendered contract for signature.
#[async_trait]
pub trait SigningProvider: Send + Sync {
    /// Which schema this provider speaks.
    fn variant(&self) -> ProviderVariant;

    /// Create the document with the given signers.
    ///
    /// Makes exactly one outbound call. Not idempotent: repeating a submit
    /// creates a second document on the provider side.
    async fn submit(
        &self,
        document: &ContractDocument,
        signers: &[SignerSpec],
    ) -> Result<ProviderResponse, ProviderError>;
}

/// Wire format of one provider variant.
pub trait RequestSchema: Send + Sync + fmt::Debug {
    /// Path appended to the configured base URL.
    fn endpoint_path(&self) -> &'static str;

    /// Value of the `Authorization` header.
    fn authorization(&self, token: &str) -> String {
        format!("Bearer {token}")
    }

    /// JSON request body.
    fn build_request(&self, document: &ContractDocument, signers: &[SignerSpec]) -> Value;

    /// Classify the provider's answer.
    fn parse_response(&self, status: u16, body: &str) -> Result<ProviderResponse, ProviderError> {
        let value = body_value(body);
        if (200..300).contains(&status) {
            Ok(ProviderResponse::new(value))
        } else {
            Err(ProviderError::Rejected {
                status,
                body: value,
            })
        }
    }
}

/// Schema implementation for `variant`.
pub fn schema_for(variant: ProviderVariant) -> Box<dyn RequestSchema> {
    match variant {
        ProviderVariant::RestV2 => Box::new(rest::RestV2Schema),
        ProviderVariant::GraphqlV2 => Box::new(graphql::GraphqlSchema),
        ProviderVariant::DocsApi => Box::new(docs::DocsApiSchema),
    }
}

/// Response body as JSON when it parses, otherwise as a string.
pub(crate) fn body_value(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// HTTP-backed [`SigningProvider`].
#[derive(Debug)]
pub struct HttpSigningProvider {
    http: reqwest::Client,
    variant: ProviderVariant,
    schema: Box<dyn RequestSchema>,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpSigningProvider {
    /// Create a provider client from configuration.
    pub fn new(config: SigningConfig) -> Result<Self, ProviderError> {
        let schema = schema_for(config.variant);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut auth = reqwest::header::HeaderValue::from_str(
                    &schema.authorization(config.api_token.as_str()),
                )
                .map_err(|_| ProviderError::Config(ConfigError::InvalidToken))?;
                auth.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| ProviderError::Transport {
                endpoint: "client_init".into(),
                reason: e.to_string(),
            })?;

        let endpoint = join_endpoint(&config.base_url, schema.endpoint_path());

        Ok(Self {
            http,
            variant: config.variant,
            schema,
            endpoint,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Full URL every submission is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ProviderError::Transport {
                endpoint: self.endpoint.clone(),
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl SigningProvider for HttpSigningProvider {
    fn variant(&self) -> ProviderVariant {
        self.variant
    }

    async fn submit(
        &self,
        document: &ContractDocument,
        signers: &[SignerSpec],
    ) -> Result<ProviderResponse, ProviderError> {
        let payload = self.schema.build_request(document, signers);

        tracing::info!(
            provider = %self.variant,
            endpoint = %self.endpoint,
            document = document.name(),
            signers = signers.len(),
            "submitting contract to signing provider"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        let result = self.schema.parse_response(status, &body);
        match &result {
            Ok(_) => tracing::info!(provider = %self.variant, status, "signing provider accepted document"),
            Err(e) => tracing::warn!(provider = %self.variant, status, error = %e, "signing provider rejected document"),
        }
        result
    }
}

/// Append `path` to `base`, keeping any path prefix the base carries.
fn join_endpoint(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}
