//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure is reported in the relay's JSON envelope
//! (`{"success": false, "error": ...}`) and logged server-side: `warn` for
//! client errors, `error` for everything else.
//!
//! A provider rejection is relayed with the provider's own body as `error`.
//! No other internal detail reaches the client beyond the failure message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::{MissingFieldsError, TemplateLoadError};
use relay_signing::ProviderError;
use serde_json::{json, Value};
use thiserror::Error;

use crate::pipeline::PipelineError;

/// `error` message of the 400 envelope.
pub const INCOMPLETE_DATA_MESSAGE: &str = "Dados incompletos: nome, email e tipo são obrigatórios";

/// `error` message when the contract template cannot be read.
pub const CONTRACT_GENERATION_MESSAGE: &str = "Erro interno ao gerar o contrato";

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required contract fields are missing (400).
    #[error("bad request: {0}")]
    IncompleteData(#[from] MissingFieldsError),

    /// The request body could not be read, e.g. it exceeds the size limit.
    /// Keeps the rejection's status (413 or 400).
    #[error("unreadable request body: {message}")]
    UnreadableBody { status: StatusCode, message: String },

    /// The contract template could not be loaded (500).
    #[error("contract generation failed: {0}")]
    ContractGeneration(#[from] TemplateLoadError),

    /// The signing provider rejected the document or could not be reached (500).
    #[error("signing provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::IncompleteData(_) => StatusCode::BAD_REQUEST,
            Self::UnreadableBody { status, .. } => *status,
            Self::ContractGeneration(_) | Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The JSON envelope returned to the caller.
    pub fn body(&self) -> Value {
        match self {
            Self::IncompleteData(err) => json!({
                "success": false,
                "error": INCOMPLETE_DATA_MESSAGE,
                "received": err.received,
                "contentType": err.content_type,
                "missing": err.missing,
            }),
            Self::UnreadableBody { message, .. } => json!({
                "success": false,
                "error": message,
            }),
            Self::ContractGeneration(_) => json!({
                "success": false,
                "error": CONTRACT_GENERATION_MESSAGE,
            }),
            Self::Provider(err) => json!({
                "success": false,
                "error": err.detail(),
            }),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingFields(e) => Self::IncompleteData(e),
            PipelineError::TemplateLoad(e) => Self::ContractGeneration(e),
            PipelineError::Provider(e) => Self::Provider(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::IncompleteData(err) => {
                tracing::warn!(missing = %err, content_type = ?err.content_type, "rejected incomplete contract request");
            }
            Self::UnreadableBody { status, message } => {
                tracing::warn!(%status, error = %message, "rejected unreadable request body");
            }
            Self::ContractGeneration(err) => {
                tracing::error!(error = %err, "contract template unavailable");
            }
            Self::Provider(err) => {
                tracing::error!(error = %err, provider_status = ?err.provider_status(), detail = %err.detail(), "signing provider call failed");
            }
        }

        (status, Json(self.body())).into_response()
    }
}
