//! # Contract Relay Endpoint
//!
//! `POST /api/enviar-contrato` accepts a JSON, form-encoded or raw text body,
//! runs it through the [`ContractPipeline`](crate::pipeline::ContractPipeline)
//! and relays the signing provider's answer.
//!
//! The body is taken as raw bytes: encoding detection is the normalizer's
//! job, so a body that fails to parse becomes a 400 with the standard
//! envelope. A body the server cannot buffer at all (over the size limit)
//! is answered with the same envelope, keeping Axum's status.

use std::borrow::Cow;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use relay_signing::ProviderResponse;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::extract_bytes;
use crate::state::AppState;

/// Path of the relay endpoint.
pub const CONTRACT_ROUTE: &str = "/api/enviar-contrato";

/// `{"success": true, "data": <provider response>}`.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: ProviderResponse,
}

impl SuccessEnvelope {
    pub fn new(data: ProviderResponse) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route(CONTRACT_ROUTE, post(send_contract))
}

/// Raw `Content-Type` value. Non-UTF-8 bytes are replaced rather than
/// dropped, so the 400 envelope still shows that a header was sent.
fn content_type(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    headers
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
}

async fn send_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("send_contract", %request_id);

    async move {
        let body = match extract_bytes(body) {
            Ok(body) => body,
            Err(err) => return err.into_response(),
        };
        let content_type = content_type(&headers);

        match state.pipeline.run(content_type.as_deref(), &body).await {
            Ok(data) => {
                tracing::info!("contract relayed to signing provider");
                (StatusCode::OK, Json(SuccessEnvelope::new(data))).into_response()
            }
            Err(err) => {
                tracing::debug!(stage = %err.stage(), "contract pipeline failed");
                AppError::from(err).into_response()
            }
        }
    }
    .instrument(span)
    .await
}
