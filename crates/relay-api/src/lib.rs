//! # relay-api -- Contract Relay HTTP Service
//!
//! Accepts contract requests from a web form or any other client, renders
//! the HTML contract for the named client, and submits it to the configured
//! signing provider with the client and the counter-signer as signers.
//!
//! ## API Surface
//!
//! | Method | Path                    | Module                  |
//! |--------|-------------------------|-------------------------|
//! | POST   | `/api/enviar-contrato`  | [`routes::contracts`]   |
//! | GET    | `/__version`            | health check            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → DefaultBodyLimit → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors::layer(&state.config.allowed_origins);

    Router::new()
        .route("/__version", get(version))
        .merge(routes::contracts::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check: always 200 while the process is serving.
async fn version() -> Json<Value> {
    Json(json!({
        "ok": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
