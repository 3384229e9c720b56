//! # CORS
//!
//! Browser callers are allowed per [`CorsPolicy`]. Methods are limited to
//! `GET`, `POST` and `OPTIONS`; the only allowed request header is
//! `content-type`.

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::state::CorsPolicy;

pub fn layer(policy: &CorsPolicy) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    match policy {
        CorsPolicy::SameOrigin => base,
        CorsPolicy::Any => base.allow_origin(Any),
        CorsPolicy::List(origins) => base.allow_origin(AllowOrigin::list(origins.iter().cloned())),
    }
}
