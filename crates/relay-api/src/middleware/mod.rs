//! # Middleware
//!
//! Cross-origin policy. Request tracing uses `TraceLayer` directly in
//! [`crate::app`].

pub mod cors;
