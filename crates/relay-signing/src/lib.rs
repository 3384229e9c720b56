//! # relay-signing: Signing-Provider Adapter
//!
//! Submits a rendered [`relay_core::ContractDocument`] and its two signers to
//! an electronic-signature provider's document-creation API.
//!
//! ## Architecture
//!
//! The orchestrator only sees [`SigningProvider::submit`]. Behind it,
//! [`HttpSigningProvider`] owns one `reqwest::Client` and one
//! [`RequestSchema`], chosen once from [`ProviderVariant`] at startup:
//!
//! | Variant     | Endpoint              | Auth header     | Module        |
//! |-------------|-----------------------|-----------------|---------------|
//! | `rest`      | `POST /v2/documents`  | `Bearer <token>`| [`rest`]      |
//! | `graphql`   | `POST /v2/graphql`    | `Bearer <token>`| [`graphql`]   |
//! | `docs`      | `POST /api/v1/docs/`  | `Token <token>` | [`docs`]      |
//!
//! ## Failure Policy
//!
//! Every call is bounded by the configured timeout (30 s by default). There
//! are no retries: a timeout or transport failure is returned as-is, and a
//! non-success response is returned with the provider's body untouched.

pub mod config;
pub mod docs;
pub mod error;
pub mod graphql;
pub mod provider;
pub mod rest;

pub use config::{ProviderVariant, SigningConfig};
pub use error::ProviderError;
pub use provider::{HttpSigningProvider, ProviderResponse, RequestSchema, SigningProvider};
