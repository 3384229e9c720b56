//! # relay-core -- Contract Relay Domain Types
//!
//! Everything the relay knows about a contract before it leaves the process:
//!
//! - [`request`] -- turns an inbound body of unknown shape (JSON, form-encoded,
//!   raw text) into a typed [`ContractRequest`] via prioritized alias search.
//! - [`template`] -- literal placeholder substitution over the HTML contract
//!   template, producing a [`ContractDocument`].
//! - [`document`] -- the rendered document and the [`SignerSpec`] parties.
//! - [`error`] -- the validation and template errors raised before any
//!   network call is made.
//!
//! ## Crate Policy
//!
//! - No I/O beyond what callers hand in. Template bytes are loaded by the
//!   API layer; this crate only renders them.
//! - No HTTP types. The provider adapter lives in `relay-signing`.

pub mod document;
pub mod error;
pub mod request;
pub mod template;

pub use document::{ContractDocument, SignerAction, SignerSpec};
pub use error::{LogicalField, MissingFieldsError, TemplateLoadError};
pub use request::{normalize, BodyEncoding, ContractRequest, FieldSource};
pub use template::{ContractTemplate, Escaping};
