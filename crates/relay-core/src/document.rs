//! # Contract Document & Signers
//!
//! The rendered artifact handed to the signing provider, and the two parties
//! who sign it: the client from the request, and the counter-signer from
//! process configuration.

use base64::{engine::general_purpose, Engine as _};
use crate::request::ContractRequest;

/// Prefix of every document name; the client name follows it.
pub const DOCUMENT_NAME_PREFIX: &str = "Contrato de Desbloqueio - ";

/// MIME type of the rendered contract.
pub const DOCUMENT_MIME_TYPE: &str = "text/html";

/// A rendered contract, ready for submission.
///
/// Owned by a single pipeline run; never cached or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDocument {
    name: String,
    html: String,
    content_base64: String,
}

impl ContractDocument {
    /// Wrap rendered HTML for `request`, deriving the name and base64 content.
    pub fn new(request: &ContractRequest, html: String) -> Self {
        let content_base64 = general_purpose::STANDARD.encode(html.as_bytes());
        Self {
            name: format!("{DOCUMENT_NAME_PREFIX}{}", request.client_name()),
            html,
            content_base64,
        }
    }

    /// `"Contrato de Desbloqueio - {clientName}"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Standard (padded) base64 of the UTF-8 HTML.
    pub fn content_base64(&self) -> &str {
        &self.content_base64
    }

    /// File name used by schemas that upload the document as a file object.
    pub fn filename(&self) -> String {
        format!("{}.html", self.name)
    }

    pub fn mime_type(&self) -> &'static str {
        DOCUMENT_MIME_TYPE
    }
}

/// What a signer is asked to do with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignerAction {
    Sign,
}

impl SignerAction {
    /// Wire form used by the provider schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sign => "SIGN",
        }
    }
}

/// One party to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSpec {
    pub name: String,
    pub email: String,
    pub action: SignerAction,
}

impl SignerSpec {
    /// A party asked to sign.
    pub fn signer(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            action: SignerAction::Sign,
        }
    }

    /// The client named in the request.
    pub fn client(request: &ContractRequest) -> Self {
        Self::signer(request.client_name(), request.client_email())
    }

    /// Signer list for a document: the client first, then the counter-signer.
    pub fn pair_for(request: &ContractRequest, counter_signer: &SignerSpec) -> [SignerSpec; 2] {
        [Self::client(request), counter_signer.clone()]
    }
}
