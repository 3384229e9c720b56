//! GraphQL v2 schema: the `createDocument` mutation.
//!
//! The document travels as a file object (base64, filename, mimetype).
//! GraphQL servers report most failures with HTTP 200 and an `errors`
//! array, so a success status alone is not treated as acceptance.

use relay_core::{ContractDocument, SignerSpec};
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::provider::{body_value, ProviderResponse, RequestSchema};

/// Mutation sent with every submission.
pub const CREATE_DOCUMENT_MUTATION: &str = "mutation CreateDocumentMutation($document: DocumentInput!, $signers: [SignerInput!]!) { createDocument(document: $document, signers: $signers) { id name created_at signatures { public_id name email action { name } link { short_link } } } }";

#[derive(Debug, Default, Clone, Copy)]
pub struct GraphqlSchema;

impl RequestSchema for GraphqlSchema {
    fn endpoint_path(&self) -> &'static str {
        "/v2/graphql"
    }

    fn build_request(&self, document: &ContractDocument, signers: &[SignerSpec]) -> Value {
        let signers: Vec<Value> = signers
            .iter()
            .map(|s| {
                json!({
                    "email": s.email,
                    "action": s.action.as_str(),
                    "name": s.name,
                })
            })
            .collect();

        json!({
            "query": CREATE_DOCUMENT_MUTATION,
            "variables": {
                "document": {
                    "name": document.name(),
                    "file": {
                        "base64": document.content_base64(),
                        "filename": document.filename(),
                        "mimetype": document.mime_type(),
                    }
                },
                "signers": signers,
            }
        })
    }

    fn parse_response(&self, status: u16, body: &str) -> Result<ProviderResponse, ProviderError> {
        let value = body_value(body);
        let has_errors = value
            .get("errors")
            .and_then(Value::as_array)
            .is_some_and(|errors| !errors.is_empty());

        if (200..300).contains(&status) && !has_errors {
            Ok(ProviderResponse::new(value))
        } else {
            Err(ProviderError::Rejected {
                status,
                body: value,
            })
        }
    }
}
