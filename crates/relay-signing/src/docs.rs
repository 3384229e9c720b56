//! Docs-API schema: flat JSON body on `POST /api/v1/docs/`, token auth.

use relay_core::{ContractDocument, SignerSpec};
use serde_json::{json, Value};

use crate::provider::RequestSchema;

#[derive(Debug, Default, Clone, Copy)]
pub struct DocsApiSchema;

impl RequestSchema for DocsApiSchema {
    fn endpoint_path(&self) -> &'static str {
        "/api/v1/docs/"
    }

    fn authorization(&self, token: &str) -> String {
        format!("Token {token}")
    }

    fn build_request(&self, document: &ContractDocument, signers: &[SignerSpec]) -> Value {
        let signers: Vec<Value> = signers
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "email": s.email,
                    "action": s.action.as_str().to_ascii_lowercase(),
                })
            })
            .collect();

        json!({
            "name": document.name(),
            "content_base64": document.content_base64(),
            "signers": signers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::ContractRequest;

    #[test]
    fn flat_body_with_lowercase_action() {
        let req = ContractRequest::new("Carla", "carla@example.com", "Samsung").unwrap();
        let doc = ContractDocument::new(&req, "<p>Carla</p>".into());
        let counter = SignerSpec::signer("Contratada", "ops@empresa.example");

        let body = DocsApiSchema.build_request(&doc, &SignerSpec::pair_for(&req, &counter));
        assert_eq!(body["name"], "Contrato de Desbloqueio - Carla");
        assert_eq!(body["content_base64"], doc.content_base64());
        assert_eq!(
            body["signers"][0],
            json!({"name": "Carla", "email": "carla@example.com", "action": "sign"})
        );
        assert_eq!(body["signers"][1]["name"], "Contratada");
    }

    #[test]
    fn token_authorization_scheme() {
        assert_eq!(DocsApiSchema.authorization("abc"), "Token abc");
    }
}
