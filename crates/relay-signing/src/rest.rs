//! REST v2 schema: `POST /v2/documents` with the HTML inlined as base64.

use relay_core::{ContractDocument, SignerSpec};
use serde_json::{json, Value};

use crate::provider::RequestSchema;

#[derive(Debug, Default, Clone, Copy)]
pub struct RestV2Schema;

impl RequestSchema for RestV2Schema {
    fn endpoint_path(&self) -> &'static str {
        "/v2/documents"
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
            "document": {
                "name": document.name(),
                "content_base64": document.content_base64(),
                "signers": signers,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::ContractRequest;

    #[test]
    fn body_nests_signers_inside_document() {
        let req = ContractRequest::new("Ana", "ana@example.com", "iCloud").unwrap();
        let doc = ContractDocument::new(&req, "<p>Ana</p>".into());
        let counter = SignerSpec::signer("Contratada", "ops@empresa.example");
        let signers = SignerSpec::pair_for(&req, &counter);

        let body = RestV2Schema.build_request(&doc, &signers);
        assert_eq!(
            body,
            json!({
                "document": {
                    "name": "Contrato de Desbloqueio - Ana",
                    "content_base64": doc.content_base64(),
                    "signers": [
                        {"email": "ana@example.com", "action": "SIGN", "name": "Ana"},
                        {"email": "ops@empresa.example", "action": "SIGN", "name": "Contratada"},
                    ]
                }
            })
        );
        assert_eq!(RestV2Schema.authorization("t0k"), "Bearer t0k");
    }
}
