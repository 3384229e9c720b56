//! # Contract Pipeline
//!
//! The strict sequence behind `POST /api/enviar-contrato`:
//!
//! ```text
//! Received → Normalized → Rendered → Submitted → Succeeded
//!                 ↘           ↘           ↘
//!                  Failed      Failed      Failed
//! ```
//!
//! Any failure aborts the remaining stages. Validation happens before the
//! template is touched, and the template is loaded before any network call,
//! so a 400 or a template error never reaches the signing provider.
//!
//! The only state shared between runs is the immutable configuration and the
//! template, loaded on first use and kept for the life of the process.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use relay_core::{
    normalize, ContractTemplate, Escaping, MissingFieldsError, SignerSpec, TemplateLoadError,
};
use relay_signing::{ProviderError, ProviderResponse, SigningProvider};
use tokio::sync::OnceCell;

/// Where a pipeline run is (or stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Normalized,
    Rendered,
    Submitted,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Normalized => "normalized",
            Self::Rendered => "rendered",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline run that ended in `Failed`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    MissingFields(#[from] MissingFieldsError),
    #[error(transparent)]
    TemplateLoad(#[from] TemplateLoadError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl PipelineError {
    /// The stage whose transition failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::MissingFields(_) => PipelineStage::Normalized,
            Self::TemplateLoad(_) => PipelineStage::Rendered,
            Self::Provider(_) => PipelineStage::Submitted,
        }
    }
}

/// Lazily loaded contract template.
///
/// A failed read is not cached: the next request tries the file again.
#[derive(Debug)]
pub struct TemplateStore {
    path: PathBuf,
    cell: OnceCell<ContractTemplate>,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// The template, reading it from disk on first use.
    pub async fn get(&self) -> Result<&ContractTemplate, TemplateLoadError> {
        self.cell
            .get_or_try_init(|| async {
                match tokio::fs::read_to_string(&self.path).await {
                    Ok(source) => {
                        tracing::info!(path = %self.path.display(), bytes = source.len(), "contract template loaded");
                        Ok(ContractTemplate::new(source))
                    }
                    Err(source) => Err(TemplateLoadError {
                        path: self.path.clone(),
                        source,
                    }),
                }
            })
            .await
    }
}

/// Normalize, render, submit.
pub struct ContractPipeline {
    provider: Arc<dyn SigningProvider>,
    templates: TemplateStore,
    counter_signer: SignerSpec,
    escaping: Escaping,
}

impl ContractPipeline {
    pub fn new(
        provider: Arc<dyn SigningProvider>,
        templates: TemplateStore,
        counter_signer: SignerSpec,
        escaping: Escaping,
    ) -> Self {
        Self {
            provider,
            templates,
            counter_signer,
            escaping,
        }
    }

    /// Run one contract request through every stage.
    ///
    /// `content_type` is the raw `Content-Type` header; `body` the raw bytes.
    /// Makes at most one provider call.
    pub async fn run(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<ProviderResponse, PipelineError> {
        tracing::debug!(stage = %PipelineStage::Received, bytes = body.len(), content_type, "contract request received");

        let request = normalize(content_type, body)?;
        tracing::debug!(stage = %PipelineStage::Normalized, unlock_type = request.unlock_type(), "contract request normalized");

        let template = self.templates.get().await?;
        let document = template.render(&request, self.escaping);
        tracing::debug!(stage = %PipelineStage::Rendered, document = document.name(), "contract rendered");

        let signers = SignerSpec::pair_for(&request, &self.counter_signer);
        let response = self.provider.submit(&document, &signers).await?;
        tracing::debug!(stage = %PipelineStage::Submitted, provider = %self.provider.variant(), "contract accepted by signing provider");

        Ok(response)
    }
}

impl fmt::Debug for ContractPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractPipeline")
            .field("provider", &self.provider.variant())
            .field("templates", &self.templates)
            .field("counter_signer", &self.counter_signer)
            .field("escaping", &self.escaping)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::LogicalField;

    #[tokio::test]
    async fn template_store_reads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.html");
        std::fs::write(&path, "<p>{{NOME_CLIENTE}}</p>").unwrap();

        let store = TemplateStore::new(&path);
        assert_eq!(store.get().await.unwrap().source(), "<p>{{NOME_CLIENTE}}</p>");

        std::fs::write(&path, "changed").unwrap();
        assert_eq!(store.get().await.unwrap().source(), "<p>{{NOME_CLIENTE}}</p>");
    }

    #[tokio::test]
    async fn template_load_failure_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.html");

        let store = TemplateStore::new(&path);
        let err = store.get().await.unwrap_err();
        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);

        std::fs::write(&path, "ok").unwrap();
        assert_eq!(store.get().await.unwrap().source(), "ok");
    }

    #[test]
    fn failure_stage_per_error() {
        let missing = PipelineError::from(MissingFieldsError {
            missing: vec![LogicalField::Email],
            received: Default::default(),
            content_type: None,
        });
        assert_eq!(missing.stage(), PipelineStage::Normalized);

        let template = PipelineError::from(TemplateLoadError {
            path: "contract.html".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(template.stage(), PipelineStage::Rendered);

        let provider = PipelineError::from(ProviderError::Timeout {
            endpoint: "http://x/v2/documents".into(),
            timeout_secs: 30,
        });
        assert_eq!(provider.stage(), PipelineStage::Submitted);
        assert_eq!(provider.stage().to_string(), "submitted");
    }
}
