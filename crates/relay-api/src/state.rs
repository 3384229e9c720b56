//! # Application State
//!
//! Configuration read once at startup, and the shared state handed to route
//! handlers through the `State` extractor.
//!
//! Nothing here is mutable after startup. The contract template is the one
//! lazily filled slot, and it lives inside the pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use relay_core::template::TEMPLATE_PATH;
use relay_core::{Escaping, SignerSpec};
use relay_signing::{SigningConfig, SigningProvider};

use crate::pipeline::{ContractPipeline, TemplateStore};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Counter-signer display name used when `COUNTER_SIGNER_NAME` is unset.
pub const DEFAULT_COUNTER_SIGNER_NAME: &str = "Contratada";

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// No cross-origin callers.
    #[default]
    SameOrigin,
    /// Any origin (`*`).
    Any,
    /// An explicit allow-list.
    List(Vec<HeaderValue>),
}

impl CorsPolicy {
    /// Parse `ALLOWED_ORIGINS`: empty, `*`, or a comma-separated list.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() {
            return Ok(Self::SameOrigin);
        }
        if origins.contains(&"*") {
            return Ok(Self::Any);
        }

        origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }
}

/// Application configuration.
///
/// `Debug` is safe to log: the signing token is redacted by
/// [`SigningConfig`]'s own implementation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Signing-provider variant, endpoint, credentials, timeout.
    pub signing: SigningConfig,
    /// Second signer on every document.
    pub counter_signer: SignerSpec,
    pub allowed_origins: CorsPolicy,
    /// How client values are embedded into the template.
    pub escaping: Escaping,
    /// Contract template location, absolute once the working directory is
    /// known. Not read from the environment.
    pub template_path: PathBuf,
}

/// Anchor the template path to `base`, the working directory at startup.
///
/// An absolute path is returned unchanged.
pub fn resolve_template_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails closed: `SIGNING_API_TOKEN` and `COUNTER_SIGNER_EMAIL` are
    /// required, and malformed values are errors rather than defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match present("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let signing = SigningConfig::from_lookup(&lookup)?;

        let counter_email = present("COUNTER_SIGNER_EMAIL")
            .map(|e| e.trim().to_string())
            .ok_or(ConfigError::MissingCounterSigner)?;
        let counter_name = present("COUNTER_SIGNER_NAME")
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| DEFAULT_COUNTER_SIGNER_NAME.to_string());

        let allowed_origins = CorsPolicy::parse(&present("ALLOWED_ORIGINS").unwrap_or_default())?;

        let escaping = match present("TEMPLATE_ESCAPE_HTML") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Escaping::Html,
                "false" | "0" | "no" => Escaping::Raw,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        var: "TEMPLATE_ESCAPE_HTML",
                        value: raw,
                    })
                }
            },
            None => Escaping::Html,
        };

        // Resolved now so a later chdir cannot move the template.
        let template_path = match std::env::current_dir() {
            Ok(cwd) => resolve_template_path(&cwd, Path::new(TEMPLATE_PATH)),
            Err(err) => {
                tracing::warn!(error = %err, "working directory unavailable; template path left relative");
                PathBuf::from(TEMPLATE_PATH)
            }
        };

        Ok(Self {
            port,
            signing,
            counter_signer: SignerSpec::signer(counter_name, counter_email),
            allowed_origins,
            escaping,
            template_path,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Signing(#[from] relay_signing::config::ConfigError),
    #[error("COUNTER_SIGNER_EMAIL environment variable is required")]
    MissingCounterSigner,
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
    #[error("invalid origin in ALLOWED_ORIGINS: {0:?}")]
    InvalidOrigin(String),
    #[error("invalid {var} {value:?}: expected true or false")]
    InvalidFlag { var: &'static str, value: String },
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ContractPipeline>,
}

impl AppState {
    /// Wire the pipeline from configuration and a provider.
    ///
    /// The provider is passed in rather than built here so tests can
    /// substitute a fake.
    pub fn new(config: AppConfig, provider: Arc<dyn SigningProvider>) -> Self {
        let pipeline = ContractPipeline::new(
            provider,
            TemplateStore::new(config.template_path.clone()),
            config.counter_signer.clone(),
            config.escaping,
        );
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}
