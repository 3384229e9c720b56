//! Signing-provider configuration.
//!
//! Read once at startup. There are no embedded credentials: without
//! `SIGNING_API_TOKEN` the configuration does not load.

use std::fmt;
use std::str::FromStr;

use url::Url;
use zeroize::Zeroizing;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which provider API this deployment talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderVariant {
    /// REST v2 `documents` endpoint, JSON body with `content_base64`.
    RestV2,
    /// GraphQL v2 `createDocument` mutation with a nested file object.
    GraphqlV2,
    /// Alternate REST schema on a `docs/` endpoint, token header auth.
    DocsApi,
}

impl ProviderVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RestV2 => "rest",
            Self::GraphqlV2 => "graphql",
            Self::DocsApi => "docs",
        }
    }

    /// Production base URL, when the variant has a well-known one.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::RestV2 | Self::GraphqlV2 => Some("https://api.autentique.com.br"),
            Self::DocsApi => None,
        }
    }
}

impl fmt::Display for ProviderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" | "rest-v2" | "rest_v2" => Ok(Self::RestV2),
            "graphql" | "graphql-v2" | "graphql_v2" => Ok(Self::GraphqlV2),
            "docs" => Ok(Self::DocsApi),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// Configuration for the signing-provider client.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct SigningConfig {
    /// Active provider schema.
    pub variant: ProviderVariant,
    /// Provider base URL; the schema appends its endpoint path.
    pub base_url: Url,
    /// API key or token. Zeroized on drop.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("variant", &self.variant)
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SigningConfig {
    /// Explicit construction with the default timeout.
    pub fn new(variant: ProviderVariant, base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            variant,
            base_url,
            api_token: Zeroizing::new(api_token.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SIGNING_PROVIDER`: `rest` (default), `graphql` or `docs`
    /// - `SIGNING_API_TOKEN` (required)
    /// - `SIGNING_BASE_URL` (default per variant; required for `docs`)
    /// - `SIGNING_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let variant = match present("SIGNING_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => ProviderVariant::RestV2,
        };

        let api_token = present("SIGNING_API_TOKEN")
            .map(|t| Zeroizing::new(t.trim().to_string()))
            .ok_or(ConfigError::MissingToken)?;

        let raw_url = match present("SIGNING_BASE_URL") {
            Some(url) => url,
            None => variant
                .default_base_url()
                .ok_or(ConfigError::MissingBaseUrl(variant))?
                .to_string(),
        };
        let base_url = Url::parse(raw_url.trim())
            .map_err(|e| ConfigError::InvalidUrl("SIGNING_BASE_URL".to_string(), e.to_string()))?;

        let timeout_secs = match present("SIGNING_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            variant,
            base_url,
            api_token,
            timeout_secs,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SIGNING_API_TOKEN environment variable is required")]
    MissingToken,
    #[error("SIGNING_API_TOKEN contains characters not allowed in an HTTP header")]
    InvalidToken,
    #[error("SIGNING_BASE_URL is required for the {0} provider")]
    MissingBaseUrl(ProviderVariant),
    #[error("unknown SIGNING_PROVIDER {0:?}: expected rest, graphql or docs")]
    UnknownProvider(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid SIGNING_TIMEOUT_SECS {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn defaults_to_rest_with_production_url() {
        let cfg = SigningConfig::from_lookup(lookup(&[("SIGNING_API_TOKEN", "tok")])).unwrap();
        assert_eq!(cfg.variant, ProviderVariant::RestV2);
        assert_eq!(cfg.base_url.as_str(), "https://api.autentique.com.br/");
        assert_eq!(cfg.api_token.as_str(), "tok");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn missing_token_fails_closed() {
        let err = SigningConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));

        let err = SigningConfig::from_lookup(lookup(&[("SIGNING_API_TOKEN", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn docs_variant_requires_base_url() {
        let err = SigningConfig::from_lookup(lookup(&[
            ("SIGNING_PROVIDER", "docs"),
            ("SIGNING_API_TOKEN", "tok"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl(ProviderVariant::DocsApi)));

        let cfg = SigningConfig::from_lookup(lookup(&[
            ("SIGNING_PROVIDER", "docs"),
            ("SIGNING_API_TOKEN", "tok"),
            ("SIGNING_BASE_URL", "https://sign.example.com"),
        ]))
        .unwrap();
        assert_eq!(cfg.variant, ProviderVariant::DocsApi);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!("GraphQL".parse::<ProviderVariant>().unwrap(), ProviderVariant::GraphqlV2);
        assert_eq!(" rest-v2 ".parse::<ProviderVariant>().unwrap(), ProviderVariant::RestV2);
        assert!(matches!(
            "soap".parse::<ProviderVariant>(),
            Err(ConfigError::UnknownProvider(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SigningConfig::from_lookup(lookup(&[
            ("SIGNING_API_TOKEN", "tok"),
            ("SIGNING_BASE_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(..)));

        for bad in ["0", "-1", "soon"] {
            let err = SigningConfig::from_lookup(lookup(&[
                ("SIGNING_API_TOKEN", "tok"),
                ("SIGNING_TIMEOUT_SECS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout(_)), "value {bad}");
        }
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = SigningConfig::new(
            ProviderVariant::RestV2,
            "https://api.example.com".parse().unwrap(),
            "super-secret",
        );
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
