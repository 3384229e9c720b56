//! # relay-api -- Binary Entry Point
//!
//! Starts the Axum HTTP server for the contract relay.
//! Binds to configurable port (default 3000).

use std::sync::Arc;

use relay_api::state::{AppConfig, AppState};
use relay_signing::HttpSigningProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration invalid: {e}");
        e
    })?;
    tracing::info!(?config, "configuration loaded");

    let provider = HttpSigningProvider::new(config.signing.clone()).map_err(|e| {
        tracing::error!("Failed to create signing provider client: {e}");
        e
    })?;
    tracing::info!(
        provider = %config.signing.variant,
        endpoint = provider.endpoint(),
        "signing provider configured"
    );

    if !config.template_path.is_file() {
        tracing::warn!(
            path = %config.template_path.display(),
            "contract template not found; contract requests will fail until it exists"
        );
    }

    let port = config.port;
    let state = AppState::new(config, Arc::new(provider));
    let app = relay_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Contract relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
