use std::env;
use std::path::PathBuf;

use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sitebeacon::{ServerConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, honouring RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    // Handle CLI arguments
    let mut config_path: Option<PathBuf> = None;
    let mut args = env::args();
    let _ = args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                config_path = Some(PathBuf::from(path));
            }
            other => {
                anyhow::bail!("Unknown argument '{other}'. Usage: sitebeacon [--config <file>]");
            }
        }
    }

    // Load configuration
    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path),
        None => ServerConfig::from_env(),
    }
    .map_err(|e| anyhow!(e.to_string()))?;
    let address = config.address();

    if config.site_url().is_none() {
        tracing::warn!("SITE_URL is not set; the verification endpoint will be unavailable");
    }

    // Create application state
    let app_state = AppState::new(config)?;
    let app = routes::create_app(app_state);

    // Create listener
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Server listening on {address}");

    // Start server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
