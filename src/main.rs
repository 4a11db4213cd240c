//! hf-relay - pass-through proxy for the Hugging Face Inference API
//!
//! This is the main entry point for the relay server.

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};

use hf_relay::{config::Config, routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hf_relay=info,tower_http=info".into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting hf-relay");

    let config = Config::from_env()?;
    info!(
        allowed_origins = ?config.allowed_origins,
        "Configuration loaded successfully"
    );

    if config.credential.is_none() {
        warn!("HUGGINGFACE_API_KEY (or HF_TOKEN) is not set. Requests will fail without a valid key.");
    }

    routes::metrics::init_metrics();
    info!("Metrics initialized");

    let state = Arc::new(AppState::new(config.clone())?);
    let target = state.upstream.target();

    let app = routes::create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "HF relay listening on http://{} (proxying {} -> {})",
        addr, config.route_prefix, target
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("hf-relay shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown");
        }
    }
}
