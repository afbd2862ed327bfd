//! Social Events API - Binary Entry Point
//!
//! Loads configuration, builds the identity verifier, opens the event store
//! and serves the HTTP API until Ctrl+C / SIGTERM.

use std::process::ExitCode;
use std::sync::Arc;

use social_events::api::{create_router, AppState};
use social_events::auth::{IdentityVerifier, JwtVerifier};
use social_events::config::ServerConfig;
use social_events::service::EventService;
use social_events::store::{EventStore, JsonlStore, MemoryStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("social_events=info,tower_http=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::from_env()?;
    let addr = config.bind_addr()?;

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(JwtVerifier::from_config(&config.identity)?);

    // The store must exist before any route becomes reachable
    let store: Arc<dyn EventStore> = match config.store_path {
        Some(ref path) => Arc::new(JsonlStore::open(path)?),
        None => {
            tracing::warn!("EVENTS_STORE_PATH not set; events are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState::new(EventService::new(store), verifier));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, version = social_events::VERSION, "Social Events API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
