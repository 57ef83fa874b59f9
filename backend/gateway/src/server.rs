//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use folio_agent::ProfileAgent;
use folio_core::ChatModel;

use crate::{ask_api, health_api};

/// Application context shared across routes. Built once at startup.
#[derive(Clone)]
pub struct GatewayState {
    pub agent: Arc<ProfileAgent>,
    /// Used directly by the health probe, without persona or tools.
    pub model: Arc<dyn ChatModel>,
    pub profile_url: Arc<str>,
}

impl GatewayState {
    pub fn new(agent: ProfileAgent, model: Arc<dyn ChatModel>, profile_url: impl Into<String>) -> Self {
        Self {
            agent: Arc::new(agent),
            model,
            profile_url: Arc::from(profile_url.into()),
        }
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_api::home))
        .route("/health", get(health_api::health))
        .route("/ask", post(ask_api::ask))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
