//! Router assembly and serving

use crate::cors::cors_layer;
use crate::error::Result;
use crate::handlers::{extract_handler, health_handler, AppState};
use crate::pipeline::Extractor;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Build the application router
pub fn router(extractor: Extractor) -> Router {
    Router::new()
        .route("/api/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer())
        .with_state(AppState::new(extractor))
}

/// Bind `addr` and serve until the process receives Ctrl-C
pub async fn serve(extractor: Extractor, addr: SocketAddr) -> Result<()> {
    let offline = extractor.is_offline();
    let listener = TcpListener::bind(addr).await?;
    info!(
        "Listening on http://{} (offline: {})",
        listener.local_addr()?,
        offline
    );

    axum::serve(listener, router(extractor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
