//! HTTP boundary
//!
//! Thin routing layer over the image service: path/query parsing,
//! validation, and status-code mapping live here so the core stays
//! transport-free.

pub mod routes;

pub use routes::{router, AppState};

use crate::error::{ImgcacheError, ImgcacheResult};
use tracing::info;

/// Bind and serve the HTTP API until interrupted
pub async fn serve(bind: &str, state: AppState) -> ImgcacheResult<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| ImgcacheError::io(format!("binding {bind}"), e))?;
    let addr = listener
        .local_addr()
        .map_err(|e| ImgcacheError::io("reading local address", e))?;
    info!(%addr, "imgcache listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ImgcacheError::io("serving HTTP", e))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
