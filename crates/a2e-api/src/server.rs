//! HTTP server bootstrap

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;

use crate::routes::api_router;
use crate::state::AppState;

/// Bind and serve the full API (provider + platform surfaces).
///
/// Runs until the task is cancelled or the listener fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let router = api_router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "A2E API listening");
    axum::serve(listener, router).await
}
