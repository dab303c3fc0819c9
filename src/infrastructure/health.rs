//! # Liveness Endpoint
//!
//! Minimal HTTP server for external uptime monitors: `GET /` answers 200.

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;

pub async fn serve(port: u16) -> Result<()> {
    let app = Router::new().route("/", get(|| async { "OK" }));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Liveness endpoint listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
