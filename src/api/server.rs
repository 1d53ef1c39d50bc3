//! HTTP server lifecycle: bind, serve, log the bound address.

use std::net::SocketAddr;

use axum::Router;

/// Bind and run the server until the process exits.
pub async fn serve(router: Router, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router).await
}
