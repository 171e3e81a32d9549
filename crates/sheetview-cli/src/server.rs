//! HTTP server exposing the rendered worksheet.
//!
//! One route: `GET /` returns the full HTML page. The page is built before
//! the server starts and never changes afterwards.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::render::TablePage;

/// Build the router serving `page`
pub fn router(page: Arc<TablePage>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .layer(TraceLayer::new_for_http())
        .with_state(page)
}

async fn handle_index(State(page): State<Arc<TablePage>>) -> Html<String> {
    Html(page.to_html())
}

/// Bind `addr` and serve `page` until SIGINT or SIGTERM
pub async fn serve(page: Arc<TablePage>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(page))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => tokio::select! {
                _ = sigint.recv() => info!(signal = "SIGINT", "shutdown signal"),
                _ = sigterm.recv() => info!(signal = "SIGTERM", "shutdown signal"),
            },
            _ => {
                warn!("cannot install signal handlers, running until killed");
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("cannot install Ctrl+C handler, running until killed");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal");
    }
}
