//! Tokio/axum server wiring.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::HttpConfig;
use crate::core::{AppResult, UserService, UserStore};

use super::api::router;

/// Bind to the configured address and serve until ctrl-c.
pub async fn serve<S: UserStore + 'static>(
    cfg: &HttpConfig,
    service: Arc<UserService<S>>,
) -> AppResult<()> {
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind user service to {addr}"))?;
    tracing::info!("user service listening on {addr}");
    serve_listener(listener, service, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_listener<S, F>(
    listener: TcpListener,
    service: Arc<UserService<S>>,
    shutdown: F,
) -> AppResult<()>
where
    S: UserStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("user service server error")?;
    tracing::info!("user service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
