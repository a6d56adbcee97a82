//! tf-server: HTTP API for image resizing and thumbnail generation.
//!
//! This crate wraps the `tf-imaging` transforms in an Axum server. It provides:
//!
//! - `/resize` for multipart uploads and `/generate-thumbnail` for files in
//!   the uploads directory
//! - request-id spans, permissive CORS and an upload size ceiling
//! - Prometheus metrics and an OpenAPI document
//! - Graceful shutdown via signal handling or a cancellation token

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod storage;

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusHandle;
use tf_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the thumbforge server.
///
/// Builds the [`AppContext`], prepares the uploads directory, binds the
/// configured address and serves until SIGINT/SIGTERM.
pub async fn start(config: Config, metrics: Option<PrometheusHandle>) -> tf_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| tf_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config, metrics);
    ctx.storage.ensure_dirs().await?;
    tracing::info!("Uploads directory: {}", ctx.storage.uploads_dir().display());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| tf_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    serve(listener, ctx, cancel).await
}

/// Serve the router on an already-bound listener until `cancel` fires.
///
/// In-flight requests are drained before this returns.
pub async fn serve(
    listener: tokio::net::TcpListener,
    ctx: AppContext,
    cancel: CancellationToken,
) -> tf_core::Result<()> {
    let addr = listener.local_addr()?;
    let app = router::build_router(ctx);

    tracing::info!(%addr, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
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
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
