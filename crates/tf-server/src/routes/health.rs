//! Liveness probes.

use axum::Json;
use serde::Serialize;

/// Fixed greeting returned by `/hi`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HiResponse {
    pub message: String,
}

/// Health check payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /hi
///
/// Also emits one event per severity so log shipping can be verified end to
/// end.
#[utoipa::path(
    get,
    path = "/hi",
    responses((status = 200, description = "Service is running", body = HiResponse))
)]
pub async fn hi() -> Json<HiResponse> {
    tracing::trace!(number = 0, "trace message");
    tracing::debug!(number = 1, "debug message");
    tracing::info!(number = 2, "info message");
    tracing::warn!(number = 3, "warning message");
    tracing::error!(number = 4, "error message");
    tracing::error!(severity = "critical", number = 5, "critical message");

    Json(HiResponse {
        message: "Hello, World!".into(),
    })
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
