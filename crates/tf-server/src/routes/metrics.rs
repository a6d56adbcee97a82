//! Prometheus metrics endpoint and transform counters.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::context::AppContext;

/// Counter incremented once per transform request, labelled by kind and outcome.
pub const TRANSFORMS_TOTAL: &str = "thumbforge_transforms_total";

/// Record the outcome of a resize or thumbnail request.
pub fn record_transform<T, E>(kind: &'static str, result: &Result<T, E>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!(TRANSFORMS_TOTAL, "kind" => kind, "outcome" => outcome).increment(1);
}

/// GET /metrics -- Prometheus-format metrics.
pub async fn metrics_handler(State(ctx): State<AppContext>) -> impl IntoResponse {
    // The recorder is installed by the binary at startup; tests run without one.
    let body = ctx
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
