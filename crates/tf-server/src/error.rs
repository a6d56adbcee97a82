//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`tf_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core results directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: tf_core::Error,
}

impl AppError {
    pub fn new(inner: tf_core::Error) -> Self {
        Self { inner }
    }
}

impl From<tf_core::Error> for AppError {
    fn from(e: tf_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Rejected request");
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
