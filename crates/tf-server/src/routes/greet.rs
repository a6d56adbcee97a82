//! Demonstration endpoint for typed JSON request/response handling.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Greet request payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GreetRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Greet response payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GreetResponse {
    pub message: String,
}

/// POST /greet
#[utoipa::path(
    post,
    path = "/greet",
    request_body = GreetRequest,
    responses(
        (status = 200, description = "Greeting", body = GreetResponse),
        (status = 400, description = "Missing or blank name")
    )
)]
pub async fn greet(
    payload: Result<Json<GreetRequest>, JsonRejection>,
) -> Result<Json<GreetResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| tf_core::Error::Validation(e.body_text()))?;

    let first = payload.first_name.trim();
    let last = payload.last_name.trim();
    if first.is_empty() || last.is_empty() {
        return Err(
            tf_core::Error::Validation("first_name and last_name must not be blank".into()).into(),
        );
    }

    Ok(Json(GreetResponse {
        message: format!("Hello, {first} {last}!"),
    }))
}
