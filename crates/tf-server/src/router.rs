//! Axum router construction.
//!
//! Builds the full application router with all routes, the OpenAPI document
//! and the middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "Image Resize Service"),
    paths(
        routes::health::hi,
        routes::health::health_check,
        routes::greet::greet,
        routes::resize::resize,
        routes::thumbnail::generate_thumbnail,
    ),
    components(schemas(
        routes::health::HiResponse,
        routes::health::HealthResponse,
        routes::greet::GreetRequest,
        routes::greet::GreetResponse,
        routes::resize::ResizeForm,
        routes::thumbnail::ThumbnailRequest,
        routes::thumbnail::ThumbnailResponse,
    ))
)]
struct ApiDoc;

/// GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = ctx.config.server.max_upload_bytes;

    Router::new()
        .route("/hi", get(routes::health::hi))
        .route("/health", get(routes::health::health_check))
        .route("/greet", post(routes::greet::greet))
        .route("/resize", post(routes::resize::resize))
        .route(
            "/generate-thumbnail",
            post(routes::thumbnail::generate_thumbnail),
        )
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
