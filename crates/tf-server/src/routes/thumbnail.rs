//! Thumbnail generation for files already in the uploads directory.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tf_imaging::{SourceImage, TargetDimensions, DEFAULT_THUMBNAIL_SIZE};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::metrics::record_transform;

/// Thumbnail request payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ThumbnailRequest {
    /// Upload path such as `/uploads/123-photo.png`.
    pub filepath: String,
    #[serde(default = "default_size")]
    #[schema(default = 200)]
    pub width: i64,
    #[serde(default = "default_size")]
    #[schema(default = 200)]
    pub height: i64,
}

fn default_size() -> i64 {
    i64::from(DEFAULT_THUMBNAIL_SIZE)
}

/// Thumbnail response payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ThumbnailResponse {
    /// Public path of the written thumbnail.
    pub thumbnail_path: String,
}

/// POST /generate-thumbnail
#[utoipa::path(
    post,
    path = "/generate-thumbnail",
    request_body = ThumbnailRequest,
    responses(
        (status = 200, description = "Thumbnail written", body = ThumbnailResponse),
        (status = 400, description = "Invalid path, dimensions or image"),
        (status = 404, description = "Source file not found"),
        (status = 422, description = "Crop box would be empty"),
        (status = 500, description = "Thumbnail could not be written")
    )
)]
pub async fn generate_thumbnail(
    State(ctx): State<AppContext>,
    payload: Result<Json<ThumbnailRequest>, JsonRejection>,
) -> Result<Json<ThumbnailResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| tf_core::Error::Validation(e.body_text()))?;

    let dims = TargetDimensions::new(payload.width, payload.height)?;
    let upload = ctx.storage.resolve(&payload.filepath)?;
    let data = ctx.storage.read(&upload).await?;

    tracing::info!(
        file = %upload.file_name,
        width = dims.width(),
        height = dims.height(),
        "Generating thumbnail"
    );

    let storage = ctx.storage.clone();
    let span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        let source = SourceImage::decode(&data)?;
        let thumbnail = tf_imaging::generate_thumbnail(&source, dims)?;
        storage.write_thumbnail(&upload, &thumbnail.output.bytes)
    })
    .await
    .map_err(|e| tf_core::Error::Internal(format!("thumbnail task failed: {e}")))?;

    record_transform("thumbnail", &result);

    Ok(Json(ThumbnailResponse {
        thumbnail_path: result?,
    }))
}
