//! Upload-and-resize endpoint.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tf_imaging::{SourceImage, TargetDimensions};

use crate::error::AppError;
use crate::routes::metrics::record_transform;

/// Query parameters for `/resize`. Both are required.
#[derive(Debug, Deserialize)]
pub struct ResizeQuery {
    pub width: i64,
    pub height: i64,
}

/// Multipart body for `/resize` (documentation only).
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ResizeForm {
    /// The image to resize.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// POST /resize?width=W&height=H
#[utoipa::path(
    post,
    path = "/resize",
    params(
        ("width" = i64, Query, description = "Target width in pixels (1-4096)"),
        ("height" = i64, Query, description = "Target height in pixels (1-4096)")
    ),
    request_body(content = ResizeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Resized image in the source format (PNG if unknown)"),
        (status = 400, description = "Invalid dimensions, missing file or undecodable image"),
        (status = 413, description = "Upload exceeds the size limit")
    )
)]
pub async fn resize(
    query: Result<Query<ResizeQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| tf_core::Error::Validation(e.body_text()))?;
    let dims = TargetDimensions::new(query.width, query.height)?;

    let mut multipart = multipart.map_err(|e| tf_core::Error::Validation(e.body_text()))?;
    let (filename, data) = read_file_field(&mut multipart).await?;

    let span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        let source = SourceImage::decode(&data)?;
        tracing::info!(
            filename = filename.as_deref().unwrap_or("<unnamed>"),
            original_size = ?(source.width(), source.height()),
            target_size = ?dims.as_tuple(),
            "resizing image"
        );
        tf_imaging::resize(&source, dims)
    })
    .await
    .map_err(|e| tf_core::Error::Internal(format!("resize task failed: {e}")))?;

    record_transform("resize", &result);
    let output = result?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, output.media_type())],
        output.bytes,
    )
        .into_response())
}

/// Pull the first file-carrying field (or the field named `file`) out of the
/// form, returning its client-side file name and bytes.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<(Option<String>, axum::body::Bytes), tf_core::Error> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") || field.file_name().is_some() {
            let filename = field.file_name().map(str::to_owned);
            let data = field.bytes().await.map_err(multipart_error)?;
            return Ok((filename, data));
        }
    }

    Err(tf_core::Error::Validation(
        "multipart form has no file field".into(),
    ))
}

fn multipart_error(e: MultipartError) -> tf_core::Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tf_core::Error::PayloadTooLarge(e.body_text())
    } else {
        tf_core::Error::Validation(e.body_text())
    }
}
