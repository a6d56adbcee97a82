//! Exact resize with no cropping.

use image::imageops::FilterType;
use tf_core::Result;

use crate::dimensions::TargetDimensions;
use crate::encode::{self, OutputImage};
use crate::source::SourceImage;

/// Resample `source` to exactly `dims`, ignoring aspect ratio.
///
/// The result is encoded in the source format when possible, PNG otherwise.
pub fn resize(source: &SourceImage, dims: TargetDimensions) -> Result<OutputImage> {
    let (width, height) = dims.as_tuple();
    tracing::debug!(
        from_width = source.width(),
        from_height = source.height(),
        width,
        height,
        "Resizing image"
    );

    let resized = source
        .image()
        .resize_exact(width, height, FilterType::Lanczos3);

    encode::encode_preserving(&resized, source.format())
}

/// Decode `data` and [`resize`] it.
///
/// Dimensions are validated here as well, since this entry point can be
/// called without going through the request boundary.
pub fn resize_bytes(data: &[u8], width: u32, height: u32) -> Result<OutputImage> {
    let dims = TargetDimensions::try_from((width, height))?;
    let source = SourceImage::decode(data)?;
    resize(&source, dims)
}
