//! Center-crop thumbnails.
//!
//! The pipeline is a single pass with no intermediate state worth keeping:
//!
//! 1. flatten alpha/palette sources to 8-bit RGB,
//! 2. compute the centered crop matching the target aspect ratio,
//! 3. crop and resample to the exact target size with Lanczos3,
//! 4. encode as JPEG at [`JPEG_QUALITY`].
//!
//! Any failure aborts the whole operation.

use image::imageops::FilterType;
use tf_core::Result;

use crate::crop::{center_crop_box, CropBox};
use crate::dimensions::TargetDimensions;
use crate::encode::{self, OutputImage};
use crate::source::SourceImage;

/// JPEG quality used for every thumbnail.
pub const JPEG_QUALITY: u8 = 80;

/// An encoded thumbnail and the region of the source it was cut from.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub output: OutputImage,
    pub crop: CropBox,
}

/// Produce a `dims`-sized JPEG thumbnail of `source`.
pub fn generate_thumbnail(source: &SourceImage, dims: TargetDimensions) -> Result<Thumbnail> {
    let flat = source.normalized();
    let crop = center_crop_box(flat.width(), flat.height(), dims)?;

    tracing::debug!(
        color_mode = ?source.color_mode(),
        ?crop,
        width = dims.width(),
        height = dims.height(),
        "Generating thumbnail"
    );

    let resized = flat
        .crop_imm(crop.left, crop.top, crop.width(), crop.height())
        .resize_exact(dims.width(), dims.height(), FilterType::Lanczos3);

    let output = encode::encode_jpeg(&resized.into_rgb8(), JPEG_QUALITY)?;

    Ok(Thumbnail { output, crop })
}

/// Decode `data` and [`generate_thumbnail`] from it.
pub fn generate_thumbnail_bytes(data: &[u8], width: u32, height: u32) -> Result<Thumbnail> {
    let dims = TargetDimensions::try_from((width, height))?;
    let source = SourceImage::decode(data)?;
    generate_thumbnail(&source, dims)
}
