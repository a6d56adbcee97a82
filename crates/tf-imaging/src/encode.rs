//! Encoding rasters back into bytes.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbImage};
use tf_core::{Error, Result};

/// Format used when the source format is unknown or cannot be written.
pub const FALLBACK_FORMAT: ImageFormat = ImageFormat::Png;

/// Encoded image bytes plus the format they are in.
#[derive(Debug, Clone)]
pub struct OutputImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl OutputImage {
    /// `Content-Type` value for the encoded bytes: `image/` followed by the
    /// lowercase format name, e.g. `image/png` or `image/ico`.
    pub fn media_type(&self) -> String {
        format!("image/{:?}", self.format).to_lowercase()
    }
}

/// Pick the output format for a resize: the source format when the encoder
/// for it is compiled in, otherwise PNG.
pub fn output_format_for(source: Option<ImageFormat>) -> ImageFormat {
    match source {
        Some(format) if format.writing_enabled() => format,
        _ => FALLBACK_FORMAT,
    }
}

/// Encode `image` in the format chosen by [`output_format_for`].
///
/// If that encoder rejects the raster (a color type it cannot store, a size
/// limit), the image is written as PNG instead so the caller still gets a
/// usable result.
pub fn encode_preserving(image: &DynamicImage, source: Option<ImageFormat>) -> Result<OutputImage> {
    let format = output_format_for(source);
    match encode(image, format) {
        Err(e) if format != FALLBACK_FORMAT => {
            tracing::debug!(?format, error = %e, "Encoder rejected raster; falling back to PNG");
            encode(image, FALLBACK_FORMAT)
        }
        other => other,
    }
}

/// Encode an RGB raster as baseline JPEG at `quality` (1-100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<OutputImage> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| Error::Encode(format!("JPEG encoding failed: {e}")))?;

    Ok(OutputImage {
        bytes,
        format: ImageFormat::Jpeg,
    })
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<OutputImage> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .map_err(|e| Error::Encode(format!("{format:?} encoding failed: {e}")))?;

    Ok(OutputImage {
        bytes: buf.into_inner(),
        format,
    })
}
