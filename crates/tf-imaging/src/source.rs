//! Decoded source images and color-mode normalization.

use std::borrow::Cow;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use tf_core::{Error, Result};

/// Pixel layout of a source image, as far as the thumbnail pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Grayscale,
    GrayscaleAlpha,
    TrueColor,
    TrueColorAlpha,
    /// Palette-based container (PNG color type 3, GIF). The decoder has
    /// already expanded the palette, but the original mode is kept here.
    IndexedPalette,
}

impl ColorMode {
    /// Whether the mode carries transparency or a palette, neither of which
    /// JPEG can represent.
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Grayscale | Self::TrueColor)
    }

    fn detect(data: &[u8], format: Option<ImageFormat>, image: &DynamicImage) -> Self {
        if is_indexed_container(data, format) {
            return Self::IndexedPalette;
        }

        let color = image.color();
        match (color.has_color(), color.has_alpha()) {
            (false, false) => Self::Grayscale,
            (false, true) => Self::GrayscaleAlpha,
            (true, false) => Self::TrueColor,
            (true, true) => Self::TrueColorAlpha,
        }
    }
}

/// PNG stores the color type at byte 25 (signature + IHDR header + width +
/// height + bit depth); 3 means indexed. GIF is always palette-based.
fn is_indexed_container(data: &[u8], format: Option<ImageFormat>) -> bool {
    match format {
        Some(ImageFormat::Png) => {
            data.len() > 25 && &data[12..16] == b"IHDR" && data[25] == 3
        }
        Some(ImageFormat::Gif) => true,
        _ => false,
    }
}

/// A decoded raster together with what is known about its encoding.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
    color_mode: ColorMode,
}

impl SourceImage {
    /// Decode image bytes, sniffing the format from the content.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| Error::Decode(format!("failed to read image header: {e}")))?;

        let Some(format) = reader.format() else {
            return Err(Error::Decode("unrecognized image format".into()));
        };

        let image = reader
            .decode()
            .map_err(|e| Error::Decode(format!("failed to decode {format:?} image: {e}")))?;

        let color_mode = ColorMode::detect(data, Some(format), &image);

        tracing::debug!(
            ?format,
            ?color_mode,
            width = image.width(),
            height = image.height(),
            "Decoded source image"
        );

        Ok(Self {
            image,
            format: Some(format),
            color_mode,
        })
    }

    /// Wrap an already-decoded raster. The format is unknown, so a resize
    /// falls back to PNG.
    pub fn from_image(image: DynamicImage) -> Self {
        let color_mode = ColorMode::detect(&[], None, &image);
        Self {
            image,
            format: None,
            color_mode,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// The raster as 8-bit RGB with no alpha channel.
    ///
    /// Alpha is composited over white; everything else that is not already
    /// 8-bit RGB is converted. 8-bit RGB input is borrowed as-is.
    pub fn normalized(&self) -> Cow<'_, DynamicImage> {
        match &self.image {
            DynamicImage::ImageRgb8(_) => Cow::Borrowed(&self.image),
            img if img.color().has_alpha() => {
                Cow::Owned(DynamicImage::ImageRgb8(flatten_onto_white(&img.to_rgba8())))
            }
            img => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
        }
    }
}

fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let a = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
