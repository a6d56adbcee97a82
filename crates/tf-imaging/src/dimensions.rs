//! Validated target dimensions.

use tf_core::{Error, Result};

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 4096;

/// Width and height used for thumbnails when the caller omits them.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;

/// A width/height pair known to lie within `1..=MAX_DIMENSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetDimensions {
    width: u32,
    height: u32,
}

impl TargetDimensions {
    /// Validate a signed width/height pair, as received from a request.
    pub fn new(width: i64, height: i64) -> Result<Self> {
        Ok(Self {
            width: check_axis("width", width)?,
            height: check_axis("height", height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for TargetDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_THUMBNAIL_SIZE,
            height: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl TryFrom<(u32, u32)> for TargetDimensions {
    type Error = Error;

    fn try_from((width, height): (u32, u32)) -> Result<Self> {
        Self::new(width.into(), height.into())
    }
}

fn check_axis(axis: &str, value: i64) -> Result<u32> {
    if value <= 0 || value > i64::from(MAX_DIMENSION) {
        return Err(Error::InvalidDimensions(format!(
            "{axis} must be between 1 and {MAX_DIMENSION}, got {value}"
        )));
    }
    // In range, so the cast cannot truncate.
    Ok(value as u32)
}
