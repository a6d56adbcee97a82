//! Center-crop geometry.
//!
//! The crop box is chosen so that its aspect ratio matches the target's,
//! trimming equal margins from the two edges along the axis where the source
//! is relatively too long. All arithmetic is integral: the ratio comparison
//! is done by cross-multiplication and every division floors, which is exact
//! for the real-valued definition and never drifts by a pixel.

use tf_core::{Error, Result};

use crate::dimensions::TargetDimensions;

/// Pixel rectangle inside a source image, `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Compute the centered crop box of `source_width` x `source_height` whose
/// aspect ratio equals that of `target`.
///
/// Fails with [`Error::CropInfeasible`] when the box would be empty, which
/// happens for tiny sources combined with extreme target ratios.
pub fn center_crop_box(
    source_width: u32,
    source_height: u32,
    target: TargetDimensions,
) -> Result<CropBox> {
    let infeasible = || Error::crop_infeasible((source_width, source_height), target.as_tuple());

    if source_width == 0 || source_height == 0 {
        return Err(infeasible());
    }

    let (sw, sh) = (u64::from(source_width), u64::from(source_height));
    let (tw, th) = (u64::from(target.width()), u64::from(target.height()));

    // sw / sh > tw / th
    let crop = if sw * th > tw * sh {
        // Source is relatively wider: trim left and right.
        let new_width = (sh * tw / th).min(sw);
        let left = (sw - new_width) / 2;
        CropBox {
            left: left as u32,
            top: 0,
            right: (left + new_width) as u32,
            bottom: source_height,
        }
    } else {
        // Source is relatively taller (or equal): trim top and bottom.
        let new_height = (sw * th / tw).min(sh);
        let top = (sh - new_height) / 2;
        CropBox {
            left: 0,
            top: top as u32,
            right: source_width,
            bottom: (top + new_height) as u32,
        }
    };

    if crop.width() == 0 || crop.height() == 0 {
        return Err(infeasible());
    }

    Ok(crop)
}
