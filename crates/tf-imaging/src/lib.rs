//! tf-imaging: pure image transforms.
//!
//! Two pipelines live here, both free of I/O and shared state:
//!
//! - [`resize()`]: exact, non-aspect-preserving Lanczos resize that re-encodes
//!   in the source format (PNG when the format is unknown or unwritable).
//! - [`generate_thumbnail`]: color-mode normalization, center crop to the
//!   target aspect ratio, Lanczos resize and JPEG encoding at a fixed quality.
//!
//! All failures are reported as [`tf_core::Error`].

pub mod crop;
pub mod dimensions;
pub mod encode;
pub mod resize;
pub mod source;
pub mod thumbnail;

pub use crop::{center_crop_box, CropBox};
pub use dimensions::{TargetDimensions, DEFAULT_THUMBNAIL_SIZE, MAX_DIMENSION};
pub use encode::OutputImage;
pub use resize::{resize, resize_bytes};
pub use source::{ColorMode, SourceImage};
pub use thumbnail::{generate_thumbnail, generate_thumbnail_bytes, Thumbnail, JPEG_QUALITY};
