//! Unified error type for thumbforge.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in thumbforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes are not a recognized or valid image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Requested width/height is non-positive, above the maximum, or would
    /// produce an undefined aspect ratio.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The center-crop box degenerated to zero width or height.
    #[error("Crop infeasible: {source_width}x{source_height} cannot be cropped to {target_width}x{target_height}")]
    CropInfeasible {
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
    },

    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "file").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body exceeded the configured ceiling.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The encoder rejected the raster.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Decode(_) => 400,
            Error::InvalidDimensions(_) => 400,
            Error::CropInfeasible { .. } => 422,
            Error::NotFound { .. } => 404,
            Error::Validation(_) => 400,
            Error::PayloadTooLarge(_) => 413,
            Error::Io { .. } => 500,
            Error::Encode(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Decode(_) => "decode_error",
            Error::InvalidDimensions(_) => "invalid_dimensions",
            Error::CropInfeasible { .. } => "crop_infeasible",
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::PayloadTooLarge(_) => "payload_too_large",
            Error::Io { .. } => "io_error",
            Error::Encode(_) => "encode_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::CropInfeasible`].
    pub fn crop_infeasible(source: (u32, u32), target: (u32, u32)) -> Self {
        Error::CropInfeasible {
            source_width: source.0,
            source_height: source.1,
            target_width: target.0,
            target_height: target.1,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
