//! Error types for the encoder and its bitmap reader.

use thiserror::Error;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a raster or encoding it.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding was requested before a raster was loaded
    #[error("No raster loaded")]
    NotLoaded,

    /// Width or height is zero
    #[error("Empty image: width ({width}) and height ({height}) must be non-zero")]
    EmptyImage { width: u32, height: u32 },

    /// Width or height is not a multiple of 8
    #[error("Invalid dimensions: {width}x{height} (both must be multiples of 8)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Dimensions do not fit the 16-bit SOF0 fields
    #[error("Image too large: {width}x{height} (maximum 65535 per side)")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// Pixel buffer length doesn't match `width * height * 3`
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// The bitmap header was rejected
    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),

    /// The source or sink could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a bitmap header is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    #[error("not a bitmap (magic {0:#06x})")]
    BadMagic(u16),

    #[error("negative width {0}")]
    NegativeWidth(i32),

    #[error("unsupported format: {bit_count} bits per pixel, compression {compression} (need 24-bit uncompressed)")]
    UnsupportedFormat { bit_count: u16, compression: u32 },
}
