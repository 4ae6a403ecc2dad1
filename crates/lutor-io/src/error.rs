//! Error types for image I/O.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Extension outside the supported set.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File could not be decoded as an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Image could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Decoded raster is not a valid [`lutor_core::Image`].
    #[error(transparent)]
    Image(#[from] lutor_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
