//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Invalid builder option (sample cap, neighbor count).
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The image pair produced no color correspondences.
    ///
    /// Only returned by strict builds; otherwise the identity LUT is used.
    #[error("degenerate mapping: no color correspondences to interpolate")]
    DegenerateMapping,

    /// Parse error when loading LUT files.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Image validation or shape error.
    #[error(transparent)]
    Image(#[from] lutor_core::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
