//! Preset error types.

use thiserror::Error;

/// Result type for preset operations.
pub type PresetResult<T> = Result<T, PresetError>;

/// Errors from adjustment estimation and XMP handling.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Image validation or resampling failed.
    #[error(transparent)]
    Image(#[from] lutor_core::Error),

    /// Malformed or foreign XMP document.
    #[error("parse error: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
