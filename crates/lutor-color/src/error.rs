//! Error types for color operations.

use thiserror::Error;

/// Color operation error.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Image validation or shape error from lutor-core.
    #[error(transparent)]
    Image(#[from] lutor_core::Error),

    /// Transfer strength outside `[0, 1]`.
    #[error("invalid strength {0}: expected a value in [0, 1]")]
    InvalidStrength(f32),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
