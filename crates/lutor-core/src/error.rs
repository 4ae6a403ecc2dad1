//! Error types for lutor-core operations.
//!
//! Every LUTor crate wraps [`Error`] in its own error enum, so image
//! validation failures surface unchanged from the LUT, color and preset
//! layers.
//!
//! # Usage
//!
//! ```rust
//! use lutor_core::{Error, Image};
//!
//! let err = Image::new(0, 10).unwrap_err();
//! assert!(matches!(err, Error::InvalidImage(_)));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or combining images.
#[derive(Debug, Error)]
pub enum Error {
    /// Image is empty or its buffer does not match its dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Two images were required to share dimensions but do not.
    ///
    /// Returned when automatic resampling is disabled and an original /
    /// stylized pair has different shapes.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width
        a_width: u32,
        /// First image height
        a_height: u32,
        /// Second image width
        b_width: u32,
        /// Second image height
        b_height: u32,
    },

    /// A numeric parameter is outside its accepted range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Creates an [`Error::InvalidImage`] error.
    #[inline]
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage(reason.into())
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }

    /// Returns `true` for shape mismatches between two images.
    #[inline]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (200, 50));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x50"));
    }

    #[test]
    fn test_kind_predicate() {
        assert!(Error::dimension_mismatch((1, 1), (2, 2)).is_dimension_mismatch());
        assert!(!Error::invalid_parameter("alpha").is_dimension_mismatch());
    }
}
