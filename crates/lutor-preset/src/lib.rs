//! # lutor-preset
//!
//! Parametric Camera Raw presets from a before/after image pair.
//!
//! Where `lutor-lut` captures a look as a dense table, this crate reduces it
//! to seven global sliders (exposure, highlights, shadows, vibrance,
//! saturation, temperature, tint) that Lightroom and Camera Raw can load as
//! an `.xmp` preset.
//!
//! # Example
//!
//! ```rust
//! use lutor_core::Image;
//! use lutor_preset::{estimate, xmp};
//!
//! let original = Image::filled(16, 16, [90, 90, 90]).unwrap();
//! let stylized = Image::filled(16, 16, [140, 120, 90]).unwrap();
//!
//! let adj = estimate(&original, &stylized).unwrap();
//! assert!(adj.exposure > 0.0);
//! assert!(xmp::encode(&adj).contains("<crs:HasSettings>True</crs:HasSettings>"));
//! ```

#![warn(missing_docs)]

mod adjustments;
mod error;
pub mod xmp;

pub use adjustments::{estimate, AdjustmentSet};
pub use error::{PresetError, PresetResult};
pub use xmp::{encode, parse_xmp, read_xmp, write_xmp, write_xmp_to};
