//! # lutor-core
//!
//! Core types shared by every LUTor crate.
//!
//! - [`Image`] - owned 8-bit RGB raster with immutable dimensions
//! - [`resize`] - separable bilinear resampling used to align image pairs
//! - [`Error`] / [`Result`] - the core error type
//!
//! ## Crate Structure
//!
//! ```text
//! lutor-core (this crate)
//!    ^
//!    +-- lutor-color (LAB, histogram matching)
//!    +-- lutor-lut (LUT building, .cube)
//!    +-- lutor-preset (adjustment estimation, .xmp)
//!    +-- lutor-io (decode / encode)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod resize;

pub use error::{Error, Result};
pub use image::{Image, Rgb8};
