//! # lutor-color
//!
//! Color science for LUTor.
//!
//! - [`srgb`] - sRGB transfer curve (IEC 61966-2-1)
//! - [`lab`] - RGB <-> CIE LAB in the 8-bit packed convention
//! - [`histogram`] - per-channel CDF histogram matching and strength-blended
//!   color transfer
//!
//! # Example
//!
//! ```rust
//! use lutor_core::Image;
//! use lutor_color::{lab, histogram};
//!
//! let img = Image::filled(8, 8, [200, 120, 40]).unwrap();
//! let matched = histogram::match_histograms(&img, &img).unwrap();
//! assert_eq!(matched, img);
//!
//! let means = lab::rgb_to_lab(&img).channel_means();
//! assert!(means[0] > 0.0);
//! ```

#![warn(missing_docs)]

mod error;
pub mod histogram;
pub mod lab;
pub mod srgb;

pub use error::{ColorError, ColorResult};
pub use histogram::{match_histograms, transfer, TransferOptions};
pub use lab::{lab_to_rgb, rgb_to_lab, LabImage};
