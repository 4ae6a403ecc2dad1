//! # lutor-lut
//!
//! Derives a dense 3D lookup table from a before/after image pair and exports
//! it as an Adobe/Resolve `.cube` file.
//!
//! # Pipeline
//!
//! ```text
//! original + stylized
//!     -> CorrespondenceSet   (dedupe on original color, seeded subsample)
//!     -> KdTree              (exact k-NN over sample colors)
//!     -> LutBuilder          (inverse-distance weighted mean per grid cell)
//!     -> Lut3D               (size^3 cells, red fastest)
//!     -> cube::write_3d      (.cube text)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use lutor_core::Image;
//! use lutor_lut::{cube, LutBuilder, LutBuilderOptions};
//!
//! let original = Image::from_fn(32, 32, |x, y| [(x * 8) as u8, (y * 8) as u8, 128]).unwrap();
//! let stylized = original.map_pixels(|p| [p[0] / 2 + 100, p[1], p[2] / 2]);
//!
//! let builder = LutBuilder::new(LutBuilderOptions::default().with_size(9).with_seed(7));
//! let lut = builder.build(&original, &stylized).unwrap();
//! let text = cube::encode_3d(&lut).unwrap();
//! assert!(text.starts_with(b"# LUTor Generated 3D LUT"));
//! ```
//!
//! # Dependencies
//!
//! - [`rayon`] - parallel grid evaluation
//! - [`rand`] - seedable subsampling
//! - [`tracing`] - diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod builder;
mod correspondence;
mod error;
mod kdtree;
mod lut3d;
pub mod cube;

pub use builder::{LutBuilder, LutBuilderOptions, DEFAULT_LUT_SIZE, DEFAULT_NEIGHBORS, WEIGHT_EPSILON};
pub use correspondence::{ColorSample, CorrespondenceSet, DEFAULT_MAX_SAMPLES};
pub use cube::{encode_3d, parse_3d, read_3d, write_3d, write_3d_to};
pub use error::{LutError, LutResult};
pub use kdtree::{brute_force_nearest, KdTree, Neighbor};
pub use lut3d::{Lut3D, DEFAULT_TITLE, MAX_LUT_SIZE};
