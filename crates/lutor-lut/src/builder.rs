//! Scattered-data 3D LUT construction.
//!
//! Every cell of the `size^3` lattice is set to an inverse-distance weighted
//! mean of the mapped colors of its `k` nearest original colors:
//!
//! ```text
//! q      = floor(i * 255 / (size - 1))          per axis
//! w_j    = 1 / (|q - original_j|^2 + 1e-6)
//! cell   = clamp(sum(w_j * mapped_j) / sum(w_j), 0, 255) / 255
//! ```
//!
//! Neighbor selection is exact (ties go to the earliest correspondence) and
//! accelerated by a [`KdTree`]. Cells are independent and evaluated in
//! parallel with rayon.

use crate::lut3d::check_size;
use crate::{CorrespondenceSet, KdTree, Lut3D, LutError, LutResult, Neighbor, DEFAULT_MAX_SAMPLES};
use lutor_core::{Image, Rgb8};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Default cube size.
pub const DEFAULT_LUT_SIZE: usize = 64;

/// Default number of neighbors blended per cell.
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Added to squared distances so exact matches get a finite weight.
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// Options for [`LutBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LutBuilderOptions {
    /// Cube size per axis.
    pub size: usize,
    /// Cap on unique correspondences; larger sets are subsampled.
    pub max_samples: usize,
    /// Neighbors blended per cell (`k`).
    pub neighbors: usize,
    /// Seed for subsampling. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Resample the stylized image onto the original grid when shapes differ.
    pub auto_resize: bool,
    /// Fail with [`LutError::DegenerateMapping`] instead of returning identity.
    pub strict: bool,
}

impl Default for LutBuilderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_LUT_SIZE,
            max_samples: DEFAULT_MAX_SAMPLES,
            neighbors: DEFAULT_NEIGHBORS,
            seed: None,
            auto_resize: true,
            strict: false,
        }
    }
}

impl LutBuilderOptions {
    /// Sets the cube size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the correspondence cap.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Sets `k`.
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Fixes the subsampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables automatic resampling.
    pub fn with_auto_resize(mut self, auto_resize: bool) -> Self {
        self.auto_resize = auto_resize;
        self
    }

    /// Enables or disables strict degenerate-mapping handling.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Checks the options and returns the number of grid cells.
    fn validate(&self) -> LutResult<usize> {
        let entries = check_size(self.size)?;
        if self.max_samples == 0 {
            return Err(LutError::InvalidOption("max_samples must be > 0".into()));
        }
        if self.neighbors == 0 {
            return Err(LutError::InvalidOption("neighbors must be > 0".into()));
        }
        Ok(entries)
    }
}

/// Builds [`Lut3D`]s from original / stylized image pairs.
///
/// Stateless apart from its options; construct one per call or share it.
#[derive(Debug, Clone, Default)]
pub struct LutBuilder {
    options: LutBuilderOptions,
}

/// Lattice coordinate to 8-bit query value (truncating).
#[inline]
fn grid_to_u8(i: usize, size: usize) -> u8 {
    (i * 255 / (size - 1)) as u8
}

/// Inverse-distance weighted mean of the neighbors' mapped colors.
fn weighted_mean(neighbors: &[Neighbor], set: &CorrespondenceSet) -> [f32; 3] {
    let samples = set.samples();
    let mut acc = [0.0f64; 3];
    let mut total = 0.0f64;
    for n in neighbors {
        let w = 1.0 / (n.distance_sq as f64 + WEIGHT_EPSILON);
        let mapped = samples[n.index].mapped;
        for c in 0..3 {
            acc[c] += w * mapped[c] as f64;
        }
        total += w;
    }
    acc.map(|v| ((v / total).clamp(0.0, 255.0) / 255.0) as f32)
}

impl LutBuilder {
    /// Creates a builder.
    pub fn new(options: LutBuilderOptions) -> Self {
        Self { options }
    }

    /// Builder options.
    pub fn options(&self) -> &LutBuilderOptions {
        &self.options
    }

    /// Builds a LUT approximating the `original -> stylized` color transform.
    ///
    /// # Errors
    ///
    /// - [`LutError::InvalidSize`] / [`LutError::InvalidOption`] for bad options
    /// - a dimension mismatch when shapes differ and `auto_resize` is off
    /// - [`LutError::DegenerateMapping`] in strict mode with no correspondences
    pub fn build(&self, original: &Image, stylized: &Image) -> LutResult<Lut3D> {
        let set = self.correspondence(original, stylized)?;
        self.build_from_correspondence(&set)
    }

    /// Forms the correspondence set for an image pair.
    pub fn correspondence(&self, original: &Image, stylized: &Image) -> LutResult<CorrespondenceSet> {
        self.options.validate()?;

        let stylized: Cow<'_, Image> = if original.same_dimensions(stylized) {
            Cow::Borrowed(stylized)
        } else if self.options.auto_resize {
            debug!(
                from = ?stylized.dimensions(),
                to = ?original.dimensions(),
                "resampling stylized image"
            );
            Cow::Owned(stylized.resized_like(original)?)
        } else {
            return Err(lutor_core::Error::dimension_mismatch(
                original.dimensions(),
                stylized.dimensions(),
            )
            .into());
        };

        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let set = CorrespondenceSet::from_images(original, &stylized, self.options.max_samples, &mut rng)?;
        debug!(
            pixels = original.pixel_count(),
            samples = set.len(),
            cap = self.options.max_samples,
            "correspondence set ready"
        );
        Ok(set)
    }

    /// Interpolates a dense LUT from an existing correspondence set.
    pub fn build_from_correspondence(&self, set: &CorrespondenceSet) -> LutResult<Lut3D> {
        let entries = self.options.validate()?;
        let size = self.options.size;

        if set.is_empty() {
            if self.options.strict {
                return Err(LutError::DegenerateMapping);
            }
            warn!(size, "no color correspondences, using identity LUT");
            return Lut3D::identity(size);
        }

        let originals: Vec<Rgb8> = set.samples().iter().map(|s| s.original).collect();
        let tree = KdTree::build(&originals);
        let k = self.options.neighbors.min(set.len());
        debug!(size, k, samples = set.len(), "evaluating LUT grid");

        let data: Vec<[f32; 3]> = (0..entries)
            .into_par_iter()
            .map_init(
                || Vec::with_capacity(k + 1),
                |best, idx| {
                    let r = idx % size;
                    let g = (idx / size) % size;
                    let b = idx / (size * size);
                    let query = [grid_to_u8(r, size), grid_to_u8(g, size), grid_to_u8(b, size)];
                    tree.nearest_into(query, k, best);
                    weighted_mean(best, set)
                },
            )
            .collect();

        Lut3D::from_data(data, size)
    }
}
