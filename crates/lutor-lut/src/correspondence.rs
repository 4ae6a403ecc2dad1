//! Sparse original -> stylized color correspondences.

use crate::{LutError, LutResult};
use lutor_core::{Image, Rgb8};
use rand::Rng;
use rand::seq::index;

/// Default cap on the number of correspondences fed to the interpolator.
pub const DEFAULT_MAX_SAMPLES: usize = 10_000;

/// One observed color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorSample {
    /// Color in the original image.
    pub original: Rgb8,
    /// Color at the same position in the stylized image.
    pub mapped: Rgb8,
}

/// Ordered set of [`ColorSample`]s, unique on `original`.
///
/// Order is first occurrence in row-major pixel order. The k-NN tie-break
/// ("earliest sample wins") depends on it, so subsampling keeps it too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondenceSet {
    samples: Vec<ColorSample>,
}

/// One bit per 24-bit color.
struct ColorBitset(Vec<u64>);

impl ColorBitset {
    fn new() -> Self {
        Self(vec![0; (1 << 24) / 64])
    }

    /// Marks `color`, returning `true` if it was not marked before.
    #[inline]
    fn insert(&mut self, color: Rgb8) -> bool {
        let key = (color[0] as usize) << 16 | (color[1] as usize) << 8 | color[2] as usize;
        let (word, bit) = (key / 64, key % 64);
        let fresh = self.0[word] & (1 << bit) == 0;
        self.0[word] |= 1 << bit;
        fresh
    }
}

impl CorrespondenceSet {
    /// Wraps samples as-is (no dedupe, no cap).
    pub fn from_samples(samples: Vec<ColorSample>) -> Self {
        Self { samples }
    }

    /// Pairs same-position pixels, keeping the first mapping seen for each
    /// original color, then caps the set at `max_samples`.
    ///
    /// # Errors
    ///
    /// Shape mismatch between the two images, or `max_samples == 0`.
    pub fn from_images<R: Rng + ?Sized>(
        original: &Image,
        stylized: &Image,
        max_samples: usize,
        rng: &mut R,
    ) -> LutResult<Self> {
        original.ensure_same_dimensions(stylized)?;

        let mut seen = ColorBitset::new();
        let samples = original
            .pixels()
            .iter()
            .zip(stylized.pixels())
            .filter(|(o, _)| seen.insert(**o))
            .map(|(&original, &mapped)| ColorSample { original, mapped })
            .collect();

        Self { samples }.subsample(max_samples, rng)
    }

    /// Uniformly draws `max_samples` samples without replacement when the set
    /// is larger, preserving relative order.
    pub fn subsample<R: Rng + ?Sized>(self, max_samples: usize, rng: &mut R) -> LutResult<Self> {
        if max_samples == 0 {
            return Err(LutError::InvalidOption("max_samples must be > 0".into()));
        }
        if self.samples.len() <= max_samples {
            return Ok(self);
        }
        let mut picked = index::sample(rng, self.samples.len(), max_samples).into_vec();
        picked.sort_unstable();
        Ok(Self {
            samples: picked.into_iter().map(|i| self.samples[i]).collect(),
        })
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when there is nothing to interpolate from.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in insertion order.
    #[inline]
    pub fn samples(&self) -> &[ColorSample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn dedupes_on_first_occurrence() {
        let original = Image::from_pixels(4, 1, vec![[1, 1, 1], [2, 2, 2], [1, 1, 1], [3, 3, 3]]).unwrap();
        let stylized =
            Image::from_pixels(4, 1, vec![[10, 0, 0], [20, 0, 0], [99, 0, 0], [30, 0, 0]]).unwrap();
        let set = CorrespondenceSet::from_images(&original, &stylized, 100, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let mapped: Vec<_> = set.samples().iter().map(|s| s.mapped[0]).collect();
        assert_eq!(mapped, vec![10, 20, 30]);
    }

    #[test]
    fn caps_and_keeps_order() {
        let original = Image::from_fn(100, 100, |x, y| [x as u8, y as u8, 0]).unwrap();
        let set =
            CorrespondenceSet::from_images(&original, &original, 500, &mut StdRng::seed_from_u64(3))
                .unwrap();
        assert_eq!(set.len(), 500);
        let keys: Vec<u32> = set
            .samples()
            .iter()
            .map(|s| (s.original[1] as u32) << 8 | s.original[0] as u32)
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn seeded_subsample_is_reproducible() {
        let original = Image::from_fn(64, 64, |x, y| [x as u8 * 4, y as u8 * 4, 7]).unwrap();
        let draw = |seed| {
            CorrespondenceSet::from_images(&original, &original, 100, &mut StdRng::seed_from_u64(seed))
                .unwrap()
        };
        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn zero_cap_is_rejected() {
        let img = Image::new(2, 2).unwrap();
        let res = CorrespondenceSet::from_images(&img, &img, 0, &mut StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(LutError::InvalidOption(_))));
    }
}
