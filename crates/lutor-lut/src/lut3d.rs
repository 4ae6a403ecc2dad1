//! 3-dimensional lookup table.
//!
//! A 3D LUT maps RGB input to RGB output through a cube of color values.
//! LUTor produces them from image pairs; they are consumed by any grading
//! tool that reads `.cube` files.

use crate::{LutError, LutResult};
use lutor_core::{Image, Rgb8};

/// Title written to `.cube` files unless overridden.
pub const DEFAULT_TITLE: &str = "LUTor Style Transfer LUT";

/// Largest accepted cube size per axis.
pub const MAX_LUT_SIZE: usize = 256;

/// A 3-dimensional lookup table.
///
/// # Structure
///
/// - `size^3` entries, each containing normalized RGB output in `[0, 1]`
/// - Stored red-fastest: `index = r + g * size + b * size^2`, which is also
///   the `.cube` file order
/// - Cell `(r, g, b)` corresponds to input `(r, g, b) / (size - 1)`
///
/// # Example
///
/// ```rust
/// use lutor_lut::Lut3D;
///
/// let lut = Lut3D::identity(33).unwrap();
/// let out = lut.apply([0.5, 0.3, 0.2]);
/// assert!((out[0] - 0.5).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    /// Cell values, red fastest.
    pub data: Vec<[f32; 3]>,
    /// Cube size (typically 17, 33 or 64)
    pub size: usize,
    /// Input domain minimum (per channel)
    pub domain_min: [f32; 3],
    /// Input domain maximum (per channel)
    pub domain_max: [f32; 3],
    /// `TITLE` line of the `.cube` file
    pub title: String,
}

impl Lut3D {
    /// Creates an identity (pass-through) 3D LUT.
    ///
    /// Every cell holds exactly `(r, g, b) / (size - 1)`.
    ///
    /// # Errors
    ///
    /// [`LutError::InvalidSize`] if `size` is outside `2..=MAX_LUT_SIZE`.
    pub fn identity(size: usize) -> LutResult<Self> {
        let count = check_size(size)?;
        let n = (size - 1) as f32;
        let mut data = Vec::with_capacity(count);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / n, g as f32 / n, b as f32 / n]);
                }
            }
        }
        Ok(Self::with_defaults(data, size))
    }

    /// Creates a 3D LUT from raw red-fastest data with exactly `size^3` entries.
    pub fn from_data(data: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        let expected = check_size(size)?;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {} entries for size {}, got {}",
                expected,
                size,
                data.len()
            )));
        }
        Ok(Self::with_defaults(data, size))
    }

    fn with_defaults(data: Vec<[f32; 3]>, size: usize) -> Self {
        Self {
            data,
            size,
            domain_min: [0.0, 0.0, 0.0],
            domain_max: [1.0, 1.0, 1.0],
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Sets the input domain.
    pub fn with_domain(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    /// Sets the `.cube` title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns the total number of entries in the LUT.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Returns the flat index for grid position `(r, g, b)`.
    #[inline]
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        b * self.size * self.size + g * self.size + r
    }

    /// Gets the value at grid position `(r, g, b)`.
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[self.index(r, g, b)]
    }

    /// Largest per-channel difference to another LUT of the same size.
    pub fn max_abs_diff(&self, other: &Lut3D) -> Option<f32> {
        if self.size != other.size {
            return None;
        }
        let diff = self
            .data
            .iter()
            .zip(&other.data)
            .flat_map(|(a, b)| (0..3).map(move |c| (a[c] - b[c]).abs()))
            .fold(0.0f32, f32::max);
        Some(diff)
    }

    /// Applies the LUT to an RGB value with trilinear interpolation.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let (r, g, b) = self.normalize(rgb);
        let n = (self.size - 1) as f32;

        let ri = ((r * n).floor() as usize).min(self.size - 2);
        let gi = ((g * n).floor() as usize).min(self.size - 2);
        let bi = ((b * n).floor() as usize).min(self.size - 2);

        let rf = r * n - ri as f32;
        let gf = g * n - gi as f32;
        let bf = b * n - bi as f32;

        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        let mut result = [0.0f32; 3];
        for i in 0..3 {
            let c00 = c000[i] * (1.0 - rf) + c100[i] * rf;
            let c01 = c001[i] * (1.0 - rf) + c101[i] * rf;
            let c10 = c010[i] * (1.0 - rf) + c110[i] * rf;
            let c11 = c011[i] * (1.0 - rf) + c111[i] * rf;

            let c0 = c00 * (1.0 - gf) + c10 * gf;
            let c1 = c01 * (1.0 - gf) + c11 * gf;

            result[i] = c0 * (1.0 - bf) + c1 * bf;
        }
        result
    }

    /// Applies the LUT to an 8-bit color.
    pub fn apply_rgb8(&self, rgb: Rgb8) -> Rgb8 {
        let out = self.apply([
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        ]);
        out.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    /// Applies the LUT to every pixel of an image, in parallel.
    pub fn apply_image(&self, image: &Image) -> Image {
        image.map_pixels(|p| self.apply_rgb8(p))
    }

    /// Normalizes input RGB to [0, 1] based on domain.
    fn normalize(&self, rgb: [f32; 3]) -> (f32, f32, f32) {
        let r = (rgb[0] - self.domain_min[0]) / (self.domain_max[0] - self.domain_min[0]);
        let g = (rgb[1] - self.domain_min[1]) / (self.domain_max[1] - self.domain_min[1]);
        let b = (rgb[2] - self.domain_min[2]) / (self.domain_max[2] - self.domain_min[2]);
        (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }
}

/// Validates a cube size and returns its entry count.
pub(crate) fn check_size(size: usize) -> LutResult<usize> {
    if !(2..=MAX_LUT_SIZE).contains(&size) {
        return Err(LutError::InvalidSize(format!(
            "cube size must be within 2..={MAX_LUT_SIZE}, got {size}"
        )));
    }
    size.checked_mul(size)
        .and_then(|n| n.checked_mul(size))
        .ok_or_else(|| LutError::InvalidSize(format!("cube size {size} overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_cells_are_exact() {
        let lut = Lut3D::identity(5).unwrap();
        assert_eq!(lut.entry_count(), 125);
        assert_eq!(lut.get(4, 2, 1), [1.0, 0.5, 0.25]);
        assert_eq!(lut.data[1], [0.25, 0.0, 0.0]);
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(matches!(Lut3D::identity(1), Err(LutError::InvalidSize(_))));
        assert!(matches!(Lut3D::identity(MAX_LUT_SIZE + 1), Err(LutError::InvalidSize(_))));
        assert!(matches!(Lut3D::from_data(Vec::new(), 3_000_000), Err(LutError::InvalidSize(_))));
        assert!(Lut3D::from_data(vec![[0.0; 3]; 7], 2).is_err());
    }

    #[test]
    fn identity_apply_passes_through() {
        let lut = Lut3D::identity(17).unwrap();
        let result = lut.apply([0.5, 0.3, 0.8]);
        for (out, inp) in result.iter().zip([0.5, 0.3, 0.8]) {
            assert!((out - inp).abs() < 1e-5);
        }
        assert_eq!(lut.apply_rgb8([12, 200, 255]), [12, 200, 255]);
    }

    #[test]
    fn constant_lut_maps_everything() {
        let lut = Lut3D::from_data(vec![[0.5, 0.25, 1.0]; 8], 2).unwrap();
        assert_eq!(lut.apply([0.1, 0.9, 0.4]), [0.5, 0.25, 1.0]);
        let img = Image::filled(3, 3, [7, 8, 9]).unwrap();
        assert!(lut.apply_image(&img).pixels().iter().all(|&p| p == [128, 64, 255]));
    }

    #[test]
    fn diff_against_identity() {
        let a = Lut3D::identity(3).unwrap();
        let mut b = a.clone();
        b.data[5][1] += 0.125;
        assert_eq!(a.max_abs_diff(&b), Some(0.125));
        assert_eq!(a.max_abs_diff(&Lut3D::identity(4).unwrap()), None);
    }
}
