//! Per-channel histogram matching.
//!
//! Remaps each RGB channel of a source image so that its value distribution
//! follows the distribution of the same channel in a reference image:
//!
//! 1. Build the 256-level histogram of both channels.
//! 2. Turn each into a CDF over the levels that actually occur.
//! 3. For every source level, take its CDF percentile and invert it through
//!    the reference CDF with linear interpolation.
//!
//! Channels are matched independently. This is not a joint 3D histogram
//! transport, and matching the channels jointly would change results.
//!
//! # Example
//!
//! ```rust
//! use lutor_core::Image;
//! use lutor_color::histogram::{transfer, TransferOptions};
//!
//! let content = Image::from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, 64]).unwrap();
//! let style = Image::filled(4, 4, [220, 140, 60]).unwrap();
//!
//! let graded = transfer(&content, &style, &TransferOptions::default()).unwrap();
//! assert_eq!(graded.pixel(5, 5), [220, 140, 60]);
//! ```

use crate::{ColorError, ColorResult};
use lutor_core::Image;
use tracing::debug;

/// Options for [`transfer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransferOptions {
    /// Blend factor between the content (0.0) and the fully matched image (1.0).
    pub strength: f32,
    /// Accept a style image whose shape differs from the content.
    pub auto_resize: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            strength: 1.0,
            auto_resize: true,
        }
    }
}

impl TransferOptions {
    /// Sets the blend strength.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Enables or disables matching against a differently sized style image.
    pub fn with_auto_resize(mut self, auto_resize: bool) -> Self {
        self.auto_resize = auto_resize;
        self
    }
}

/// Empirical CDF of one channel over its occupied levels.
struct ChannelCdf {
    levels: Vec<f64>,
    cdf: Vec<f64>,
}

impl ChannelCdf {
    fn from_histogram(hist: &[u64; 256]) -> Self {
        let total: u64 = hist.iter().sum();
        let mut levels = Vec::new();
        let mut cdf = Vec::new();
        let mut running = 0u64;
        for (level, &count) in hist.iter().enumerate() {
            if count > 0 {
                running += count;
                levels.push(level as f64);
                cdf.push(running as f64 / total as f64);
            }
        }
        Self { levels, cdf }
    }

    /// CDF value at an occupied level.
    fn at(&self, level: u8) -> Option<f64> {
        self.levels
            .binary_search_by(|v| v.total_cmp(&(level as f64)))
            .ok()
            .map(|i| self.cdf[i])
    }
}

fn channel_histograms(image: &Image) -> [[u64; 256]; 3] {
    let mut hist = [[0u64; 256]; 3];
    for p in image.pixels() {
        for c in 0..3 {
            hist[c][p[c] as usize] += 1;
        }
    }
    hist
}

/// Piecewise-linear interpolation of `fp` at `x` over increasing `xp`.
///
/// Values left of `xp[0]` take `fp[0]`, values right of the last knot take
/// the last `fp`. Knots are reproduced exactly.
fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let j = xp.partition_point(|&v| v <= x);
    if j == 0 {
        return fp[0];
    }
    if j == xp.len() {
        return fp[xp.len() - 1];
    }
    let i = j - 1;
    if x == xp[i] {
        return fp[i];
    }
    let slope = (fp[j] - fp[i]) / (xp[j] - xp[i]);
    slope * (x - xp[i]) + fp[i]
}

/// Builds the source-level -> output-level table for one channel.
fn level_mapping(source: &[u64; 256], reference: &[u64; 256]) -> [u8; 256] {
    let src = ChannelCdf::from_histogram(source);
    let reference = ChannelCdf::from_histogram(reference);

    let mut table = [0u8; 256];
    for (level, out) in table.iter_mut().enumerate() {
        *out = match src.at(level as u8) {
            // Truncation matches the integer cast of the interpolated level.
            Some(q) => interp(q, &reference.cdf, &reference.levels).clamp(0.0, 255.0) as u8,
            None => level as u8,
        };
    }
    table
}

/// Matches each channel of `source` to the distribution of `reference`.
///
/// # Errors
///
/// Returns a dimension mismatch when the two images have different shapes;
/// resample the reference first (or use [`transfer`]).
pub fn match_histograms(source: &Image, reference: &Image) -> ColorResult<Image> {
    source.ensure_same_dimensions(reference)?;
    Ok(match_to_histograms(source, &channel_histograms(reference)))
}

fn match_to_histograms(source: &Image, reference: &[[u64; 256]; 3]) -> Image {
    let src_hist = channel_histograms(source);
    let tables = [
        level_mapping(&src_hist[0], &reference[0]),
        level_mapping(&src_hist[1], &reference[1]),
        level_mapping(&src_hist[2], &reference[2]),
    ];

    source.map_pixels(|p| {
        [
            tables[0][p[0] as usize],
            tables[1][p[1] as usize],
            tables[2][p[2] as usize],
        ]
    })
}

/// Color transfer: histogram-match `content` to `style`, then blend.
///
/// Channel CDFs are normalized, so with [`TransferOptions::auto_resize`] set
/// a style image of any size is matched through its own histogram without
/// resampling. Otherwise the shapes must agree.
pub fn transfer(content: &Image, style: &Image, options: &TransferOptions) -> ColorResult<Image> {
    if !(0.0..=1.0).contains(&options.strength) {
        return Err(ColorError::InvalidStrength(options.strength));
    }
    if !options.auto_resize {
        content.ensure_same_dimensions(style)?;
    } else if !content.same_dimensions(style) {
        debug!(
            content = ?content.dimensions(),
            style = ?style.dimensions(),
            "matching against style histogram of a different size"
        );
    }

    let matched = match_to_histograms(content, &channel_histograms(style));
    if options.strength >= 1.0 {
        return Ok(matched);
    }
    debug!(strength = options.strength, "blending matched image");
    Ok(content.blend(&matched, options.strength)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> Image {
        Image::from_fn(w, h, |x, y| {
            [
                ((x * 255) / (w - 1)) as u8,
                ((y * 255) / (h - 1)) as u8,
                (((x + y) * 127) / (w + h - 2)) as u8,
            ]
        })
        .unwrap()
    }

    #[test]
    fn interp_matches_numpy_semantics() {
        let xp = [0.25, 0.5, 1.0];
        let fp = [10.0, 20.0, 40.0];
        assert_eq!(interp(0.1, &xp, &fp), 10.0);
        assert_eq!(interp(0.25, &xp, &fp), 10.0);
        assert_eq!(interp(0.5, &xp, &fp), 20.0);
        assert_eq!(interp(0.75, &xp, &fp), 30.0);
        assert_eq!(interp(1.0, &xp, &fp), 40.0);
        assert_eq!(interp(2.0, &xp, &fp), 40.0);
    }

    #[test]
    fn matching_with_itself_is_identity() {
        let img = gradient(37, 23);
        assert_eq!(match_histograms(&img, &img).unwrap(), img);
    }

    #[test]
    fn preserves_rank_order() {
        let source = Image::from_fn(64, 4, |x, _| [x as u8 + 96, 128, 255 - x as u8]).unwrap();
        let reference = Image::from_fn(64, 4, |x, y| {
            [((x * x) % 251) as u8, (y * 60) as u8, ((x * 7 + y * 13) % 256) as u8]
        })
        .unwrap();

        let out = match_histograms(&source, &reference).unwrap();
        for c in 0..3 {
            for a in source.pixels().iter().zip(out.pixels()) {
                for b in source.pixels().iter().zip(out.pixels()) {
                    if a.0[c] < b.0[c] {
                        assert!(a.1[c] <= b.1[c], "channel {c} inverted");
                    }
                }
            }
        }
    }

    #[test]
    fn solid_reference_collapses_channels() {
        let source = gradient(16, 16);
        let reference = Image::filled(16, 16, [12, 200, 77]).unwrap();
        let out = match_histograms(&source, &reference).unwrap();
        assert!(out.pixels().iter().all(|&p| p == [12, 200, 77]));
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = Image::new(4, 4).unwrap();
        let b = Image::new(5, 4).unwrap();
        assert!(matches!(
            match_histograms(&a, &b),
            Err(ColorError::Image(lutor_core::Error::DimensionMismatch { .. }))
        ));
        let strict = TransferOptions::default().with_auto_resize(false);
        assert!(transfer(&a, &b, &strict).is_err());
        assert!(transfer(&a, &b, &TransferOptions::default()).is_ok());
    }

    #[test]
    fn differently_sized_style_uses_its_own_histogram() {
        let style = Image::from_fn(8, 8, |x, y| {
            let v = (x * 31 + y * 17) as u8;
            [v, v.wrapping_mul(3), 255 - v]
        })
        .unwrap();
        // Pixel-doubled copy: same per-channel CDFs, so matching is the identity.
        let content = Image::from_fn(16, 16, |x, y| style.pixel(x / 2, y / 2)).unwrap();

        let out = transfer(&content, &style, &TransferOptions::default()).unwrap();
        assert_eq!(out, content);
        assert!(transfer(&content, &style, &TransferOptions::default().with_auto_resize(false)).is_err());
    }

    #[test]
    fn strength_blends_towards_content() {
        let content = Image::filled(8, 8, [100, 100, 100]).unwrap();
        let style = Image::filled(8, 8, [200, 0, 100]).unwrap();

        let none = transfer(&content, &style, &TransferOptions::default().with_strength(0.0)).unwrap();
        assert_eq!(none, content);

        let half = transfer(&content, &style, &TransferOptions::default().with_strength(0.5)).unwrap();
        assert_eq!(half.pixel(0, 0), [150, 50, 100]);

        let bad = TransferOptions::default().with_strength(-0.1);
        assert!(matches!(
            transfer(&content, &style, &bad),
            Err(ColorError::InvalidStrength(_))
        ));
    }
}
