//! Global editor adjustments estimated from LAB statistics.
//!
//! Both images are converted to 8-bit packed LAB and reduced to their channel
//! means. The normalized differences
//!
//! ```text
//! dL = (mean_L(stylized) - mean_L(original)) / 255
//! da = (mean_a(stylized) - mean_a(original)) / 255
//! db = (mean_b(stylized) - mean_b(original)) / 255
//! ```
//!
//! drive fixed linear heuristics, each clamped to the slider range Camera Raw
//! accepts. The coefficients are empirical and intentionally simple; presets
//! generated elsewhere with the same tool depend on them staying as they are.

use crate::PresetResult;
use lutor_color::lab;
use lutor_core::Image;
use std::borrow::Cow;
use tracing::debug;

/// Camera Raw slider values.
///
/// Every field is clamped to its documented range on construction through
/// [`AdjustmentSet::from_lab_deltas`] or [`estimate`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AdjustmentSet {
    /// Exposure in stops, `[-2, 2]`.
    pub exposure: f64,
    /// `[-100, 100]`
    pub highlights: f64,
    /// `[-100, 100]`
    pub shadows: f64,
    /// `[0, 100]`
    pub vibrance: f64,
    /// `[-100, 100]`
    pub saturation: f64,
    /// White balance temperature offset, `[-2000, 2000]`.
    pub temperature: f64,
    /// Green/magenta tint offset, `[-100, 100]`.
    pub tint: f64,
}

impl AdjustmentSet {
    /// Applies the heuristics to normalized LAB mean differences.
    pub fn from_lab_deltas(d_l: f64, d_a: f64, d_b: f64) -> Self {
        let chroma = (d_a * d_a + d_b * d_b).sqrt();
        Self {
            exposure: (d_l * 2.0).clamp(-2.0, 2.0),
            highlights: (-d_l * 50.0).clamp(-100.0, 100.0),
            shadows: (d_l * 30.0).clamp(-100.0, 100.0),
            vibrance: (chroma * 100.0).clamp(0.0, 100.0),
            saturation: (chroma * 50.0).clamp(-100.0, 100.0),
            temperature: (d_b * 1000.0).clamp(-2000.0, 2000.0),
            tint: (d_a * 100.0).clamp(-100.0, 100.0),
        }
    }

    /// `(crs element name, value)` pairs in preset order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("Exposure2012", self.exposure),
            ("Highlights2012", self.highlights),
            ("Shadows2012", self.shadows),
            ("Vibrance", self.vibrance),
            ("Saturation", self.saturation),
            ("Temperature", self.temperature),
            ("Tint", self.tint),
        ]
    }

    /// Sets a field by its crs element name. Returns `false` for unknown names.
    pub(crate) fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "Exposure2012" => &mut self.exposure,
            "Highlights2012" => &mut self.highlights,
            "Shadows2012" => &mut self.shadows,
            "Vibrance" => &mut self.vibrance,
            "Saturation" => &mut self.saturation,
            "Temperature" => &mut self.temperature,
            "Tint" => &mut self.tint,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Estimates the adjustments that move `original` towards `stylized`.
///
/// `stylized` is resampled to the original's dimensions first when they
/// differ.
pub fn estimate(original: &Image, stylized: &Image) -> PresetResult<AdjustmentSet> {
    let stylized: Cow<'_, Image> = if original.same_dimensions(stylized) {
        Cow::Borrowed(stylized)
    } else {
        debug!(
            from = ?stylized.dimensions(),
            to = ?original.dimensions(),
            "resampling stylized image"
        );
        Cow::Owned(stylized.resized_like(original)?)
    };

    let orig = lab::rgb_to_lab(original).channel_means();
    let styl = lab::rgb_to_lab(&stylized).channel_means();
    let d = [
        (styl[0] - orig[0]) / 255.0,
        (styl[1] - orig[1]) / 255.0,
        (styl[2] - orig[2]) / 255.0,
    ];
    debug!(d_l = d[0], d_a = d[1], d_b = d[2], "LAB mean deltas");

    Ok(AdjustmentSet::from_lab_deltas(d[0], d[1], d[2]))
}
