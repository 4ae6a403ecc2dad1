//! RGB <-> CIE LAB conversion.
//!
//! Converts sRGB-encoded 8-bit images to CIE L\*a\*b\* through linear light
//! and CIE XYZ (D65 white), then packs the result into 8 bits per channel:
//!
//! | channel | packed value      | range   |
//! |---------|-------------------|---------|
//! | L       | `L* * 255 / 100`  | 0..=255 |
//! | a       | `a* + 128`        | 0..=255 |
//! | b       | `b* + 128`        | 0..=255 |
//!
//! This is the common 8-bit LAB convention used by imaging libraries, and the
//! adjustment estimator depends on its scale.

use crate::{srgb, ColorResult};
use lutor_core::{Image, Rgb8};
use rayon::prelude::*;

/// sRGB (linear) to XYZ, D65.
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

/// XYZ to sRGB (linear), D65.
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.240479, -1.537150, -0.498535],
    [-0.969256, 1.875991, 0.041556],
    [0.055648, -0.204043, 1.057311],
];

/// D65 reference white (Y = 1).
const WHITE_X: f64 = 0.950456;
const WHITE_Z: f64 = 1.088754;

const EPSILON: f64 = 0.008856;
const KAPPA: f64 = 903.3;

/// Image in 8-bit packed LAB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabImage {
    width: u32,
    height: u32,
    data: Vec<[u8; 3]>,
}

impl LabImage {
    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major packed `[L, a, b]` pixels.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.data
    }

    /// Mean of each packed channel over all pixels.
    pub fn channel_means(&self) -> [f64; 3] {
        let sums = self
            .data
            .par_iter()
            .fold(
                || [0u64; 3],
                |mut acc, p| {
                    for c in 0..3 {
                        acc[c] += p[c] as u64;
                    }
                    acc
                },
            )
            .reduce(|| [0u64; 3], |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]]);
        let n = self.data.len() as f64;
        [sums[0] as f64 / n, sums[1] as f64 / n, sums[2] as f64 / n]
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - 16.0 / 116.0) / 7.787
    }
}

#[inline]
fn pack(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn mul3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Converts one sRGB pixel to unpacked `(L*, a*, b*)`.
///
/// # Example
///
/// ```rust
/// use lutor_color::lab::rgb_to_lab_f64;
///
/// let [l, a, b] = rgb_to_lab_f64([255, 255, 255]);
/// assert!((l - 100.0).abs() < 0.01);
/// assert!(a.abs() < 0.01 && b.abs() < 0.01);
/// ```
pub fn rgb_to_lab_f64(rgb: Rgb8) -> [f64; 3] {
    let linear = [
        srgb::decode_u8(rgb[0]),
        srgb::decode_u8(rgb[1]),
        srgb::decode_u8(rgb[2]),
    ];
    let [x, y, z] = mul3(&RGB_TO_XYZ, linear);
    let (fx, fy, fz) = (lab_f(x / WHITE_X), lab_f(y), lab_f(z / WHITE_Z));

    let l = if y > EPSILON { 116.0 * fy - 16.0 } else { KAPPA * y };
    [l, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Converts one sRGB pixel to packed 8-bit LAB.
#[inline]
pub fn rgb_to_lab_pixel(rgb: Rgb8) -> [u8; 3] {
    let [l, a, b] = rgb_to_lab_f64(rgb);
    [pack(l * 255.0 / 100.0), pack(a + 128.0), pack(b + 128.0)]
}

/// Converts one packed 8-bit LAB pixel back to sRGB.
pub fn lab_to_rgb_pixel(lab: [u8; 3]) -> Rgb8 {
    let l = lab[0] as f64 * 100.0 / 255.0;
    let a = lab[1] as f64 - 128.0;
    let b = lab[2] as f64 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let y = if l > KAPPA * EPSILON { fy * fy * fy } else { l / KAPPA };
    let xyz = [WHITE_X * lab_f_inv(fx), y, WHITE_Z * lab_f_inv(fz)];

    let linear = mul3(&XYZ_TO_RGB, xyz);
    let encode = |v: f64| pack(srgb::oetf(v.clamp(0.0, 1.0)) * 255.0);
    [encode(linear[0]), encode(linear[1]), encode(linear[2])]
}

/// Converts an sRGB image to packed LAB.
pub fn rgb_to_lab(image: &Image) -> LabImage {
    LabImage {
        width: image.width(),
        height: image.height(),
        data: image.pixels().par_iter().map(|&p| rgb_to_lab_pixel(p)).collect(),
    }
}

/// Converts a packed LAB image back to sRGB.
pub fn lab_to_rgb(lab: &LabImage) -> ColorResult<Image> {
    let data: Vec<Rgb8> = lab.data.par_iter().map(|&p| lab_to_rgb_pixel(p)).collect();
    Ok(Image::from_pixels(lab.width, lab.height, data)?)
}
