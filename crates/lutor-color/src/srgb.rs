//! sRGB transfer function.
//!
//! The sRGB standard uses a piecewise function combining a linear segment
//! near black with a power curve (approximately gamma 2.2) for the rest.
//!
//! # Range
//!
//! - Input/Output: [0, 1]
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

use std::sync::LazyLock;

/// Linear light for every 8-bit code value.
static DECODE_U8: LazyLock<[f64; 256]> = LazyLock::new(|| {
    let mut table = [0.0; 256];
    for (i, v) in table.iter_mut().enumerate() {
        *v = eotf(i as f64 / 255.0);
    }
    table
});

/// sRGB EOTF: decodes sRGB encoded values to linear light.
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use lutor_color::srgb::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear light to sRGB.
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// Decodes an 8-bit sRGB code value to linear light via a lookup table.
#[inline]
pub fn decode_u8(v: u8) -> f64 {
    DECODE_U8[v as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn endpoints() {
        assert_eq!(eotf(0.0), 0.0);
        assert_abs_diff_eq!(eotf(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(oetf(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn roundtrip() {
        for i in 0..=100 {
            let v = i as f64 / 100.0;
            assert_abs_diff_eq!(oetf(eotf(v)), v, epsilon = 1e-9);
        }
    }

    #[test]
    fn table_matches_formula() {
        for code in [0u8, 10, 11, 128, 254, 255] {
            assert_abs_diff_eq!(decode_u8(code), eotf(code as f64 / 255.0), epsilon = 1e-15);
        }
    }
}
