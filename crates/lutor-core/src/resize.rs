//! Bilinear image resampling.
//!
//! Used to bring a stylized image onto the pixel grid of its original before
//! any per-pixel correspondence or statistic is computed. Exact agreement with
//! other resamplers is not a goal; only visual equivalence is.
//!
//! The resize is separable: a horizontal pass followed by a vertical pass.
//! When downscaling the triangle kernel is widened by the scale factor so that
//! every source pixel contributes.
//!
//! # Example
//!
//! ```rust
//! use lutor_core::resize::resize_bilinear;
//!
//! let src = vec![[100u8, 150, 200]; 16 * 16];
//! let dst = resize_bilinear(&src, 16, 16, 8, 4);
//! assert_eq!(dst.len(), 8 * 4);
//! assert_eq!(dst[0], [100, 150, 200]);
//! ```

use crate::Rgb8;
use rayon::prelude::*;

/// Triangle (tent) kernel weight.
#[inline]
fn triangle_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Source taps and normalized weights for one destination coordinate.
fn taps(dst_pos: usize, src_len: usize, scale: f32) -> Vec<(usize, f32)> {
    let widen = scale.max(1.0);
    let support = widen;
    let center = (dst_pos as f32 + 0.5) * scale - 0.5;
    let first = ((center - support).floor() as isize).max(0) as usize;
    let last = ((center + support).ceil() as isize).clamp(0, src_len as isize - 1) as usize;

    let mut out: Vec<(usize, f32)> = (first..=last)
        .map(|s| (s, triangle_weight((s as f32 - center) / widen)))
        .filter(|&(_, w)| w > 0.0)
        .collect();

    let total: f32 = out.iter().map(|&(_, w)| w).sum();
    if total > 0.0 {
        for tap in &mut out {
            tap.1 /= total;
        }
    } else {
        // Degenerate kernel: fall back to the nearest source sample.
        let nearest = center.round().clamp(0.0, (src_len - 1) as f32) as usize;
        out = vec![(nearest, 1.0)];
    }
    out
}

/// Resizes row-major RGB8 pixels from `src_w` x `src_h` to `dst_w` x `dst_h`.
///
/// All dimensions must be non-zero; `src.len()` must equal `src_w * src_h`.
pub fn resize_bilinear(
    src: &[Rgb8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<Rgb8> {
    debug_assert_eq!(src.len(), src_w * src_h);

    // Horizontal pass: src_w x src_h -> dst_w x src_h, kept in f32.
    let x_scale = src_w as f32 / dst_w as f32;
    let x_taps: Vec<_> = (0..dst_w).map(|x| taps(x, src_w, x_scale)).collect();
    let temp: Vec<[f32; 3]> = (0..src_h)
        .into_par_iter()
        .flat_map_iter(|y| {
            let row = &src[y * src_w..(y + 1) * src_w];
            x_taps.iter().map(move |taps| {
                let mut acc = [0.0f32; 3];
                for &(sx, w) in taps {
                    for c in 0..3 {
                        acc[c] += row[sx][c] as f32 * w;
                    }
                }
                acc
            })
        })
        .collect();

    // Vertical pass: dst_w x src_h -> dst_w x dst_h.
    let y_scale = src_h as f32 / dst_h as f32;
    let y_taps: Vec<_> = (0..dst_h).map(|y| taps(y, src_h, y_scale)).collect();
    y_taps
        .par_iter()
        .flat_map_iter(|taps| {
            let temp = &temp;
            (0..dst_w).map(move |x| {
                let mut acc = [0.0f32; 3];
                for &(sy, w) in taps {
                    let px = temp[sy * dst_w + x];
                    for c in 0..3 {
                        acc[c] += px[c] * w;
                    }
                }
                [quantize(acc[0]), quantize(acc[1]), quantize(acc[2])]
            })
        })
        .collect()
}

#[inline]
fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
