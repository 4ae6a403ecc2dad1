//! Owned 8-bit RGB image buffer.
//!
//! [`Image`] is the currency of every LUTor operation: the original and
//! stylized photographs, histogram-matched previews and LUT previews are all
//! `Image` values.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, one `[R, G, B]`
//! triple per pixel:
//!
//! ```text
//! [RGB RGB RGB ...]  <- Row 0
//! [RGB RGB RGB ...]  <- Row 1
//! ```
//!
//! # Invariants
//!
//! - `width > 0` and `height > 0`
//! - `pixels().len() == width * height`
//! - dimensions never change after construction; resampling returns a new image
//!
//! # Usage
//!
//! ```rust
//! use lutor_core::Image;
//!
//! let img = Image::filled(4, 2, [128, 64, 32]).unwrap();
//! assert_eq!(img.dimensions(), (4, 2));
//! assert_eq!(img.pixel(3, 1), [128, 64, 32]);
//! ```

use crate::resize::resize_bilinear;
use crate::{Error, Result};
use rayon::prelude::*;

/// An RGB triple with 8 bits per channel.
pub type Rgb8 = [u8; 3];

/// Owned RGB8 raster with immutable dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<Rgb8>,
}

impl Image {
    /// Creates a black image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, [0, 0, 0])
    }

    /// Creates an image where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![color; count],
        })
    }

    /// Creates an image from row-major pixel triples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] if the dimensions are zero or the
    /// pixel count does not equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<Rgb8>) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        if data.len() != count {
            return Err(Error::invalid_image(format!(
                "expected {} pixels for {}x{}, got {}",
                count,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image from interleaved `RGBRGB...` bytes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lutor_core::Image;
    ///
    /// let img = Image::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
    /// assert_eq!(img.pixel(1, 0), [0, 0, 255]);
    /// ```
    pub fn from_raw(width: u32, height: u32, raw: Vec<u8>) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        if raw.len() != count * 3 {
            return Err(Error::invalid_image(format!(
                "expected {} bytes for {}x{} RGB, got {}",
                count * 3,
                width,
                height,
                raw.len()
            )));
        }
        let data = raw.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Rgb8,
    {
        let count = checked_pixel_count(width, height)?;
        let mut data = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Consumes the image and returns interleaved `RGBRGB...` bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_iter().flatten().collect()
    }

    /// Returns `true` if both images have the same width and height.
    #[inline]
    pub fn same_dimensions(&self, other: &Image) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fails with [`Error::DimensionMismatch`] unless shapes match.
    pub fn ensure_same_dimensions(&self, other: &Image) -> Result<()> {
        if self.same_dimensions(other) {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()))
        }
    }

    /// Applies `f` to every pixel in parallel, returning a new image.
    pub fn map_pixels<F>(&self, f: F) -> Image
    where
        F: Fn(Rgb8) -> Rgb8 + Sync + Send,
    {
        Image {
            width: self.width,
            height: self.height,
            data: self.data.par_iter().map(|&p| f(p)).collect(),
        }
    }

    /// Resamples to `width` x `height` with a bilinear filter.
    ///
    /// Returns a clone when the size already matches.
    pub fn resized(&self, width: u32, height: u32) -> Result<Image> {
        checked_pixel_count(width, height)?;
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }
        let data = resize_bilinear(
            &self.data,
            self.width as usize,
            self.height as usize,
            width as usize,
            height as usize,
        );
        Ok(Image {
            width,
            height,
            data,
        })
    }

    /// Resamples this image to the dimensions of `reference`.
    pub fn resized_like(&self, reference: &Image) -> Result<Image> {
        self.resized(reference.width, reference.height)
    }

    /// Downscales so the longer side equals `max_side`, keeping aspect ratio.
    ///
    /// Images already within bounds are returned unchanged.
    pub fn fit_within(&self, max_side: u32) -> Result<Image> {
        if max_side == 0 {
            return Err(Error::invalid_parameter("max_side must be > 0"));
        }
        let (w, h) = self.dimensions();
        if w.max(h) <= max_side {
            return Ok(self.clone());
        }
        let (nw, nh) = if w > h {
            (max_side, (h as u64 * max_side as u64 / w as u64) as u32)
        } else {
            ((w as u64 * max_side as u64 / h as u64) as u32, max_side)
        };
        self.resized(nw.max(1), nh.max(1))
    }

    /// Linear blend `self * (1 - alpha) + other * alpha`, rounded per channel.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if shapes differ, [`Error::InvalidParameter`]
    /// if `alpha` is not within `[0, 1]`.
    pub fn blend(&self, other: &Image, alpha: f32) -> Result<Image> {
        self.ensure_same_dimensions(other)?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::invalid_parameter(format!(
                "blend alpha {alpha} outside [0, 1]"
            )));
        }
        let data = self
            .data
            .par_iter()
            .zip(other.data.par_iter())
            .map(|(a, b)| {
                let mut out = [0u8; 3];
                for c in 0..3 {
                    let v = a[c] as f32 + alpha * (b[c] as f32 - a[c] as f32);
                    out[c] = v.round().clamp(0.0, 255.0) as u8;
                }
                out
            })
            .collect();
        Ok(Image {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

fn checked_pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_image(format!(
            "zero dimension {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_image(format!("{width}x{height} overflows")))
}
