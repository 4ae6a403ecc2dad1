//! # lutor-io
//!
//! Reads and writes 8-bit RGB images for LUTor through the [`image`] crate.
//!
//! Supported: PNG, JPEG, GIF, BMP, TIFF. Every input is converted to RGB8;
//! alpha and extra channels are dropped, higher bit depths are reduced.
//!
//! # Example
//!
//! ```rust,ignore
//! let original = lutor_io::read("before.jpg")?;
//! let preview = lutor_io::load_preview("after.png", 512)?;
//! lutor_io::write("preview.png", &preview)?;
//! ```

#![warn(missing_docs)]

mod error;
mod format;

pub use error::{IoError, IoResult};
pub use format::{is_supported, Format};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use lutor_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// JPEG quality used by [`write`].
pub const JPEG_QUALITY: u8 = 95;

fn require_format(path: &Path) -> IoResult<Format> {
    Format::from_extension(path)
        .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
}

/// Decodes an image file into RGB8.
///
/// The extension must be supported; the codec itself is picked from the
/// file contents, so a mislabeled PNG still loads.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    require_format(path)?;

    let reader = ImageReader::new(BufReader::new(File::open(path)?))
        .with_guessed_format()?;
    let img = reader
        .decode()
        .map_err(|e| IoError::Decode(format!("{}: {}", path.display(), e)))?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!(path = %path.display(), width, height, "decoded image");
    Ok(Image::from_raw(width, height, rgb.into_raw())?)
}

/// Decodes an image and shrinks it so its longer side is at most `max_side`.
pub fn load_preview<P: AsRef<Path>>(path: P, max_side: u32) -> IoResult<Image> {
    let image = read(path)?;
    Ok(image.fit_within(max_side)?)
}

/// Encodes an image, choosing the codec from the extension.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    let format = require_format(path)?;

    let (width, height) = image.dimensions();
    let rgb = RgbImage::from_raw(width, height, image.clone().into_raw())
        .ok_or_else(|| IoError::Encode("buffer size mismatch".into()))?;
    let dynamic = DynamicImage::ImageRgb8(rgb);

    let mut writer = BufWriter::new(File::create(path)?);
    let encoded = match format {
        Format::Jpeg => {
            dynamic.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
        }
        Format::Gif => DynamicImage::ImageRgba8(dynamic.to_rgba8())
            .write_to(&mut writer, format.image_format()),
        _ => dynamic.write_to(&mut writer, format.image_format()),
    };
    encoded.map_err(|e| IoError::Encode(format!("{}: {}", path.display(), e)))?;
    writer.flush()?;

    debug!(path = %path.display(), width, height, ?format, "encoded image");
    Ok(())
}
