//! Format detection from file extensions.

use std::path::Path;

/// Raster formats LUTor reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// GIF format (first frame).
    Gif,
    /// BMP format.
    Bmp,
    /// TIFF format.
    Tiff,
}

impl Format {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("png") => Some(Format::Png),
            Some("jpg") | Some("jpeg") => Some(Format::Jpeg),
            Some("gif") => Some(Format::Gif),
            Some("bmp") => Some(Format::Bmp),
            Some("tif") | Some("tiff") => Some(Format::Tiff),
            _ => None,
        }
    }

    /// Matching codec in the `image` crate.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Format::Png => image::ImageFormat::Png,
            Format::Jpeg => image::ImageFormat::Jpeg,
            Format::Gif => image::ImageFormat::Gif,
            Format::Bmp => image::ImageFormat::Bmp,
            Format::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Returns `true` if the path has a supported image extension.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    Format::from_extension(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(Format::from_extension("a.PNG"), Some(Format::Png));
        assert_eq!(Format::from_extension("dir/b.jpeg"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("c.Tif"), Some(Format::Tiff));
        assert_eq!(Format::from_extension("d.webp"), None);
        assert_eq!(Format::from_extension("noext"), None);
        assert!(is_supported("x.gif"));
        assert!(is_supported("x.bmp"));
        assert!(!is_supported("x.exr"));
    }
}
