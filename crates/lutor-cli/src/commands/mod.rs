//! CLI command implementations

pub mod apply;
pub mod info;
pub mod lut;
pub mod transfer;
pub mod xmp;

use anyhow::{Context, Result};
use lutor_core::Image;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    lutor_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    lutor_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}
