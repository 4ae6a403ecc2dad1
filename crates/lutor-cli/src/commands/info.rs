//! LUT / preset inspection command

use crate::InfoArgs;
use anyhow::{bail, Context, Result};
use lutor_lut::{cube, Lut3D};
use std::path::Path;

pub fn run(args: InfoArgs) -> Result<()> {
    for path in &args.input {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "cube" => show_cube(path)?,
            "xmp" => show_xmp(path)?,
            _ => bail!("Unsupported file: {} (expected .cube or .xmp)", path.display()),
        }
    }
    Ok(())
}

fn show_cube(path: &Path) -> Result<()> {
    let lut = cube::read_3d(path).with_context(|| format!("Failed to load: {}", path.display()))?;

    println!("{}", path.display());
    println!("  Title:      {}", lut.title);
    println!("  Size:       {}^3 ({} entries)", lut.size, lut.entry_count());
    println!(
        "  Domain:     [{}, {}, {}] - [{}, {}, {}]",
        lut.domain_min[0],
        lut.domain_min[1],
        lut.domain_min[2],
        lut.domain_max[0],
        lut.domain_max[1],
        lut.domain_max[2]
    );
    if let Some(diff) = Lut3D::identity(lut.size)
        .ok()
        .and_then(|identity| identity.max_abs_diff(&lut))
    {
        println!("  Max delta from identity: {:.6}", diff);
    }
    Ok(())
}

fn show_xmp(path: &Path) -> Result<()> {
    let adjustments =
        lutor_preset::read_xmp(path).with_context(|| format!("Failed to load: {}", path.display()))?;

    println!("{}", path.display());
    for (name, value) in adjustments.entries() {
        println!("  {:<16} {:>8.2}", name, value);
    }
    Ok(())
}
