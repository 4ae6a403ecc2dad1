//! LUT application command

use crate::ApplyArgs;
use anyhow::{Context, Result};
use lutor_lut::cube;
use tracing::info;

pub fn run(args: ApplyArgs) -> Result<()> {
    let lut = cube::read_3d(&args.lut)
        .with_context(|| format!("Failed to load LUT: {}", args.lut.display()))?;
    let image = super::load_image(&args.input)?;

    let result = lut.apply_image(&image);
    super::save_image(&args.output, &result)?;

    info!(
        lut = %args.lut.display(),
        output = %args.output.display(),
        "LUT applied"
    );
    Ok(())
}
