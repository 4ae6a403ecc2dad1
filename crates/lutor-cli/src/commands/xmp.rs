//! Camera Raw preset command

use crate::XmpArgs;
use anyhow::{Context, Result};
use lutor_preset::{estimate, write_xmp};
use tracing::info;

pub fn run(args: XmpArgs) -> Result<()> {
    let original = super::load_image(&args.original)?;
    let stylized = super::load_image(&args.stylized)?;

    let adjustments = estimate(&original, &stylized).context("Failed to estimate adjustments")?;
    write_xmp(&args.output, &adjustments)
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        exposure = adjustments.exposure,
        temperature = adjustments.temperature,
        "XMP preset written"
    );
    Ok(())
}
