//! LUT generation command

use crate::LutArgs;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use lutor_lut::{cube, LutBuilder, LutError};
use tracing::info;

pub fn run(args: LutArgs, config: &Config) -> Result<()> {
    let mut options = config.lut.clone();
    if let Some(size) = args.size {
        options = options.with_size(size);
    }
    if let Some(max_samples) = args.max_samples {
        options = options.with_max_samples(max_samples);
    }
    if let Some(neighbors) = args.neighbors {
        options = options.with_neighbors(neighbors);
    }
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }
    if args.no_resize {
        options = options.with_auto_resize(false);
    }
    if args.strict {
        options = options.with_strict(true);
    }

    let original = super::load_image(&args.original)?;
    let stylized = super::load_image(&args.stylized)?;

    let builder = LutBuilder::new(options);
    let mut lut = match builder.build(&original, &stylized) {
        Err(LutError::Image(e)) if e.is_dimension_mismatch() => {
            bail!("{e}: images must share dimensions when resampling is disabled")
        }
        built => built.context("Failed to build LUT")?,
    };
    if let Some(title) = args.title.or_else(|| config.title.clone()) {
        lut = lut.with_title(title);
    }

    cube::write_3d(&args.output, &lut)
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        size = lut.size,
        "3D LUT written"
    );
    Ok(())
}
