//! Histogram-matching color transfer command

use crate::TransferArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use lutor_color::transfer;
use tracing::info;

pub fn run(args: TransferArgs, config: &Config) -> Result<()> {
    let mut options = config.transfer.clone();
    if let Some(strength) = args.strength {
        options = options.with_strength(strength);
    }
    if args.no_resize {
        options = options.with_auto_resize(false);
    }

    let content = super::load_image(&args.content)?;
    let style = super::load_image(&args.style)?;

    let result = transfer(&content, &style, &options).with_context(|| {
        format!(
            "Color transfer failed: {} -> {}",
            args.style.display(),
            args.content.display()
        )
    })?;
    super::save_image(&args.output, &result)?;

    info!(
        output = %args.output.display(),
        strength = options.strength,
        "color transfer written"
    );
    Ok(())
}
