//! lutor - derive color grades from before/after image pairs
//!
//! Exports a `.cube` 3D LUT or a Camera Raw `.xmp` preset, transfers color
//! between images and previews LUTs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "lutor")]
#[command(author, version, about = "Derive color grades from before/after image pairs")]
#[command(long_about = "
Learns the color transform between an original image and a stylized version
of it, and exports it as a 3D LUT or a Camera Raw preset.

Examples:
  lutor lut before.jpg after.jpg -o look.cube
  lutor lut before.jpg after.jpg -o look.cube --size 33 --seed 7
  lutor xmp before.jpg after.jpg -o look.xmp
  lutor transfer photo.png reference.png -o graded.png --strength 0.7
  lutor apply photo.png --lut look.cube -o preview.png
  lutor info look.cube
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML file with default options
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the color distribution of one image to another
    #[command(visible_alias = "t")]
    Transfer(TransferArgs),

    /// Build a .cube 3D LUT from an image pair
    Lut(LutArgs),

    /// Estimate a Camera Raw .xmp preset from an image pair
    Xmp(XmpArgs),

    /// Apply a .cube LUT to an image
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Show the contents of a .cube or .xmp file
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

#[derive(Args)]
struct TransferArgs {
    /// Image to recolor
    content: PathBuf,

    /// Image providing the color distribution
    style: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Blend between content (0.0) and fully matched (1.0)
    #[arg(short, long)]
    strength: Option<f32>,

    /// Fail when the images differ in size
    #[arg(long)]
    no_resize: bool,
}

#[derive(Args)]
struct LutArgs {
    /// Original (ungraded) image
    original: PathBuf,

    /// Stylized (graded) version of the original
    stylized: PathBuf,

    /// Output .cube file
    #[arg(short, long)]
    output: PathBuf,

    /// Cube size per axis
    #[arg(short, long)]
    size: Option<usize>,

    /// Maximum number of color correspondences
    #[arg(long)]
    max_samples: Option<usize>,

    /// Neighbors blended per cell
    #[arg(short = 'k', long)]
    neighbors: Option<usize>,

    /// Seed for correspondence subsampling
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of resampling when the images differ in size
    #[arg(long)]
    no_resize: bool,

    /// Fail instead of writing an identity LUT when nothing can be learned
    #[arg(long)]
    strict: bool,

    /// TITLE written to the .cube file
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args)]
struct XmpArgs {
    /// Original (ungraded) image
    original: PathBuf,

    /// Stylized (graded) version of the original
    stylized: PathBuf,

    /// Output .xmp file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input image
    input: PathBuf,

    /// .cube LUT to apply
    #[arg(short, long)]
    lut: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// .cube or .xmp file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Transfer(args) => commands::transfer::run(args, &config),
        Commands::Lut(args) => commands::lut::run(args, &config),
        Commands::Xmp(args) => commands::xmp::run(args),
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_lut_flags() {
        let cli = Cli::try_parse_from([
            "lutor", "-vv", "lut", "a.png", "b.png", "-o", "x.cube", "--size", "33", "--seed", "9", "--strict",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Lut(args) = cli.command else {
            panic!("expected lut command");
        };
        assert_eq!(args.size, Some(33));
        assert_eq!(args.seed, Some(9));
        assert!(args.strict);
        assert!(!args.no_resize);
        assert_eq!(args.neighbors, None);
    }
}
