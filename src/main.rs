//! Plume - a static site generator with a plugin pipeline.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use plume::cli::{Cli, Commands, build::build_site, plugins::list_plugins};
use plume::config::SiteConfig;
use plume::core::BuildMode;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { build_args } => {
            build_site(config, BuildMode::from_dev_flag(build_args.dev)).map(|_| ())
        }
        Commands::Plugins => list_plugins(&config),
    }
}
