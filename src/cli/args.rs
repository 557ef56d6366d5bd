//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Plume static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: plume.toml)
    #[arg(short = 'C', long, global = true, default_value = "plume.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// List discovered plugins in execution order
    #[command(visible_alias = "p")]
    Plugins,
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Development build: drafts follow `server.show_drafts`
    #[arg(short, long)]
    pub dev: bool,

    /// Show drafts in a development build regardless of config
    #[arg(short = 'D', long)]
    pub drafts: bool,

    /// Abort the build on any plugin or hook failure
    #[arg(short, long)]
    pub strict: bool,

    /// Remove the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Hide progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }

    /// Build arguments, defaulted for commands that don't take them.
    pub fn build_args(&self) -> BuildArgs {
        match &self.command {
            Commands::Build { build_args } => build_args.clone(),
            Commands::Plugins => BuildArgs::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from(["plume", "build", "--dev", "--drafts", "--strict", "-o", "dist"]);
        assert!(cli.is_build());
        let args = cli.build_args();
        assert!(args.dev && args.drafts && args.strict);
        assert!(!args.quiet);
        assert_eq!(cli.output, Some(PathBuf::from("dist")));
        assert_eq!(cli.config, PathBuf::from("plume.toml"));
    }

    #[test]
    fn test_parse_plugins_command() {
        let cli = Cli::parse_from(["plume", "-C", "site.toml", "plugins"]);
        assert!(!cli.is_build());
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(!cli.build_args().dev);
    }
}
