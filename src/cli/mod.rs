//! Command-line interface module.

mod args;
pub mod build;
pub mod plugins;

pub use args::{BuildArgs, Cli, Commands};
