//! Plume - a static site generator with a plugin pipeline.
//!
//! The `plume` binary is a thin wrapper over this library. Embedders drive
//! the same pipeline through [`build::SiteBuilder`], adding compiled-in
//! plugins with [`build::SiteBuilder::with_plugin`] (see [`plugin::FnPlugin`])
//! and their own template engine with [`build::SiteBuilder::with_renderer`].

pub mod build;
pub mod cli;
pub mod collection;
pub mod config;
pub mod content;
pub mod core;
pub mod hooks;
pub mod logger;
pub mod paginate;
pub mod plugin;
pub mod tags;
pub mod utils;
