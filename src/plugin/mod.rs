//! Plugin discovery, loading, ordering and hook registration.
//!
//! # Sources
//!
//! | Kind      | Where                                                   |
//! |-----------|---------------------------------------------------------|
//! | `local`   | `*.toml` manifests in `plugins.dir`                     |
//! | `package` | `plume-plugin-*/plugin.toml` in `plugins.packages_dir`  |
//! | `builtin` | `Arc<dyn Plugin>` values compiled into the binary       |
//!
//! Every source produces the same [`Plugin`] trait object, so ordering and
//! registration never care where a plugin came from.

mod command;
mod discover;
mod error;
mod manifest;
mod order;
mod registry;
mod schema;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hooks::{Handler, Hook};

pub use command::CommandHook;
pub use discover::{Candidate, PACKAGE_PREFIX, discover};
pub use error::PluginError;
pub use manifest::{ManifestPlugin, load_manifest, parse_manifest};
pub use order::order_plugins;
pub use registry::PluginRegistry;
pub use schema::{ConfigSchema, OptionSpec, OptionType, resolve_options};

/// A set of hook handlers with a name, a version and dependencies.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Plugins that must run before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn config_schema(&self) -> ConfigSchema {
        ConfigSchema::new()
    }

    fn hooks(&self) -> Vec<(Hook, Handler)>;
}

/// Where a plugin was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Package,
    Builtin,
}

impl SourceKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Package => "package",
            Self::Builtin => "builtin",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated plugin with its provenance and handlers.
#[derive(Clone)]
pub struct LoadedPlugin {
    pub plugin: Arc<dyn Plugin>,
    /// Manifest path; `None` for builtins.
    pub source: Option<PathBuf>,
    pub kind: SourceKind,
    pub hooks: Vec<(Hook, Handler)>,
}

impl LoadedPlugin {
    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    pub fn version(&self) -> &str {
        self.plugin.version()
    }
}

impl fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("name", &self.name())
            .field("version", &self.version())
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("hooks", &self.hooks.iter().map(|(h, _)| *h).collect::<Vec<_>>())
            .finish()
    }
}

/// Plugin assembled from closures, mainly for compiled-in plugins and tests.
pub struct FnPlugin {
    name: String,
    version: String,
    dependencies: Vec<String>,
    schema: ConfigSchema,
    hooks: Vec<(Hook, Handler)>,
}

impl FnPlugin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: Vec::new(),
            schema: ConfigSchema::new(),
            hooks: Vec::new(),
        }
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.schema.insert(name.into(), spec);
        self
    }

    pub fn hook(mut self, hook: Hook, handler: Handler) -> Self {
        self.hooks.push((hook, handler));
        self
    }

    pub fn into_arc(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }
}

impl Plugin for FnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn config_schema(&self) -> ConfigSchema {
        self.schema.clone()
    }

    fn hooks(&self) -> Vec<(Hook, Handler)> {
        self.hooks.clone()
    }
}
