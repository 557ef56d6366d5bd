//! Loaded plugins for one build.
//!
//! The registry owns discovery, loading and validation. Failures never stop
//! the other plugins from loading; they are logged and kept so strict mode
//! can abort on them afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use super::{
    LoadedPlugin, Plugin, PluginError, SourceKind, discover, load_manifest, order_plugins,
    resolve_options,
};
use crate::config::PluginsConfig;
use crate::hooks::{Handler, Hook, HookEntry, HookKind, HookRegistry};
use crate::{debug, log};

#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<LoadedPlugin>,
    errors: Vec<PluginError>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover and load every allowed plugin, then append `builtins`.
    ///
    /// Does nothing when `plugins.enabled` is false.
    pub fn load(config: &PluginsConfig, builtins: &[Arc<dyn Plugin>]) -> Self {
        let mut registry = Self::new();
        if !config.enabled {
            debug!("plugins"; "plugins disabled");
            return registry;
        }

        for candidate in discover(config) {
            let allowed =
                config.plugins.is_empty() || config.plugins.iter().any(|n| candidate.answers_to(n));
            if !allowed {
                debug!("plugins"; "skipping `{}` (not in allow-list)", candidate.name);
                continue;
            }
            match load_manifest(&candidate.path) {
                Ok(manifest) => registry.add(Arc::new(manifest), Some(candidate.path), candidate.kind),
                Err(err) => registry.fail(err),
            }
        }

        for plugin in builtins {
            if config.allows(plugin.name()) {
                registry.add(plugin.clone(), None, SourceKind::Builtin);
            }
        }

        registry
    }

    /// Validate and keep one plugin. The first plugin with a name wins.
    pub fn add(&mut self, plugin: Arc<dyn Plugin>, source: Option<PathBuf>, kind: SourceKind) {
        let hooks = match validate(plugin.as_ref()) {
            Ok(hooks) => hooks,
            Err(message) => {
                let label = match (plugin.name().trim(), &source) {
                    ("", Some(path)) => path.display().to_string(),
                    (name, _) => name.to_string(),
                };
                self.fail(PluginError::validation(label, message));
                return;
            }
        };

        if let Some(existing) = self.plugins.iter().find(|p| p.name() == plugin.name()) {
            let message = format!("name already used by a {} plugin", existing.kind);
            self.fail(PluginError::validation(plugin.name(), message));
            return;
        }

        debug!(
            "plugins";
            "loaded `{}` v{} ({}, {} hooks)",
            plugin.name(),
            plugin.version(),
            kind,
            hooks.len()
        );
        self.plugins.push(LoadedPlugin {
            plugin,
            source,
            kind,
            hooks,
        });
    }

    fn fail(&mut self, err: PluginError) {
        log!("error"; "{}", err);
        self.errors.push(err);
    }

    /// Put plugins in execution order.
    pub fn order(&mut self, explicit: &[String]) {
        let plugins = std::mem::take(&mut self.plugins);
        self.plugins = order_plugins(plugins, explicit);
    }

    /// In strict mode, turn collected failures into one error.
    pub fn check_strict(&mut self, strict: bool) -> Result<(), PluginError> {
        if strict && !self.errors.is_empty() {
            return Err(PluginError::Strict(std::mem::take(&mut self.errors)));
        }
        Ok(())
    }

    /// Register every plugin's handlers, in plugin order.
    ///
    /// Returns the number of handlers registered.
    pub fn register_hooks(&self, hooks: &mut HookRegistry, config: &PluginsConfig) -> usize {
        let mut count = 0;
        for loaded in &self.plugins {
            let name: Arc<str> = Arc::from(loaded.name());
            let options = Arc::new(resolve_options(
                loaded.name(),
                &loaded.plugin.config_schema(),
                &config.options_for(loaded.name()),
            ));
            for (hook, handler) in &loaded.hooks {
                hooks.register(
                    *hook,
                    HookEntry {
                        plugin: name.clone(),
                        handler: handler.clone(),
                        options: options.clone(),
                    },
                );
                count += 1;
            }
        }
        count
    }

    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    pub fn errors(&self) -> &[PluginError] {
        &self.errors
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(LoadedPlugin::name).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

const fn kind_name(kind: HookKind) -> &'static str {
    match kind {
        HookKind::Fire => "fire",
        HookKind::Fold => "fold",
    }
}

/// Check a plugin's shape and collect its handlers.
fn validate(plugin: &dyn Plugin) -> Result<Vec<(Hook, Handler)>, String> {
    if plugin.name().trim().is_empty() {
        return Err("`name` must be a non-empty string".to_string());
    }
    if plugin.version().trim().is_empty() {
        return Err("`version` must be a non-empty string".to_string());
    }
    if plugin.dependencies().iter().any(|d| d.trim().is_empty()) {
        return Err("`dependencies` must only contain non-empty names".to_string());
    }
    for (option, spec) in plugin.config_schema() {
        if !spec.default.is_null() && !spec.kind.matches(&spec.default) {
            return Err(format!("default for option `{option}` is not a {}", spec.kind));
        }
    }

    let hooks = plugin.hooks();
    for (hook, handler) in &hooks {
        if handler.kind() != hook.kind() {
            return Err(format!(
                "`{hook}` needs a {} handler, got a {} handler",
                kind_name(hook.kind()),
                kind_name(handler.kind())
            ));
        }
    }
    Ok(hooks)
}
