//! Hook registry: ordered handlers per hook point.
//!
//! Handlers are kept in registration order, which is plugin execution
//! order. The registry is owned by one [`HookDispatcher`](super::HookDispatcher)
//! and cleared at the start of every build.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{FoldContext, FoldValue, Hook, HookKind, HookTarget, PluginApi};

/// Fire handler: mutate the target in place.
pub type FireFn = dyn Fn(&mut HookTarget<'_>, &PluginApi) -> anyhow::Result<()> + Send + Sync;

/// Fold handler: `Ok(None)` keeps the incoming value.
pub type FoldFn = dyn Fn(&FoldValue, &FoldContext<'_>, &PluginApi) -> anyhow::Result<Option<FoldValue>>
    + Send
    + Sync;

/// A hook handler contributed by a plugin.
#[derive(Clone)]
pub enum Handler {
    Fire(Arc<FireFn>),
    Fold(Arc<FoldFn>),
}

impl Handler {
    pub fn fire<F>(f: F) -> Self
    where
        F: Fn(&mut HookTarget<'_>, &PluginApi) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Fire(Arc::new(f))
    }

    pub fn fold<F>(f: F) -> Self
    where
        F: Fn(&FoldValue, &FoldContext<'_>, &PluginApi) -> anyhow::Result<Option<FoldValue>>
            + Send
            + Sync
            + 'static,
    {
        Self::Fold(Arc::new(f))
    }

    pub fn kind(&self) -> HookKind {
        match self {
            Self::Fire(_) => HookKind::Fire,
            Self::Fold(_) => HookKind::Fold,
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fire(_) => f.write_str("Handler::Fire"),
            Self::Fold(_) => f.write_str("Handler::Fold"),
        }
    }
}

/// One registered handler.
#[derive(Debug, Clone)]
pub struct HookEntry {
    pub plugin: Arc<str>,
    pub handler: Handler,
    /// Resolved plugin options, shared by all of the plugin's handlers.
    pub options: Arc<serde_json::Value>,
}

/// Registry of hook handlers organized by hook point.
#[derive(Debug, Default)]
pub struct HookRegistry {
    handlers: FxHashMap<Hook, Vec<HookEntry>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it runs after everything already registered.
    pub fn register(&mut self, hook: Hook, entry: HookEntry) {
        crate::debug!("hooks"; "{} registered `{}`", entry.plugin, hook);
        self.handlers.entry(hook).or_default().push(entry);
    }

    /// Remove every handler a plugin registered.
    pub fn unregister_plugin(&mut self, plugin: &str) {
        for entries in self.handlers.values_mut() {
            entries.retain(|e| &*e.plugin != plugin);
        }
        self.handlers.retain(|_, entries| !entries.is_empty());
    }

    /// Handlers for a hook in execution order.
    pub fn entries(&self, hook: Hook) -> &[HookEntry] {
        self.handlers.get(&hook).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_handlers(&self, hook: Hook) -> bool {
        !self.entries(hook).is_empty()
    }

    pub fn handler_count(&self, hook: Hook) -> usize {
        self.entries(hook).len()
    }

    /// Hooks with at least one handler, in build order.
    pub fn registered_hooks(&self) -> Vec<Hook> {
        Hook::ALL
            .into_iter()
            .filter(|hook| self.has_handlers(*hook))
            .collect()
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
