//! Hook dispatcher: runs registered handlers on the build thread.
//!
//! - [`fire`](HookDispatcher::fire) runs every handler against the same
//!   mutable target, in registration order.
//! - [`fold`](HookDispatcher::fold) threads a value through the handlers,
//!   each one receiving the previous handler's output.
//!
//! A failing handler never stops the handlers after it. Outside strict mode
//! the failure is logged and the build moves on; in strict mode failures are
//! collected and returned once the whole firing has finished.

use std::sync::Arc;

use thiserror::Error;

use super::{FoldContext, FoldValue, Handler, Hook, HookEntry, HookRegistry, HookTarget, PluginApi};
use crate::{config::SiteConfig, content::ContentItem, core::BuildMode, log};

/// One handler failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub plugin: String,
    pub message: String,
}

impl std::fmt::Display for HookFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.plugin, self.message)
    }
}

/// Hook handlers failed during a strict-mode firing.
#[derive(Debug, Error)]
#[error("hook `{hook}` failed: {}", format_failures(.failures))]
pub struct HookError {
    pub hook: Hook,
    pub failures: Vec<HookFailure>,
}

fn format_failures(failures: &[HookFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Dispatches hooks to registered handlers.
#[derive(Debug)]
pub struct HookDispatcher {
    registry: HookRegistry,
    strict: bool,
    mode: BuildMode,
    /// Snapshot handed to plugins through [`PluginApi::config`].
    config: Arc<SiteConfig>,
}

impl HookDispatcher {
    pub fn new(config: Arc<SiteConfig>, mode: BuildMode) -> Self {
        Self {
            registry: HookRegistry::new(),
            strict: config.plugins.strict_mode,
            mode,
            config,
        }
    }

    /// Drop every registered handler. Runs once at the start of each build.
    pub fn reset(&mut self) {
        self.registry.clear();
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HookRegistry {
        &mut self.registry
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Refresh the config snapshot after a phase that may have changed it.
    pub fn set_config(&mut self, config: Arc<SiteConfig>) {
        self.strict = config.plugins.strict_mode;
        self.config = config;
    }

    fn api_for(&self, entry: &HookEntry) -> PluginApi {
        PluginApi::new(
            entry.plugin.clone(),
            entry.options.clone(),
            self.config.clone(),
            self.mode,
        )
    }

    /// Run every handler for `hook` against `target`.
    pub fn fire(&self, hook: Hook, target: &mut HookTarget<'_>) -> Result<(), HookError> {
        let entries = self.registry.entries(hook);
        if entries.is_empty() {
            return Ok(());
        }
        crate::debug!("hooks"; "firing `{}` ({} handlers)", hook, entries.len());

        let mut failures = Vec::new();
        for entry in entries {
            let result = match &entry.handler {
                Handler::Fire(f) => f(target, &self.api_for(entry)),
                Handler::Fold(_) => Err(anyhow::anyhow!(
                    "fold handler registered for fire hook `{hook}`"
                )),
            };
            if let Err(err) = result {
                self.record(hook, entry, format!("{err:#}"), &mut failures);
            }
        }

        self.finish(hook, failures)
    }

    /// Thread `value` through every handler for `hook`.
    ///
    /// A handler that returns nothing or fails leaves the value as it was.
    pub fn fold(
        &self,
        hook: Hook,
        value: FoldValue,
        ctx: &FoldContext<'_>,
    ) -> Result<FoldValue, HookError> {
        let entries = self.registry.entries(hook);
        let mut value = value;
        let mut failures = Vec::new();

        for entry in entries {
            let result = match &entry.handler {
                Handler::Fold(f) => f(&value, ctx, &self.api_for(entry)),
                Handler::Fire(_) => Err(anyhow::anyhow!(
                    "fire handler registered for fold hook `{hook}`"
                )),
            };
            match result {
                Ok(Some(next)) if value.same_variant(&next) => value = next,
                Ok(Some(next)) => {
                    let message = format!(
                        "returned {} where {} was expected",
                        next.variant_name(),
                        value.variant_name()
                    );
                    self.record(hook, entry, message, &mut failures);
                }
                Ok(None) => {}
                Err(err) => self.record(hook, entry, format!("{err:#}"), &mut failures),
            }
        }

        self.finish(hook, failures).map(|()| value)
    }

    /// Fold a text value (`beforeContentParse`, `beforeMarkdown`, `afterMarkdown`).
    pub fn fold_text(
        &self,
        hook: Hook,
        text: String,
        ctx: &FoldContext<'_>,
    ) -> Result<String, HookError> {
        // fold never changes the variant
        let folded = self.fold(hook, FoldValue::Text(text), ctx)?;
        Ok(folded.into_text().unwrap_or_default())
    }

    /// Fold a content item (`afterContentParse`).
    pub fn fold_item(
        &self,
        hook: Hook,
        item: ContentItem,
        ctx: &FoldContext<'_>,
    ) -> Result<ContentItem, HookError> {
        let folded = self.fold(hook, FoldValue::Item(Box::new(item)), ctx)?;
        Ok(folded.into_item().unwrap_or_default())
    }

    fn record(&self, hook: Hook, entry: &HookEntry, message: String, failures: &mut Vec<HookFailure>) {
        log!("error"; "plugin `{}` failed in `{}`: {}", entry.plugin, hook, message);
        if self.strict {
            failures.push(HookFailure {
                plugin: entry.plugin.to_string(),
                message,
            });
        }
    }

    fn finish(&self, hook: Hook, failures: Vec<HookFailure>) -> Result<(), HookError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(HookError { hook, failures })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
