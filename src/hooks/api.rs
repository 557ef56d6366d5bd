//! Capabilities handed to every hook handler.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::SiteConfig,
    core::BuildMode,
    logger::{self, Level},
    utils::path::join_segments,
};

/// Plugin-facing API: read-only config, plugin options, file helpers and
/// logging under the plugin's name.
///
/// Relative paths given to [`read_file`](Self::read_file) and
/// [`write_file`](Self::write_file) resolve against the site root.
#[derive(Debug, Clone)]
pub struct PluginApi {
    plugin: Arc<str>,
    options: Arc<serde_json::Value>,
    config: Arc<SiteConfig>,
    mode: BuildMode,
}

impl PluginApi {
    pub fn new(
        plugin: Arc<str>,
        options: Arc<serde_json::Value>,
        config: Arc<SiteConfig>,
        mode: BuildMode,
    ) -> Self {
        Self {
            plugin,
            options,
            config,
            mode,
        }
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin
    }

    /// Config as of the start of the current phase.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Schema defaults merged with `plugins.config.<name>`.
    pub fn options(&self) -> &serde_json::Value {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.get(key)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.root_join(path)
        }
    }

    /// Write `contents`, creating parent directories. Returns the full path.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.resolve(path.as_ref());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        Ok(path)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = self.resolve(path.as_ref());
        fs::read_to_string(&path).with_context(|| format!("failed to read `{}`", path.display()))
    }

    pub fn join_path<S: AsRef<str>>(&self, segments: &[S]) -> PathBuf {
        join_segments(segments)
    }

    pub fn log(&self, message: &str, level: Level) {
        logger::log_level(&self.plugin, level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;

    fn api(root: &Path) -> PluginApi {
        PluginApi::new(
            Arc::from("demo"),
            Arc::new(serde_json::json!({ "limit": 3 })),
            Arc::new(test_site_config(root, "")),
            BuildMode::PRODUCTION,
        )
    }

    #[test]
    fn test_write_then_read_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(dir.path());

        let written = api
            .write_file(api.join_path(&["public", "data", "tags.json"]), "{}")
            .unwrap();
        assert!(written.ends_with("public/data/tags.json"));
        assert!(written.starts_with(api.config().get_root()));
        assert_eq!(api.read_file("public/data/tags.json").unwrap(), "{}");
    }

    #[test]
    fn test_read_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = api(dir.path()).read_file("nope.txt").unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn test_options_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(dir.path());
        assert_eq!(api.plugin_name(), "demo");
        assert_eq!(api.option("limit"), Some(&serde_json::json!(3)));
        assert!(api.option("missing").is_none());
        assert!(!api.mode().is_dev());
    }
}
