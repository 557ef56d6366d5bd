//! `[plugins]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [plugins]
//! enabled = true                     # master switch
//! strict_mode = false                # plugin/hook failures abort the build
//! order = ["seo", "reading-time"]    # explicit execution order
//! plugins = ["seo", "reading-time"]  # allow-list (empty = every discovered plugin)
//! dir = "plugins"                    # local plugin manifests
//! packages_dir = "packages"          # installed `plume-plugin-*` packages
//!
//! [plugins.config.reading-time]
//! words_per_minute = 220
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Plugin loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub enabled: bool,

    #[serde(alias = "strictMode")]
    pub strict_mode: bool,

    /// Names placed first, in this order. Remaining plugins follow in
    /// discovery order.
    pub order: Vec<String>,

    /// Only plugins named here are loaded. Empty means no filter.
    pub plugins: Vec<String>,

    pub dir: PathBuf,

    #[serde(alias = "packagesDir")]
    pub packages_dir: PathBuf,

    /// Per-plugin options, keyed by plugin name.
    pub config: BTreeMap<String, serde_json::Value>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strict_mode: false,
            order: Vec::new(),
            plugins: Vec::new(),
            dir: PathBuf::from("plugins"),
            packages_dir: PathBuf::from("packages"),
            config: BTreeMap::new(),
        }
    }
}

impl PluginsConfig {
    /// Whether `name` passes the allow-list.
    pub fn allows(&self, name: &str) -> bool {
        self.plugins.is_empty() || self.plugins.iter().any(|p| p == name)
    }

    /// Options configured for one plugin (`Null` if none).
    pub fn options_for(&self, name: &str) -> serde_json::Value {
        self.config
            .get(name)
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut seen = rustc_hash::FxHashSet::default();
        for name in &self.order {
            if !seen.insert(name.as_str()) {
                diag.warn(
                    FieldPath::new("plugins.order"),
                    format!("`{name}` is listed more than once, later entries are ignored"),
                );
            }
        }
        for (name, options) in &self.config {
            if !options.is_object() {
                diag.error_with_hint(
                    FieldPath::new("plugins.config"),
                    format!("options for `{name}` must be a table"),
                    format!("use a [plugins.config.{name}] table"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_plugins_defaults() {
        let config = test_parse_config("");
        assert!(config.plugins.enabled);
        assert!(!config.plugins.strict_mode);
        assert!(config.plugins.order.is_empty());
        assert!(config.plugins.allows("anything"));
    }

    #[test]
    fn test_plugins_camel_case_aliases() {
        let config = test_parse_config("[plugins]\nstrictMode = true\npackagesDir = \"vendor\"");
        assert!(config.plugins.strict_mode);
        assert_eq!(config.plugins.packages_dir.to_str(), Some("vendor"));
    }

    #[test]
    fn test_allow_list_and_options() {
        let config = test_parse_config(
            "[plugins]\nplugins = [\"seo\"]\n[plugins.config.seo]\ntwitter = \"@me\"",
        );
        assert!(config.plugins.allows("seo"));
        assert!(!config.plugins.allows("analytics"));
        assert_eq!(config.plugins.options_for("seo")["twitter"], "@me");
        assert!(config.plugins.options_for("analytics").is_null());
    }

    #[test]
    fn test_non_table_options_rejected() {
        let config = test_parse_config("[plugins.config]\nseo = 3");
        let mut diag = ConfigDiagnostics::new();
        config.plugins.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_duplicate_order_warns() {
        let config = test_parse_config("[plugins]\norder = [\"a\", \"b\", \"a\"]");
        let mut diag = ConfigDiagnostics::new();
        config.plugins.validate(&mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
