//! Site configuration management for `plume.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build        # [build]
//! │   ├── collections  # [collections.<name>]
//! │   ├── pagination   # [pagination]
//! │   ├── plugins      # [plugins]
//! │   ├── server       # [server]
//! │   └── site         # [site]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # URL base path, config file lookup
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! Loading order: parse (unknown keys warned) → CLI overrides → path
//! normalization → validation. Invalid collections are dropped with a
//! warning; every other validation problem is collected and reported at once.

pub mod section;
pub mod types;
mod util;

pub use section::{
    BuildSectionConfig, CollectionConfig, PaginationConfig, PluginsConfig, ServerConfig,
    SiteSectionConfig, SortOrder, default_collections,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::{base_path_from_url, find_config_file};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
    utils::path::{normalize_path, resolve_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing plume.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub plugins: PluginsConfig,

    #[serde(default = "default_collections")]
    pub collections: BTreeMap<String, CollectionConfig>,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            site: SiteSectionConfig::default(),
            build: BuildSectionConfig::default(),
            plugins: PluginsConfig::default(),
            collections: default_collections(),
            pagination: PaginationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cli.config, &cwd).ok_or_else(|| {
            ConfigError::Validation(format!(
                "config file `{}` not found in `{}` or any parent directory",
                cli.config.display(),
                cwd.display()
            ))
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.apply_cli(cli);
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Load, normalize and validate a config file without CLI overrides.
    pub fn open(path: &Path) -> Result<Self> {
        let mut config = Self::from_path(path)?;
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Read a config file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // accessors
    // ========================================================================

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    pub fn content_dir(&self) -> &Path {
        &self.build.content
    }

    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    pub fn assets_dir(&self) -> &Path {
        &self.build.assets
    }

    /// URL path prefix derived from `site.url` (`""` or `/sub/path`).
    ///
    /// Computed on demand so hooks that rewrite `site.url` are honoured.
    pub fn base_path(&self) -> String {
        self.site
            .url
            .as_deref()
            .and_then(base_path_from_url)
            .unwrap_or_default()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of the file contents.
    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        if let Commands::Build { build_args } = &cli.command {
            self.apply_build_args(build_args);
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);
        crate::logger::set_quiet(args.quiet);

        self.build.clean |= args.clean;
        self.plugins.strict_mode |= args.strict;
        self.server.show_drafts |= args.drafts;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve every configured directory against the site root.
    pub fn finalize(&mut self) {
        let root = normalize_path(&self.root);
        self.set_root(&root);

        self.build.content = resolve_path(&self.build.content, &root);
        self.build.output = resolve_path(&self.build.output, &root);
        self.build.assets = resolve_path(&self.build.assets, &root);
        self.plugins.dir = resolve_path(&self.plugins.dir, &root);
        self.plugins.packages_dir = resolve_path(&self.plugins.packages_dir, &root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, dropping unusable collections.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&mut self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        section::retain_valid(&mut self.collections, &mut diag);
        self.site.validate(&mut diag);
        self.plugins.validate(&mut diag);
        self.pagination.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with a minimal `[site]` section.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("[site]\ntitle = \"Test\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `root` with paths resolved, as the build sees it.
#[cfg(test)]
pub fn test_site_config(root: &Path, extra: &str) -> SiteConfig {
    let mut config = test_parse_config(extra);
    config.set_root(root);
    config.config_path = root.join("plume.toml");
    config.finalize();
    config.validate().unwrap();
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[site\ntitle = \"My Blog\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.get_root(), Path::new(""));
        assert_eq!(config.pagination.size, 10);
        assert!(config.plugins.enabled);
        assert_eq!(config.base_path(), "");
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\ntitle = \"Test\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.site.title, "Test");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[site]\ntitle = \"Test\"\n[plugins]\nstrictMode = true";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_base_path_from_site_url() {
        let config = test_parse_config("url = \"https://example.com/blog/\"");
        assert_eq!(config.base_path(), "/blog");
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_site_config(dir.path(), "[build]\noutput = \"dist\"");
        let root = normalize_path(dir.path());
        assert_eq!(config.output_dir(), root.join("dist"));
        assert_eq!(config.content_dir(), root.join("content"));
        assert_eq!(config.plugins.dir, root.join("plugins"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = test_parse_config(
            "url = \"not a url\"\n[pagination]\nsize = 0\n[collections.bad]\npath = \"\"",
        );
        let err = config.validate().unwrap_err();
        let diag = match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => diag,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(diag.len(), 2);
        assert!(config.collections.is_empty());
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plume.toml");
        fs::write(&path, "[site]\ntitle = \"From disk\"\n").unwrap();
        let config = SiteConfig::open(&path).unwrap();
        assert_eq!(config.site.title, "From disk");
        assert_eq!(config.get_root(), normalize_path(dir.path()));
    }
}
