//! `plume build`: run the pipeline once and report.

use anyhow::Result;

use crate::{
    build::{BuildReport, SiteBuilder},
    config::SiteConfig,
    core::BuildMode,
    log,
};

/// Build the site in `mode` with the default renderer.
pub fn build_site(config: SiteConfig, mode: BuildMode) -> Result<BuildReport> {
    log!("build"; "{} build of {}", mode.name(), config.get_root().display());

    let (_, report) = SiteBuilder::new(config, mode).build()?;

    for error in &report.plugin_errors {
        log!("warning"; "plugin skipped: {}", error);
    }
    log!("build"; "{}", report.summary());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_site_writes_pages() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/pages")).unwrap();
        fs::write(dir.path().join("content/pages/about.md"), "# About\n").unwrap();

        let report = build_site(test_site_config(dir.path(), ""), BuildMode::PRODUCTION).unwrap();
        assert_eq!(report.items["pages"], 1);
        assert!(dir.path().join("public/about/index.html").is_file());
    }

    #[test]
    fn test_broken_local_plugin_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("plugins")).unwrap();
        fs::write(dir.path().join("plugins/bad.toml"), "name = 3\n").unwrap();

        let report = build_site(test_site_config(dir.path(), ""), BuildMode::PRODUCTION).unwrap();
        assert_eq!(report.plugin_errors.len(), 1);
        assert!(report.plugins.is_empty());
    }
}
