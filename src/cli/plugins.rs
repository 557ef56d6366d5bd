//! `plume plugins`: show what a build would load, in execution order.

use anyhow::Result;

use crate::{config::SiteConfig, log, plugin::PluginRegistry};

pub fn list_plugins(config: &SiteConfig) -> Result<()> {
    if !config.plugins.enabled {
        log!("plugins"; "plugins are disabled (plugins.enabled = false)");
        return Ok(());
    }

    let mut registry = PluginRegistry::load(&config.plugins, &[]);
    registry.order(&config.plugins.order);

    if registry.is_empty() {
        log!("plugins"; "no plugins found in {}", config.plugins.dir.display());
    }
    for line in describe(&registry, config) {
        log!("plugins"; "{}", line);
    }
    for error in registry.errors() {
        log!("error"; "{}", error);
    }
    Ok(())
}

/// One line per plugin: position, name, version, source and hooks.
fn describe(registry: &PluginRegistry, config: &SiteConfig) -> Vec<String> {
    registry
        .plugins()
        .iter()
        .enumerate()
        .map(|(idx, plugin)| {
            let hooks: Vec<&str> = plugin.hooks.iter().map(|(hook, _)| hook.name()).collect();
            let source = plugin
                .source
                .as_ref()
                .map(|path| format!(" {}", config.root_relative(path).display()))
                .unwrap_or_default();
            format!(
                "{}. {} v{} ({}){} [{}]",
                idx + 1,
                plugin.name(),
                plugin.version(),
                plugin.kind,
                source,
                hooks.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_describe_in_dependency_order() {
        let dir = TempDir::new().unwrap();
        let plugins = dir.path().join("plugins");
        fs::create_dir_all(&plugins).unwrap();
        fs::write(
            plugins.join("a-feed.toml"),
            "name = \"feed\"\nversion = \"1.0.0\"\ndependencies = [\"tidy\"]\n\n[hooks]\nafterBuild = [\"true\"]\n",
        )
        .unwrap();
        fs::write(
            plugins.join("b-tidy.toml"),
            "name = \"tidy\"\nversion = \"0.2.0\"\n\n[hooks]\nafterMarkdown = [\"cat\"]\n",
        )
        .unwrap();

        let config = test_site_config(dir.path(), "");
        let mut registry = PluginRegistry::load(&config.plugins, &[]);
        registry.order(&config.plugins.order);

        let lines = describe(&registry, &config);
        assert_eq!(
            lines,
            [
                "1. tidy v0.2.0 (local) plugins/b-tidy.toml [afterMarkdown]",
                "2. feed v1.0.0 (local) plugins/a-feed.toml [afterBuild]",
            ]
        );
    }
}
