//! Finding plugin manifests on disk.
//!
//! ```text
//! plugins/
//!   reading-time.toml          local
//! packages/
//!   plume-plugin-seo/          package
//!     plugin.toml
//!   @acme/
//!     plume-plugin-feed/       scoped package
//!       plugin.toml
//! ```
//!
//! Both directories are listed non-recursively (plus one level for scopes)
//! and sorted by name so discovery order is stable.

use std::fs;
use std::path::{Path, PathBuf};

use super::SourceKind;
use crate::config::PluginsConfig;
use crate::core::FileKind;
use crate::debug;

/// Package directory name prefix.
pub const PACKAGE_PREFIX: &str = "plume-plugin-";

/// Manifest file inside a package.
pub const PACKAGE_MANIFEST: &str = "plugin.toml";

/// A plugin found on disk, not yet loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Name guessed from the file or package name, used by the allow-list.
    pub name: String,
    /// Manifest path (may not exist for a broken package).
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl Candidate {
    /// Whether `name` refers to this candidate, with or without the package
    /// prefix and scope.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || short_name(&self.name) == name
    }
}

/// `@scope/plume-plugin-seo` -> `seo`
fn short_name(name: &str) -> &str {
    let bare = name.rsplit('/').next().unwrap_or(name);
    bare.strip_prefix(PACKAGE_PREFIX).unwrap_or(bare)
}

/// List local manifests, then packages.
pub fn discover(config: &PluginsConfig) -> Vec<Candidate> {
    let mut found = discover_local(&config.dir);
    found.extend(discover_packages(&config.packages_dir));
    debug!("plugins"; "discovered {} candidate(s)", found.len());
    found
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
    paths.sort();
    paths
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn discover_local(dir: &Path) -> Vec<Candidate> {
    sorted_entries(dir)
        .into_iter()
        .filter(|p| p.is_file() && FileKind::is_plugin_manifest(p))
        .map(|path| Candidate {
            name: path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
            path,
            kind: SourceKind::Local,
        })
        .collect()
}

fn discover_packages(dir: &Path) -> Vec<Candidate> {
    let mut found = Vec::new();
    for entry in sorted_entries(dir) {
        if !entry.is_dir() {
            continue;
        }
        let name = file_name(&entry).to_string();
        if name.starts_with(PACKAGE_PREFIX) {
            found.push(package(name, &entry));
        } else if name.starts_with('@') {
            for scoped in sorted_entries(&entry) {
                let inner = file_name(&scoped);
                if scoped.is_dir() && inner.starts_with(PACKAGE_PREFIX) {
                    found.push(package(format!("{name}/{inner}"), &scoped));
                }
            }
        }
    }
    found
}

fn package(name: String, dir: &Path) -> Candidate {
    Candidate {
        name,
        path: dir.join(PACKAGE_MANIFEST),
        kind: SourceKind::Package,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn config(root: &Path) -> PluginsConfig {
        PluginsConfig {
            dir: root.join("plugins"),
            packages_dir: root.join("packages"),
            ..Default::default()
        }
    }

    #[test]
    fn test_discovers_both_sources() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "plugins/b.toml");
        touch(root, "plugins/A.TOML");
        touch(root, "plugins/readme.md");
        touch(root, "packages/plume-plugin-seo/plugin.toml");
        touch(root, "packages/other-package/plugin.toml");
        touch(root, "packages/@acme/plume-plugin-feed/plugin.toml");
        touch(root, "packages/@acme/unrelated/plugin.toml");
        fs::create_dir_all(root.join("packages/plume-plugin-empty")).unwrap();

        let found = discover(&config(root));
        let names: Vec<_> = found.iter().map(|c| (c.name.as_str(), c.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("A", SourceKind::Local),
                ("b", SourceKind::Local),
                ("@acme/plume-plugin-feed", SourceKind::Package),
                ("plume-plugin-empty", SourceKind::Package),
                ("plume-plugin-seo", SourceKind::Package),
            ]
        );
        assert!(found[4].path.ends_with("plume-plugin-seo/plugin.toml"));
    }

    #[test]
    fn test_missing_directories() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&config(dir.path())).is_empty());
    }

    #[test]
    fn test_answers_to_short_name() {
        let candidate = Candidate {
            name: "@acme/plume-plugin-feed".into(),
            path: PathBuf::new(),
            kind: SourceKind::Package,
        };
        assert!(candidate.answers_to("feed"));
        assert!(candidate.answers_to("@acme/plume-plugin-feed"));
        assert!(!candidate.answers_to("seo"));
    }
}
