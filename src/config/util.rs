//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Base path of a site URL, with a leading slash and no trailing slash.
///
/// Uses the `url` crate so ports, credentials, queries and fragments never
/// leak into the path. Returns `None` if the URL is invalid.
///
/// ```ignore
/// base_path_from_url("https://example.github.io/my-project/") -> Some("/my-project")
/// base_path_from_url("https://example.com")                   -> Some("")
/// base_path_from_url("invalid")                               -> None
/// ```
pub fn base_path_from_url(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;
    let path = parsed.path().trim_matches('/');
    if path.is_empty() {
        Some(String::new())
    } else {
        Some(format!("/{path}"))
    }
}

/// Find config file by searching upward from `start`.
///
/// An absolute `config_name` that exists is returned as-is.
///
/// ```text
/// /home/user/site/content/posts/  ← start
/// /home/user/site/plume.toml      ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================
