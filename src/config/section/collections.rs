//! `[collections.<name>]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [collections.posts]
//! path = "posts/:year"            # reduced to `posts` before walking
//! layout = "post"
//! permalink = "/:year/:month/:slug/"
//! sort_by = "date"
//! sort_order = "desc"
//! ```
//!
//! When no collection is configured, `posts` and `pages` are provided.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Sort direction for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// One named content collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Source path relative to `build.content`, may contain date tokens.
    pub path: String,
    pub layout: Option<String>,
    pub permalink: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: String,
    #[serde(alias = "sortOrder")]
    pub sort_order: SortOrder,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            layout: None,
            permalink: None,
            sort_by: "date".to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

impl CollectionConfig {
    /// Directory part of `path` before the first `:token` segment.
    ///
    /// `posts/:year/:month` -> `posts`
    pub fn static_prefix(&self) -> &str {
        let end = self
            .path
            .split('/')
            .take_while(|seg| !seg.starts_with(':'))
            .map(|seg| seg.len() + 1)
            .sum::<usize>();
        self.path[..end.min(self.path.len())].trim_end_matches('/')
    }

    /// Why this collection cannot be loaded, if anything.
    fn problem(&self) -> Option<&'static str> {
        if self.path.trim().is_empty() {
            Some("has no `path`")
        } else if Path::new(&self.path).is_absolute() {
            Some("must use a `path` relative to the content directory")
        } else if self.static_prefix().is_empty() {
            Some("has a `path` that starts with a template token")
        } else {
            None
        }
    }
}

/// Collections used when the config defines none.
pub fn default_collections() -> BTreeMap<String, CollectionConfig> {
    BTreeMap::from([
        (
            "posts".to_string(),
            CollectionConfig {
                path: "posts".to_string(),
                layout: Some("post".to_string()),
                permalink: Some("/posts/:slug/".to_string()),
                sort_by: "date".to_string(),
                sort_order: SortOrder::Desc,
            },
        ),
        (
            "pages".to_string(),
            CollectionConfig {
                path: "pages".to_string(),
                layout: Some("page".to_string()),
                permalink: Some("/:slug/".to_string()),
                sort_by: "title".to_string(),
                sort_order: SortOrder::Asc,
            },
        ),
    ])
}

/// Drop collections that cannot be loaded, warning for each.
pub(crate) fn retain_valid(
    collections: &mut BTreeMap<String, CollectionConfig>,
    diag: &mut ConfigDiagnostics,
) {
    collections.retain(|name, collection| match collection.problem() {
        Some(problem) => {
            diag.warn(
                FieldPath::new("collections"),
                format!("collection `{name}` {problem}, skipping it"),
            );
            false
        }
        None => true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_collections() {
        let config = test_parse_config("");
        assert_eq!(config.collections.len(), 2);
        let posts = &config.collections["posts"];
        assert_eq!(posts.permalink.as_deref(), Some("/posts/:slug/"));
        assert_eq!(posts.sort_order, SortOrder::Desc);
        let pages = &config.collections["pages"];
        assert_eq!(pages.sort_by, "title");
        assert_eq!(pages.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_configured_collection_replaces_defaults() {
        let config = test_parse_config(
            "[collections.notes]\npath = \"notes\"\nsortBy = \"title\"\nsortOrder = \"asc\"",
        );
        assert_eq!(config.collections.len(), 1);
        let notes = &config.collections["notes"];
        assert_eq!(notes.sort_by, "title");
        assert_eq!(notes.sort_order, SortOrder::Asc);
        assert!(notes.layout.is_none());
    }

    #[test]
    fn test_static_prefix() {
        let mut c = CollectionConfig {
            path: "posts/:year/:month".into(),
            ..Default::default()
        };
        assert_eq!(c.static_prefix(), "posts");
        c.path = "blog/posts".into();
        assert_eq!(c.static_prefix(), "blog/posts");
        c.path = "notes/".into();
        assert_eq!(c.static_prefix(), "notes");
        c.path = ":year".into();
        assert_eq!(c.static_prefix(), "");
    }

    #[test]
    fn test_invalid_collections_skipped_with_warning() {
        let mut collections = BTreeMap::from([
            ("ok".to_string(), CollectionConfig { path: "ok".into(), ..Default::default() }),
            ("empty".to_string(), CollectionConfig::default()),
            ("abs".to_string(), CollectionConfig { path: "/etc".into(), ..Default::default() }),
        ]);
        let mut diag = ConfigDiagnostics::new();
        retain_valid(&mut collections, &mut diag);
        assert_eq!(collections.keys().collect::<Vec<_>>(), vec!["ok"]);
        assert_eq!(diag.warnings().len(), 2);
        assert!(!diag.has_errors());
    }
}
