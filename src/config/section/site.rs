//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! description = "Notes on systems programming"
//! author = "Jane Doe"
//! url = "https://example.com/blog/"   # path component becomes the base path
//!
//! [site.extra]
//! twitter = "@jane"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Site metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    pub title: String,
    pub description: String,
    pub author: String,

    /// Public URL of the deployed site.
    pub url: Option<String>,

    /// Free-form values passed through to templates and plugins.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SiteSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url) = &self.url
            && url::Url::parse(url).is_err()
        {
            diag.error_with_hint(
                FieldPath::new("site.url"),
                format!("`{url}` is not a valid URL"),
                "use an absolute URL such as \"https://example.com/\"",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, SiteConfig};

    #[test]
    fn test_site_section() {
        let config = SiteConfig::from_str(
            "[site]\ntitle = \"Blog\"\nurl = \"https://example.com/\"\n[site.extra]\ntheme = \"dark\"",
        )
        .unwrap();
        assert_eq!(config.site.title, "Blog");
        assert_eq!(config.site.extra["theme"], "dark");
    }

    #[test]
    fn test_invalid_url_is_error() {
        let config = SiteConfig::from_str("[site]\nurl = \"example.com\"").unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
