//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"   # collection paths are relative to this
//! output = "public"
//! assets = "static"     # copied verbatim into the output directory
//! clean = false         # remove the output directory before building
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    pub content: PathBuf,
    pub output: PathBuf,
    pub assets: PathBuf,
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: PathBuf::from("public"),
            assets: PathBuf::from("static"),
            clean: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.assets, PathBuf::from("static"));
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_override() {
        let config = test_parse_config("[build]\ncontent = \"src\"\noutput = \"dist\"\nclean = true");
        assert_eq!(config.build.content, PathBuf::from("src"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(config.build.clean);
    }
}
