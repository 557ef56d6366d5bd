//! File category definitions.

use std::path::Path;

/// Kind of file the build pipeline understands, detected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Markdown content (.md, .markdown)
    Markdown,
    /// Plugin manifest (.toml)
    PluginManifest,
}

impl FileKind {
    /// Detect kind from file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "toml" => Some(Self::PluginManifest),
            _ => None,
        }
    }

    /// Detect kind from file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Display name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PluginManifest => "plugin manifest",
        }
    }

    #[inline]
    pub fn is_markdown(path: &Path) -> bool {
        Self::from_path(path) == Some(Self::Markdown)
    }

    #[inline]
    pub fn is_plugin_manifest(path: &Path) -> bool {
        Self::from_path(path) == Some(Self::PluginManifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileKind::from_extension("md"), Some(FileKind::Markdown));
        assert_eq!(FileKind::from_extension("MARKDOWN"), Some(FileKind::Markdown));
        assert_eq!(FileKind::from_extension("Toml"), Some(FileKind::PluginManifest));
        assert_eq!(FileKind::from_extension("html"), None);
    }

    #[test]
    fn test_is_markdown() {
        assert!(FileKind::is_markdown(&PathBuf::from("post.md")));
        assert!(FileKind::is_markdown(&PathBuf::from("POST.MD")));
        assert!(FileKind::is_markdown(&PathBuf::from("doc.markdown")));
        assert!(!FileKind::is_markdown(&PathBuf::from("image.png")));
        assert!(!FileKind::is_markdown(&PathBuf::from("noext")));
    }

    #[test]
    fn test_is_plugin_manifest() {
        assert!(FileKind::is_plugin_manifest(&PathBuf::from("seo.toml")));
        assert!(FileKind::is_plugin_manifest(&PathBuf::from("SEO.TOML")));
        assert!(!FileKind::is_plugin_manifest(&PathBuf::from("seo.js")));
    }
}
