use std::path::PathBuf;

use thiserror::Error;

/// Plugin discovery, loading and validation failures.
///
/// Each one only disables the plugin it concerns, unless strict mode turns
/// the collected errors into [`PluginError::Strict`].
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin could not be read or parsed at all.
    #[error("failed to load plugin {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The plugin was read but its definition is malformed.
    #[error("invalid plugin `{plugin}`: {message}")]
    Validation { plugin: String, message: String },

    #[error("{} plugin error(s) in strict mode:\n{}", .0.len(), format_errors(.0))]
    Strict(Vec<PluginError>),
}

impl PluginError {
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn validation(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

fn format_errors(errors: &[PluginError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
