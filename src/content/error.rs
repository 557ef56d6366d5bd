use std::path::PathBuf;

use thiserror::Error;

use crate::hooks::HookError;

/// Failure while loading a single content file.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Only produced in strict mode; aborts the build.
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl ContentError {
    /// Whether the file can be dropped and loading continued.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Hook(_))
    }
}
