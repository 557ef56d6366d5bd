//! Build mode configuration for production/development builds.

/// Build mode, read once when a build starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Whether `server.show_drafts` is honoured.
    pub drafts_allowed: bool,
}

impl BuildMode {
    /// Production mode: drafts are always hidden.
    pub const PRODUCTION: Self = Self {
        drafts_allowed: false,
    };

    /// Development mode: drafts follow `server.show_drafts`.
    pub const DEVELOPMENT: Self = Self {
        drafts_allowed: true,
    };

    pub const fn from_dev_flag(dev: bool) -> Self {
        if dev { Self::DEVELOPMENT } else { Self::PRODUCTION }
    }

    /// Check if this is development mode.
    #[inline]
    pub const fn is_dev(&self) -> bool {
        self.drafts_allowed
    }

    /// Whether drafts end up in collections for this run.
    #[inline]
    pub const fn show_drafts(&self, configured: bool) -> bool {
        self.drafts_allowed && configured
    }

    /// Name exposed to command plugins as `PLUME_MODE`.
    pub const fn name(&self) -> &'static str {
        if self.is_dev() { "development" } else { "production" }
    }
}
