//! `[server]` section configuration.
//!
//! Only the settings that change what a development build produces live
//! here; serving itself is handled elsewhere.
//!
//! ```toml
//! [server]
//! show_drafts = true   # include drafts in `plume build --dev`
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(alias = "showDrafts")]
    pub show_drafts: bool,
}
