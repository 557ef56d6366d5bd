//! Configuration section definitions for `plume.toml`.
//!
//! | Section                | Purpose                                    |
//! |------------------------|--------------------------------------------|
//! | `[site]`               | Site metadata and public URL               |
//! | `[build]`              | Content and output directories             |
//! | `[plugins]`            | Plugin discovery, ordering, strict mode    |
//! | `[collections.<name>]` | Per-collection path, layout, permalink     |
//! | `[pagination]`         | Listing page size                          |
//! | `[server]`             | Development build behaviour                |

mod build;
mod collections;
mod pagination;
mod plugins;
mod server;
mod site;

pub use build::BuildSectionConfig;
pub use collections::{CollectionConfig, SortOrder, default_collections};
pub(crate) use collections::retain_valid;
pub use pagination::PaginationConfig;
pub use plugins::PluginsConfig;
pub use server::ServerConfig;
pub use site::SiteSectionConfig;
