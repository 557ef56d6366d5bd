//! Content loading: front matter, markdown, and resolved item fields.
//!
//! | Module        | Responsibility                              |
//! |---------------|---------------------------------------------|
//! | `frontmatter` | split and parse YAML / TOML front matter     |
//! | `markdown`    | markdown to HTML                             |
//! | `excerpt`     | first-paragraph excerpt with safe truncation |
//! | `item`        | [`ContentItem`]                              |
//! | `loader`      | walk a collection and run the content hooks  |

mod error;
pub mod excerpt;
mod frontmatter;
mod item;
mod loader;
mod markdown;

pub use error::ContentError;
pub use frontmatter::{FrontMatter, FrontMatterFormat, JsonMap, parse_front_matter, split_front_matter, toml_to_json};
#[cfg(test)]
pub use item::sample_item;
pub use item::ContentItem;
pub use loader::{ContentLoader, LoadedCollection, collect_markdown_files};
pub use markdown::MarkdownOptions;
