//! Collection building: permalinks, draft filtering and ordering.
//!
//! Loaded items go in; a [`Collection`] comes out with every item's
//! `permalink`, `url` and `output_path` set, drafts removed unless the run
//! shows them, and items ordered by the collection's `sort_by` field.

pub mod permalink;
mod sort;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{CollectionConfig, SiteConfig};
use crate::content::ContentItem;
use crate::core::BuildMode;
use crate::debug;

pub use sort::sort_items;

/// Collections keyed by name.
pub type CollectionMap = BTreeMap<String, Collection>;

/// A named, ordered group of content items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(flatten)]
    pub config: CollectionConfig,
    pub items: Vec<ContentItem>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of building one collection.
#[derive(Debug)]
pub struct BuiltCollection {
    pub collection: Collection,
    pub drafts_skipped: usize,
}

/// Turns loaded items into collections for one build.
#[derive(Debug, Clone)]
pub struct CollectionBuilder {
    base_path: String,
    output_dir: PathBuf,
    show_drafts: bool,
}

impl CollectionBuilder {
    pub fn new(config: &SiteConfig, mode: BuildMode) -> Self {
        Self {
            base_path: config.base_path(),
            output_dir: config.output_dir().to_path_buf(),
            show_drafts: mode.show_drafts(config.server.show_drafts),
        }
    }

    pub fn show_drafts(&self) -> bool {
        self.show_drafts
    }

    /// Resolve, filter and sort `items` into the collection `name`.
    pub fn build(
        &self,
        name: &str,
        config: &CollectionConfig,
        items: Vec<ContentItem>,
    ) -> BuiltCollection {
        let total = items.len();
        let mut items: Vec<ContentItem> = items
            .into_iter()
            .filter(|item| self.show_drafts || !item.draft)
            .map(|item| self.enrich(name, config, item))
            .collect();
        let drafts_skipped = total - items.len();

        sort_items(&mut items, &config.sort_by, config.sort_order);
        debug!(
            "content";
            "collection `{}`: {} items, {} drafts skipped",
            name,
            items.len(),
            drafts_skipped
        );

        BuiltCollection {
            collection: Collection {
                name: name.to_string(),
                config: config.clone(),
                items,
            },
            drafts_skipped,
        }
    }

    fn enrich(&self, name: &str, config: &CollectionConfig, mut item: ContentItem) -> ContentItem {
        let template = permalink::template_for(&item, config.permalink.as_deref());
        let resolved = permalink::resolve(template, &item);

        item.collection = name.to_string();
        item.url = permalink::to_url(&self.base_path, &resolved);
        item.output_path = permalink::output_path(&self.output_dir, &resolved);
        item.permalink = resolved;
        if item.layout.is_none() {
            item.layout = config.layout.clone();
        }
        item
    }
}
