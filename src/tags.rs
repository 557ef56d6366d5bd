//! Cross-collection tag index.
//!
//! Tags are bucketed by their normalized form (trimmed, lowercased). The
//! first spelling seen becomes the bucket's display name. Every occurrence
//! adds the item again, so `count` always equals `items.len()`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::CollectionMap;
use crate::content::ContentItem;

/// Bucket key for a tag.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// URL segment for a normalized tag: whitespace and `/` runs become `-`.
///
/// `.` and `..` parts are dropped, so a tag like `..` has an empty slug and
/// gets no listing page.
pub fn tag_slug(normalized: &str) -> String {
    normalized
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|s| !matches!(*s, "" | "." | ".."))
        .collect::<Vec<_>>()
        .join("-")
}

/// All items carrying one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Spelling of the first occurrence.
    pub name: String,
    pub slug: String,
    /// Newest first. Each item keeps its `collection`.
    pub items: Vec<ContentItem>,
    pub count: usize,
}

/// Normalized tag -> [`Tag`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagIndex(BTreeMap<String, Tag>);

impl TagIndex {
    /// Index every tag of every item in `collections`.
    pub fn build(collections: &CollectionMap) -> Self {
        let mut index: BTreeMap<String, Tag> = BTreeMap::new();

        for item in collections.values().flat_map(|c| c.items.iter()) {
            for raw in &item.tags {
                let key = normalize_tag(raw);
                if key.is_empty() {
                    continue;
                }
                let tag = index.entry(key).or_insert_with_key(|key| Tag {
                    name: raw.trim().to_string(),
                    slug: tag_slug(key),
                    ..Default::default()
                });
                tag.items.push(item.clone());
                tag.count += 1;
            }
        }

        for tag in index.values_mut() {
            tag.items.sort_by(|a, b| b.date.cmp(&a.date));
        }
        Self(index)
    }

    /// Look up a tag by any spelling.
    pub fn get(&self, tag: &str) -> Option<&Tag> {
        self.0.get(&normalize_tag(tag))
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut Tag> {
        self.0.get_mut(&normalize_tag(tag))
    }

    pub fn insert(&mut self, tag: Tag) {
        self.0.insert(normalize_tag(&tag.name), tag);
    }

    pub fn remove(&mut self, tag: &str) -> Option<Tag> {
        self.0.remove(&normalize_tag(tag))
    }

    /// Buckets by count, most used first. Ties keep key order.
    pub fn all_tags(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.0.values().collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count));
        tags
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Tag)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
