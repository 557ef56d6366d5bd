//! The content item produced for each source document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::FrontMatter;
use crate::utils::date::ContentDate;

/// One loaded source document.
///
/// The loader fills everything up to `front_matter`; the collection builder
/// then sets `permalink`, `url` and `output_path`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub file_path: PathBuf,
    /// Name of the owning collection.
    pub collection: String,
    pub slug: String,
    pub date: ContentDate,
    pub title: String,
    pub layout: Option<String>,
    pub permalink: String,
    pub url: String,
    pub output_path: PathBuf,
    pub draft: bool,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub excerpt_html: String,
    /// Rendered HTML.
    pub content: String,
    /// Markdown body as written.
    pub raw_content: String,
    pub front_matter: FrontMatter,
}

impl ContentItem {
    /// Field lookup used for sorting: resolved fields first, then front matter.
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        use serde_json::Value;
        match name {
            "date" => Some(Value::String(self.date.to_string())),
            "title" => Some(Value::String(self.title.clone())),
            "slug" => Some(Value::String(self.slug.clone())),
            "url" => Some(Value::String(self.url.clone())),
            "permalink" => Some(Value::String(self.permalink.clone())),
            "collection" => Some(Value::String(self.collection.clone())),
            "draft" => Some(Value::Bool(self.draft)),
            _ => self.front_matter.get(name),
        }
    }
}

#[cfg(test)]
pub fn sample_item(slug: &str) -> ContentItem {
    ContentItem {
        file_path: PathBuf::from(format!("content/posts/{slug}.md")),
        collection: "posts".to_string(),
        slug: slug.to_string(),
        title: slug.to_string(),
        ..Default::default()
    }
}
