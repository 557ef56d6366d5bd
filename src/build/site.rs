//! The site data aggregate threaded through the build hooks.
//!
//! [`SiteData`] is created once content is loaded and handed, mutably, to
//! every site-level hook. It serializes to JSON so command plugins can read
//! and replace it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::collection::{CollectionMap, permalink};
use crate::config::SiteConfig;
use crate::content::ContentItem;
use crate::paginate::{PaginationUrls, paginate, pagination_urls, page_url};
use crate::tags::TagIndex;

/// Template for collection listings.
pub const LIST_TEMPLATE: &str = "list";
/// Template for tag listings.
pub const TAG_TEMPLATE: &str = "tag";

/// Everything a renderer needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteData {
    pub config: SiteConfig,
    pub collections: CollectionMap,
    pub tags: TagIndex,
    pub listings: Vec<Listing>,
    pub stats: SiteStats,
}

impl SiteData {
    pub fn new(config: SiteConfig, collections: CollectionMap) -> Self {
        let mut site = Self {
            config,
            collections,
            ..Default::default()
        };
        site.refresh_stats();
        site
    }

    /// Every item of every collection.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.collections.values().flat_map(|c| c.items.iter())
    }

    pub fn refresh_stats(&mut self) {
        self.stats = SiteStats {
            items: self.collections.values().map(|c| (c.name.clone(), c.len())).collect(),
            total_items: self.items().count(),
            tags: self.tags.len(),
            tags_by_count: self.tags.all_tags().iter().map(|t| t.name.clone()).collect(),
        };
    }

    /// Rebuild listings from the current collections and tags.
    ///
    /// Tag listings follow [`TagIndex::all_tags`], most used first. A name
    /// with no usable path segment (`..`, `/`) gets no listing.
    pub fn refresh_listings(&mut self) {
        let page_size = self.config.pagination.size;
        let output_dir = self.config.output_dir().to_path_buf();
        let base_path = self.config.base_path();

        let collections = self.collections.values().map(|c| {
            (
                ListingKind::Collection,
                c.name.clone(),
                permalink::clean(&format!("/{}/", c.name)),
                &c.items,
            )
        });
        let tags = self.tags.all_tags().into_iter().map(|tag| {
            (
                ListingKind::Tag,
                tag.name.clone(),
                permalink::clean(&format!("/tags/{}/", tag.slug)),
                &tag.items,
            )
        });

        self.listings = collections
            .chain(tags)
            .filter(|(kind, _, base_url, items)| {
                let root = match kind {
                    ListingKind::Collection => "/",
                    ListingKind::Tag => "/tags/",
                };
                !items.is_empty() && base_url != root
            })
            .map(|(kind, name, base_url, items)| {
                Listing::build(kind, name, base_url, items, page_size, &base_path, &output_dir)
            })
            .collect();
    }
}

/// Item counts after content loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub items: BTreeMap<String, usize>,
    pub total_items: usize,
    pub tags: usize,
    /// Tag display names, most used first.
    pub tags_by_count: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Collection,
    Tag,
}

/// A paginated index of items: a collection or a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub kind: ListingKind,
    /// Collection name or tag display name.
    pub name: String,
    /// URL of page 1 without the site base path, e.g. `/posts/`.
    pub base_url: String,
    pub template: String,
    pub pages: Vec<ListingPage>,
}

/// One page of a listing. Items are addressed by index into the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
    pub start_index: usize,
    pub end_index: usize,
    pub urls: PaginationUrls,
    pub output_path: PathBuf,
}

impl Listing {
    fn build(
        kind: ListingKind,
        name: String,
        base_url: String,
        items: &[ContentItem],
        page_size: usize,
        base_path: &str,
        output_dir: &std::path::Path,
    ) -> Self {
        let pages = paginate(items, page_size)
            .iter()
            .map(|page| ListingPage {
                page_number: page.page_number,
                total_pages: page.total_pages,
                total_items: page.total_items,
                is_first: page.is_first,
                is_last: page.is_last,
                previous_page: page.previous_page,
                next_page: page.next_page,
                start_index: page.start_index,
                end_index: page.end_index,
                urls: pagination_urls(&base_url, page, base_path),
                output_path: permalink::output_path(
                    output_dir,
                    &page_url(&base_url, page.page_number, ""),
                ),
            })
            .collect();

        let template = match kind {
            ListingKind::Collection => LIST_TEMPLATE,
            ListingKind::Tag => TAG_TEMPLATE,
        };
        Self {
            kind,
            name,
            base_url,
            template: template.to_string(),
            pages,
        }
    }

    /// Items shown on `page`, looked up in `site`.
    pub fn items<'a>(&self, site: &'a SiteData, page: &ListingPage) -> &'a [ContentItem] {
        let source: &[ContentItem] = match self.kind {
            ListingKind::Collection => site
                .collections
                .get(&self.name)
                .map(|c| c.items.as_slice())
                .unwrap_or_default(),
            ListingKind::Tag => site
                .tags
                .get(&self.name)
                .map(|t| t.items.as_slice())
                .unwrap_or_default(),
        };
        let end = page.end_index.min(source.len());
        source.get(page.start_index.min(end)..end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::config::test_site_config;
    use crate::content::sample_item;
    use std::path::Path;

    fn site(count: usize, extra: &str) -> SiteData {
        let config = test_site_config(Path::new("/site"), extra);
        let items = (0..count)
            .map(|i| {
                let mut item = sample_item(&format!("post-{i}"));
                item.tags = vec!["Rust".to_string()];
                item
            })
            .collect();
        let mut collections = CollectionMap::new();
        collections.insert(
            "posts".to_string(),
            Collection {
                name: "posts".to_string(),
                items,
                ..Default::default()
            },
        );
        let mut site = SiteData::new(config, collections);
        site.tags = TagIndex::build(&site.collections);
        site.refresh_stats();
        site.refresh_listings();
        site
    }

    #[test]
    fn test_collection_listing_pages() {
        let site = site(25, "");
        let listing = site
            .listings
            .iter()
            .find(|l| l.kind == ListingKind::Collection)
            .unwrap();

        assert_eq!(listing.base_url, "/posts/");
        assert_eq!(listing.template, "list");
        assert_eq!(listing.pages.len(), 3);

        let second = &listing.pages[1];
        assert_eq!(second.urls.previous.as_deref(), Some("/posts/"));
        assert_eq!(second.urls.current, "/posts/page/2/");
        assert_eq!(second.output_path, Path::new("/site/public/posts/page/2/index.html"));
        assert_eq!(listing.pages[0].output_path, Path::new("/site/public/posts/index.html"));
        assert_eq!(listing.items(&site, second).len(), 10);
        assert_eq!(listing.items(&site, &listing.pages[2]).len(), 5);
    }

    #[test]
    fn test_tag_listing_uses_base_path() {
        let site = site(3, "url = \"https://example.com/blog\"\n[pagination]\nsize = 2\n");
        let listing = site.listings.iter().find(|l| l.kind == ListingKind::Tag).unwrap();
        assert_eq!(listing.base_url, "/tags/rust/");
        assert_eq!(listing.template, "tag");
        assert_eq!(listing.pages[1].urls.current, "/blog/tags/rust/page/2/");
        assert_eq!(listing.pages[1].urls.canonical, "/blog/tags/rust/");
        assert_eq!(listing.items(&site, &listing.pages[1]).len(), 1);
    }

    #[test]
    fn test_stats() {
        let site = site(4, "");
        assert_eq!(site.stats.total_items, 4);
        assert_eq!(site.stats.items["posts"], 4);
        assert_eq!(site.stats.tags, 1);
    }

    #[test]
    fn test_tags_ordered_by_count() {
        let mut site = site(3, "");
        let posts = site.collections.get_mut("posts").unwrap();
        posts.items[0].tags.push("Go".to_string());
        for item in &mut posts.items {
            item.tags.push("Web".to_string());
        }
        posts.items[1].tags.push("Web".to_string());
        site.tags = TagIndex::build(&site.collections);
        site.refresh_stats();
        site.refresh_listings();

        assert_eq!(site.stats.tags_by_count, vec!["Web", "Rust", "Go"]);
        let tag_listings: Vec<_> = site
            .listings
            .iter()
            .filter(|l| l.kind == ListingKind::Tag)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(tag_listings, vec!["Web", "Rust", "Go"]);
    }

    #[test]
    fn test_dot_tag_writes_nothing_outside_output() {
        let mut site = site(1, "");
        let posts = site.collections.get_mut("posts").unwrap();
        posts.items[0].tags = vec!["..".to_string(), "../../etc".to_string()];
        site.tags = TagIndex::build(&site.collections);
        site.refresh_listings();

        let tags: Vec<_> = site.listings.iter().filter(|l| l.kind == ListingKind::Tag).collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].base_url, "/tags/etc/");
        for page in site.listings.iter().flat_map(|l| &l.pages) {
            assert!(page.output_path.starts_with("/site/public"));
        }
    }

    #[test]
    fn test_empty_collections_have_no_listing() {
        let site = site(0, "");
        assert!(site.listings.is_empty());
    }

    #[test]
    fn test_round_trips_through_json() {
        let site = site(2, "");
        let json = serde_json::to_string(&site).unwrap();
        let back: SiteData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.collections, site.collections);
        assert_eq!(back.tags, site.tags);
        assert_eq!(back.listings, site.listings);
    }
}
