//! Rendering boundary.
//!
//! The build hands each page to a [`Renderer`] as a template name plus JSON
//! data and writes whatever string comes back. [`BasicRenderer`] is the
//! stand-in used when no templating engine is plugged in.
//!
//! | Page          | Template                                   | Data keys                           |
//! |---------------|--------------------------------------------|-------------------------------------|
//! | content item  | item layout → collection layout → default  | `site`, `page`                      |
//! | collection    | `list`                                     | `site`, `listing`, `page`, `items`  |
//! | tag           | `tag`                                      | `site`, `listing`, `page`, `items`  |

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use super::site::{Listing, ListingPage, SiteData};
use crate::config::SiteConfig;
use crate::content::ContentItem;
use crate::utils::html::escape;
use crate::debug;

/// Template used when neither the item nor its collection names a layout.
pub const DEFAULT_TEMPLATE: &str = "default";

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Turns template data into HTML and places static files.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, data: &Value) -> Result<String>;

    /// Copy static assets into the output directory. Returns files copied.
    fn copy_assets(&self, _config: &SiteConfig) -> Result<usize> {
        Ok(0)
    }
}

/// Template name for a content item.
pub fn item_template<'a>(item: &'a ContentItem, site: &'a SiteData) -> &'a str {
    item.layout
        .as_deref()
        .or_else(|| {
            site.collections
                .get(&item.collection)
                .and_then(|c| c.config.layout.as_deref())
        })
        .unwrap_or(DEFAULT_TEMPLATE)
}

/// Data handed to the renderer for a content item.
pub fn item_data(item: &ContentItem, site: &SiteData) -> Result<Value> {
    Ok(json!({
        "site": serde_json::to_value(&site.config.site)?,
        "page": serde_json::to_value(item)?,
    }))
}

/// Data handed to the renderer for one listing page.
pub fn listing_data(listing: &Listing, page: &ListingPage, site: &SiteData) -> Result<Value> {
    Ok(json!({
        "site": serde_json::to_value(&site.config.site)?,
        "listing": {
            "kind": listing.kind,
            "name": listing.name,
            "baseUrl": listing.base_url,
        },
        "page": serde_json::to_value(page)?,
        "items": serde_json::to_value(listing.items(site, page))?,
    }))
}

// ============================================================================
// BasicRenderer
// ============================================================================

/// Minimal HTML output and a plain recursive asset copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicRenderer;

impl Renderer for BasicRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String> {
        let site_title = str_at(data, "/site/title");
        let body = match data.get("items").and_then(Value::as_array) {
            Some(items) => list_body(data, items),
            None => str_at(data, "/page/content").to_string(),
        };
        let title = match data.pointer("/listing/name").and_then(Value::as_str) {
            Some(name) => name,
            None => str_at(data, "/page/title"),
        };

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body class=\"{}\">\n<main>\n{}\n</main>\n</body>\n</html>\n",
            page_title(title, site_title),
            escape(template),
            body
        ))
    }

    fn copy_assets(&self, config: &SiteConfig) -> Result<usize> {
        let src = config.assets_dir();
        if !src.is_dir() {
            debug!("assets"; "no asset directory at {}", src.display());
            return Ok(0);
        }
        let mut count = 0;
        copy_dir_recursive(src, config.output_dir(), &mut count)?;
        Ok(count)
    }
}

fn str_at<'a>(data: &'a Value, pointer: &str) -> &'a str {
    data.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

fn page_title(title: &str, site_title: &str) -> String {
    match (title.is_empty(), site_title.is_empty()) {
        (false, false) => format!("{} | {}", escape(title), escape(site_title)),
        (true, _) => escape(site_title).into_owned(),
        (false, true) => escape(title).into_owned(),
    }
}

fn list_body(data: &Value, items: &[Value]) -> String {
    let mut html = String::from("<ul>\n");
    for item in items {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape(str_at(item, "/url")),
            escape(str_at(item, "/title"))
        ));
    }
    html.push_str("</ul>");

    let links = [("/page/urls/previous", "prev", "Previous"), ("/page/urls/next", "next", "Next")];
    let nav: Vec<String> = links
        .iter()
        .filter_map(|(pointer, rel, label)| {
            let url = data.pointer(pointer)?.as_str()?;
            Some(format!("<a rel=\"{rel}\" href=\"{}\">{label}</a>", escape(url)))
        })
        .collect();
    if !nav.is_empty() {
        html.push_str(&format!("\n<nav>{}</nav>", nav.join(" ")));
    }
    html
}

/// Recursively copy `src` into `dst`, skipping ignored files.
fn copy_dir_recursive(src: &Path, dst: &Path, count: &mut usize) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;

    for entry in fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
        let entry = entry?;
        let src_path = entry.path();
        let file_name = entry.file_name();
        if IGNORED_FILES.iter().any(|f| file_name == *f) {
            continue;
        }
        let dest_path = dst.join(&file_name);

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path, count)?;
        } else {
            fs::copy(&src_path, &dest_path).with_context(|| {
                format!("Failed to copy {} to {}", src_path.display(), dest_path.display())
            })?;
            *count += 1;
        }
    }
    Ok(())
}

/// Write a rendered page, creating parent directories.
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("render"; "{}", path.display());
    Ok(())
}
