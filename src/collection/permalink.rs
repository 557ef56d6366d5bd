//! Permalink templates and output paths.
//!
//! | Token    | Value                  |
//! |----------|------------------------|
//! | `:slug`  | resolved item slug     |
//! | `:year`  | four-digit year        |
//! | `:month` | zero-padded month      |
//! | `:day`   | zero-padded day        |

use std::path::{Path, PathBuf};

use crate::content::ContentItem;

/// Template used when neither item nor collection gives one.
pub const DEFAULT_PERMALINK: &str = "/:slug/";

/// Pick the template: a permalink already on the item (set by a hook),
/// item front matter, collection, then the default.
pub fn template_for<'a>(item: &'a ContentItem, collection: Option<&'a str>) -> &'a str {
    Some(item.permalink.as_str())
        .filter(|p| !p.trim().is_empty())
        .or(item.front_matter.permalink.as_deref().filter(|p| !p.trim().is_empty()))
        .or(collection.filter(|p| !p.trim().is_empty()))
        .unwrap_or(DEFAULT_PERMALINK)
}

/// Path segments that stay inside the output directory.
///
/// Empty, `.` and `..` segments are dropped, so no permalink can climb out.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !matches!(*s, "" | "." | ".."))
}

/// Collapse `path` to `/seg/seg` form, keeping a trailing `/`.
pub fn clean(path: &str) -> String {
    let mut out = String::from("/");
    out.push_str(&segments(path).collect::<Vec<_>>().join("/"));
    if out.len() > 1 && (path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..")) {
        out.push('/');
    }
    out
}

/// Substitute tokens in `template` for `item`, then [`clean`] the result.
pub fn resolve(template: &str, item: &ContentItem) -> String {
    let path = template
        .trim()
        .replace(":slug", &item.slug)
        .replace(":year", &format!("{:04}", item.date.year()))
        .replace(":month", &format!("{:02}", item.date.month()))
        .replace(":day", &format!("{:02}", item.date.day()));
    clean(&path)
}

/// Prefix a permalink with the site base path (`""` or `/blog`).
pub fn to_url(base_path: &str, permalink: &str) -> String {
    format!("{}{}", base_path.trim_end_matches('/'), permalink)
}

/// File a permalink is written to.
///
/// `/a/b/` -> `<output>/a/b/index.html`, `/a/b.html` -> `<output>/a/b.html`,
/// and an extensionless `/a/b` is treated as a directory.
pub fn output_path(output_dir: &Path, permalink: &str) -> PathBuf {
    let rel = permalink.trim_start_matches('/');
    let mut path = output_dir.to_path_buf();
    path.extend(segments(rel));
    if rel.ends_with(".html") {
        path
    } else {
        path.join("index.html")
    }
}
