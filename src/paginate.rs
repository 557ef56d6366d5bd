//! Pagination over an already ordered slice.
//!
//! Pages borrow from the source; nothing is copied or reordered.

use serde::{Deserialize, Serialize};

/// One page of a larger sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based.
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
    /// Index of the first item in the source, inclusive.
    pub start_index: usize,
    /// Index after the last item in the source, exclusive.
    pub end_index: usize,
}

/// Split `items` into pages of `page_size`.
///
/// A `page_size` of zero puts everything on one page. An empty input has no
/// pages.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<Page<'_, T>> {
    let total_items = items.len();
    if total_items == 0 {
        return Vec::new();
    }
    let page_size = if page_size == 0 { total_items } else { page_size };
    let total_pages = total_items.div_ceil(page_size);

    items
        .chunks(page_size)
        .enumerate()
        .map(|(idx, chunk)| {
            let page_number = idx + 1;
            let start_index = idx * page_size;
            Page {
                items: chunk,
                page_number,
                total_pages,
                total_items,
                is_first: page_number == 1,
                is_last: page_number == total_pages,
                previous_page: (page_number > 1).then(|| page_number - 1),
                next_page: (page_number < total_pages).then(|| page_number + 1),
                start_index,
                end_index: start_index + chunk.len(),
            }
        })
        .collect()
}

/// Navigation URLs for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationUrls {
    /// URL of page 1.
    pub canonical: String,
    pub current: String,
    pub previous: Option<String>,
    pub next: Option<String>,
}

/// URL of page `number` of the listing at `base_url`.
///
/// Page 1 is the listing itself, never `.../page/1/`.
pub fn page_url(base_url: &str, number: usize, base_path: &str) -> String {
    let base = format!("{}{}", base_path.trim_end_matches('/'), base_url);
    let base = if base.ends_with('/') { base } else { format!("{base}/") };
    if number <= 1 {
        base
    } else {
        format!("{base}page/{number}/")
    }
}

/// URLs for `page` of the listing at `base_url`, prefixed with `base_path`.
pub fn pagination_urls<T>(base_url: &str, page: &Page<'_, T>, base_path: &str) -> PaginationUrls {
    PaginationUrls {
        canonical: page_url(base_url, 1, base_path),
        current: page_url(base_url, page.page_number, base_path),
        previous: page.previous_page.map(|n| page_url(base_url, n, base_path)),
        next: page.next_page.map(|n| page_url(base_url, n, base_path)),
    }
}
