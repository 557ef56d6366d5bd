//! URL slugification.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Leading `YYYY-MM-DD-` prefix of a file or folder name.
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").expect("valid regex"));

/// Convert arbitrary text into a URL slug.
///
/// Unicode is transliterated to ASCII, everything that is not alphanumeric
/// becomes a single `-`, and edge dashes are trimmed.
///
/// ```ignore
/// assert_eq!(slugify("Hello, Wörld!"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Split a `YYYY-MM-DD-rest` name into its date and remainder.
///
/// Returns `None` if there is no prefix or the prefix is not a real date.
pub fn strip_date_prefix(name: &str) -> Option<(NaiveDate, &str)> {
    let caps = DATE_PREFIX.captures(name)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some((date, caps.get(4)?.as_str()))
}
