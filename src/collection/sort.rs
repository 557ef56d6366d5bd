//! Collection ordering by a configured field.

use std::cmp::Ordering;

use serde_json::Value;

use crate::config::SortOrder;
use crate::content::ContentItem;
use crate::utils::date::ContentDate;

/// Comparable form of a field value.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Date(ContentDate),
    Number(f64),
    Text(String),
    /// Missing or unsupported (bool, list, table).
    Unsupported,
}

impl SortKey {
    fn from_value(value: Option<Value>) -> Self {
        match value {
            Some(Value::String(s)) => match parse_plain_date(&s) {
                Some(date) => Self::Date(date),
                None => Self::Text(s),
            },
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Unsupported, Self::Number),
            _ => Self::Unsupported,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Date(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
            Self::Unsupported => 3,
        }
    }

    /// Compare two keys of the same kind. Different kinds are equal here;
    /// the caller separates them by rank first.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Strings that look like dates sort chronologically.
fn parse_plain_date(s: &str) -> Option<ContentDate> {
    let s = s.trim();
    let looks_like_date = s.len() >= 10
        && s.as_bytes()[..10]
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if looks_like_date { ContentDate::parse(s) } else { None }
}

/// Stable in-place sort of `items` by `field`.
///
/// Items whose field is missing or of an unsupported type keep their
/// relative order and sort after the rest.
pub fn sort_items(items: &mut Vec<ContentItem>, field: &str, order: SortOrder) {
    let mut keyed: Vec<(SortKey, ContentItem)> = items
        .drain(..)
        .map(|item| (SortKey::from_value(item.field(field)), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        a.rank().cmp(&b.rank()).then_with(|| {
            let ord = a.compare(b);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        })
    });

    items.extend(keyed.into_iter().map(|(_, item)| item));
}
