//! Calendar dates for content items.
//!
//! Content dates are plain calendar dates in local time. A front-matter
//! value such as `2024-06-15` never goes through a timezone conversion,
//! so an item written on the 15th stays on the 15th regardless of where
//! the build runs.
//!
//! # Examples
//!
//! ```ignore
//! let date = ContentDate::parse("2024-06-15").unwrap();
//! let date = ContentDate::parse("2024-06-15T14:30:45+08:00").unwrap();
//! assert_eq!(date.to_string(), "2024-06-15");
//! ```

use std::fmt;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Accepted naive date-time layouts, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A calendar date without time or timezone.
///
/// Defaults to 1970-01-01.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDate(NaiveDate);

impl ContentDate {
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in local time.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parse a front-matter date value.
    ///
    /// `YYYY-MM-DD` is taken as a local calendar date. Anything else is
    /// parsed as a date-time (RFC 3339, RFC 2822 or a naive layout) and the
    /// date part is kept as written.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Self(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.date_naive()));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(Self(dt.date_naive()));
        }
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|dt| Self(dt.date()))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ContentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for ContentDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{raw}`")))
    }
}
