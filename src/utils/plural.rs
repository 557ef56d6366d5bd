//! Pluralization utilities for log messages.

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// `plural_count(3, "plugin")` -> `"3 plugins"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "item"), "0 items");
        assert_eq!(plural_count(1, "plugin"), "1 plugin");
        assert_eq!(plural_count(25, "page"), "25 pages");
    }
}
