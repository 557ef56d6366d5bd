//! Excerpt extraction from a markdown body.
//!
//! The excerpt is the first paragraph that is not a heading, with heading
//! markup removed. Long paragraphs are cut on a word boundary that does not
//! fall inside an inline code span, a link, or an emphasis run, so the
//! truncated text still renders as valid markdown.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Target excerpt length in characters.
pub const EXCERPT_LENGTH: usize = 200;

const ELLIPSIS: &str = "...";

/// Inline constructs that must not be split.
static PROTECTED_SPANS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"`[^`\n]+`",
        r"!?\[[^\]\n]*\]\([^)\n]*\)",
        r"\*\*[^*\n]+\*\*",
        r"__[^_\n]+__",
        r"\*[^*\n]+\*",
        r"\b_[^_\n]+_\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid excerpt regex"))
    .collect()
});

/// Extract an excerpt from a markdown body.
pub fn extract(markdown: &str) -> String {
    truncate(&first_paragraph(markdown), EXCERPT_LENGTH)
}

/// First non-empty paragraph, skipping headings and fenced code blocks.
pub fn first_paragraph(markdown: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            if !lines.is_empty() {
                break;
            }
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        if trimmed.starts_with('#') {
            let text = trimmed.trim_start_matches('#').trim();
            if lines.is_empty() {
                // heading on its own line: not a paragraph
                continue;
            }
            lines.push(text);
            continue;
        }
        lines.push(trimmed);
    }

    lines.join(" ")
}

/// Cut `text` to at most `max` characters plus an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let limit = text
        .char_indices()
        .nth(max)
        .map_or(text.len(), |(idx, _)| idx);
    let spans = protected_spans(text);
    let inside = |idx: usize| spans.iter().any(|span| span.start < idx && idx < span.end);

    // last whitespace before the limit that is outside any protected span
    let cut = text[..limit]
        .char_indices()
        .rev()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(idx, _)| idx)
        .find(|&idx| !inside(idx));

    let cut = match cut {
        Some(idx) => idx,
        // a span covers the whole window: end after it
        None => spans
            .iter()
            .filter(|span| span.start < limit && limit < span.end)
            .map(|span| span.end)
            .max()
            .unwrap_or(limit),
    };

    let mut out = text[..cut].trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

fn protected_spans(text: &str) -> Vec<Range<usize>> {
    PROTECTED_SPANS
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.range()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_paragraph_skips_headings() {
        let md = "# Title\n\n## Sub\n\nFirst line\ncontinues here.\n\nSecond paragraph.";
        assert_eq!(first_paragraph(md), "First line continues here.");
    }

    #[test]
    fn test_first_paragraph_skips_code_fences() {
        let md = "```rust\nfn main() {}\n```\n\nAfter code.";
        assert_eq!(first_paragraph(md), "After code.");
    }

    #[test]
    fn test_first_paragraph_empty_body() {
        assert_eq!(first_paragraph(""), "");
        assert_eq!(first_paragraph("# Only heading\n"), "");
    }

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate("short text", 200), "short text");
    }

    #[test]
    fn test_truncate_on_word_boundary() {
        let text = "alpha beta gamma delta";
        assert_eq!(truncate(text, 13), "alpha beta...");
    }

    #[test]
    fn test_truncate_keeps_spans_whole() {
        let text = "see [the docs](https://example.com/docs) for details";
        let out = truncate(text, 20);
        assert_eq!(out, "see...");

        let text = "word **bold phrase here** tail";
        let out = truncate(text, 15);
        assert_eq!(out, "word...");
    }

    #[test]
    fn test_truncate_inline_code() {
        let text = "run `cargo build --release` now please";
        assert_eq!(truncate(text, 18), "run...");
    }

    #[test]
    fn test_extract_long_paragraph() {
        let body = "word ".repeat(100);
        let excerpt = extract(&body);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_LENGTH + ELLIPSIS.len());
    }

    #[test]
    fn test_multibyte_text() {
        let text = "héllo wörld ünïcode text";
        assert_eq!(truncate(text, 12), "héllo wörld...");
    }

    #[test]
    fn test_truncate_keeps_underscore_emphasis() {
        assert_eq!(PROTECTED_SPANS.len(), 6);
        let text = "keep _snake emphasis_ whole";
        assert_eq!(truncate(text, 12), "keep...");
    }
}
