//! Shared utility functions

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit a string into `width` terminal columns, ending with `…` when cut.
///
/// Uses display width rather than byte or char counts so Cyrillic, CJK and
/// emoji cells line up in tables.
pub fn fit_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1; // room for the ellipsis
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Flatten backend HTML (rich-text fields) into plain text for display.
///
/// Block-level closers become line breaks, remaining tags are dropped and
/// the common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();

    let block = BLOCK.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote)>").expect("static regex")
    });
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"));

    let text = block.replace_all(html, "\n");
    let text = tag.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_shorter_than_width() {
        assert_eq!(fit_width("hello", 10), "hello");
    }

    #[test]
    fn test_fit_ascii_truncates_with_ellipsis() {
        assert_eq!(fit_width("hello world", 6), "hello…");
    }

    #[test]
    fn test_fit_wide_chars() {
        // Each CJK char is 2 columns wide
        assert_eq!(fit_width("日本語", 5), "日本…");
        assert_eq!(fit_width("日本語", 4), "日…");
    }

    #[test]
    fn test_fit_zero_width() {
        assert_eq!(fit_width("hello", 0), "");
    }

    #[test]
    fn test_html_to_text() {
        let html = "<p>Bir <strong>ikki</strong></p><p>uch &amp; to&#39;rt</p>";
        assert_eq!(html_to_text(html), "Bir ikki\nuch & to'rt");
    }

    #[test]
    fn test_html_to_text_plain_passthrough() {
        assert_eq!(html_to_text("no markup"), "no markup");
    }
}
