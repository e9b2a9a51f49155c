//! Compiled regex patterns for image scraping and content identifiers.
//!
//! All patterns are compiled once at first use using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Inline Image Patterns
// =============================================================================
// Tried in order against an item's HTML body; the first match wins.

/// `<img ... src="...">` or `<img ... src='...'>`.
pub static IMG_SRC_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#).expect("IMG_SRC_QUOTED regex")
});

/// `<img ... src=...>` without quotes.
pub static IMG_SRC_UNQUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*([^\s"'>]+)"#).expect("IMG_SRC_UNQUOTED regex")
});

/// Lazy-load variants: `data-src`, `data-lazy-src`, `data-original`.
pub static IMG_DATA_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\sdata-(?:lazy-)?(?:src|original)\s*=\s*["']?([^\s"'>]+)"#)
        .expect("IMG_DATA_SRC regex")
});

// =============================================================================
// Content Identifier Patterns
// =============================================================================

/// note article key: `https://note.com/{user}/n/{key}`.
pub static NOTE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?note\.com/[^/?#]+/n/(n[0-9a-z]+)").expect("NOTE_KEY regex")
});

/// Zenn article slug: `https://zenn.dev/{user}/articles/{slug}`.
pub static ZENN_SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://zenn\.dev/[^/?#]+/articles/([0-9a-z_-]+)").expect("ZENN_SLUG regex")
});

// =============================================================================
// Feed Prolog Patterns
// =============================================================================

/// `<?xml version="1.0" encoding="..."?>` declaration.
pub static XML_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<\?xml[^>]+encoding\s*=\s*["']([^"']+)["']"#).expect("XML_ENCODING regex")
});

/// `charset=...` parameter of a `Content-Type` header.
pub static CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("CONTENT_TYPE_CHARSET regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_src_matches_both_quote_styles() {
        let caps = IMG_SRC_QUOTED.captures(r#"<img alt="x" src="https://a/b.png">"#);
        assert_eq!(caps.and_then(|c| c.get(1)).map(|m| m.as_str()), Some("https://a/b.png"));
        let caps = IMG_SRC_QUOTED.captures("<IMG class='c' SRC='/b.png'>");
        assert_eq!(caps.and_then(|c| c.get(1)).map(|m| m.as_str()), Some("/b.png"));
    }

    #[test]
    fn data_src_is_not_mistaken_for_src() {
        assert!(!IMG_SRC_QUOTED.is_match(r#"<img data-src="https://a/lazy.png">"#));
        assert!(IMG_DATA_SRC.is_match(r#"<img data-src="https://a/lazy.png">"#));
    }

    #[test]
    fn note_key_requires_article_path() {
        let caps = NOTE_KEY.captures("https://note.com/someone/n/n0a1b2c3d4e5f?ref=rss");
        assert_eq!(caps.and_then(|c| c.get(1)).map(|m| m.as_str()), Some("n0a1b2c3d4e5f"));
        assert!(!NOTE_KEY.is_match("https://note.com/someone"));
    }

    #[test]
    fn zenn_slug_matches_article_links_only() {
        assert!(ZENN_SLUG.is_match("https://zenn.dev/someone/articles/abc-123_x"));
        assert!(!ZENN_SLUG.is_match("https://zenn.dev/someone/books/abc"));
    }
}
