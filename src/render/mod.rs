//! Renders merged articles into an HTML page.
//!
//! A page has up to two targets: the full article list and the compact
//! "latest" strip. Rendered entries carry `data-rss="true"` so later passes
//! replace them without touching hand-authored entries.

mod card;
pub mod filter;
mod list;
mod strip;

pub use filter::Filter;

use tracing::debug;

use crate::article::Article;
use crate::backfill::ThumbnailUpdate;
use crate::config::RenderConfig;
use crate::dom::{self, Document, Selection};

/// Attribute marking entries produced by this crate.
pub const RENDER_MARKER: &str = "data-rss";

/// An HTML page with its render targets.
pub struct Page {
    doc: Document,
    config: RenderConfig,
}

impl Page {
    #[must_use]
    pub fn parse(html: &str, config: RenderConfig) -> Self {
        Self {
            doc: dom::parse(html),
            config,
        }
    }

    /// Whether the page has at least one render target.
    #[must_use]
    pub fn has_targets(&self) -> bool {
        self.list_container().exists() || self.strip_container().exists()
    }

    /// Render `articles` into every target present on the page.
    pub fn render(&self, articles: &[Article]) {
        let list = self.list_container();
        if list.exists() {
            list::render(&list, articles, self.config.list_limit);
        }

        let strip = self.strip_container();
        if strip.exists() {
            strip::render(&strip, articles, self.config.strip_limit);
        }

        debug!(count = articles.len(), "rendered articles");
    }

    /// Swap the placeholder of every entry for `update.link` with an image.
    ///
    /// Returns whether any entry was updated.
    pub fn apply_thumbnail(&self, update: &ThumbnailUpdate) -> bool {
        let mut applied = false;
        for entry in self.doc.select(&format!("[{RENDER_MARKER}=\"true\"]")).iter() {
            if entry.attr("data-link").as_deref() != Some(update.link.as_str()) {
                continue;
            }
            let thumb = entry.select(".card__thumb");
            if !thumb.exists() {
                continue;
            }
            let title = entry.select("h3").text().to_string();
            thumb.set_html(card::thumbnail_img(&update.image_url, title.trim()));
            thumb.remove_class(card::PLACEHOLDER_CLASS);
            applied = true;
        }
        applied
    }

    /// Show only entries matching `filter` in the list target.
    pub fn apply_filter(&self, filter: Filter) {
        let list = self.list_container();
        if list.exists() {
            filter::apply(&self.doc, &list, filter);
        }
    }

    /// Serialize the page.
    #[must_use]
    pub fn html(&self) -> String {
        self.doc.html().to_string()
    }

    fn list_container(&self) -> Selection<'_> {
        self.doc.select(&self.config.list_selector).first()
    }

    fn strip_container(&self) -> Selection<'_> {
        self.doc.select(&self.config.strip_selector).first()
    }
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
