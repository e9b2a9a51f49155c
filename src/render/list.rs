//! Full article list target.

use super::card::{cards_html, LIST_CARD};
use super::RENDER_MARKER;
use crate::article::Article;
use crate::dom::{self, Selection};

/// Hand-authored entries: article cards without the render marker.
const HAND_AUTHORED: &str = ".card--article:not([data-rss])";

/// Replace previously rendered entries with `articles`.
///
/// New cards go before the first hand-authored entry, or at the end when
/// the container has none. Hand-authored entries are never touched.
pub(super) fn render(container: &Selection, articles: &[Article], limit: Option<usize>) {
    container.select(&format!("[{RENDER_MARKER}=\"true\"]")).remove();

    let shown = limit.unwrap_or(articles.len()).min(articles.len());
    let html = cards_html(&articles[..shown], LIST_CARD);
    if html.is_empty() {
        return;
    }

    let anchor = container.select(HAND_AUTHORED).first();
    if anchor.exists() {
        dom::insert_html_before(&anchor, &html);
    } else {
        container.append_html(html);
    }
}
