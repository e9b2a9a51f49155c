//! Compact "latest articles" strip. Its contents are fully owned by the
//! renderer and replaced on every pass.

use super::card::{cards_html, STRIP_CARD};
use crate::article::Article;
use crate::dom::Selection;

pub(super) fn render(container: &Selection, articles: &[Article], limit: usize) {
    let shown = limit.min(articles.len());
    container.set_html(cards_html(&articles[..shown], STRIP_CARD));
}
