//! DOM helpers over `dom_query` used by the renderer.

pub use dom_query::{Document, Selection};

/// Parse an HTML page.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Insert `html` as preceding siblings of `anchor`.
///
/// The anchor node itself stays attached and unchanged.
#[inline]
pub fn insert_html_before(anchor: &Selection, html: &str) {
    if anchor.is_empty() || html.is_empty() {
        return;
    }
    anchor.before_html(html);
}

/// Hide or show elements with an inline `display: none`.
pub fn set_hidden(sel: &Selection, hidden: bool) {
    for el in sel.iter() {
        if hidden {
            el.set_attr("style", "display: none");
        } else if el
            .attr("style")
            .is_some_and(|s| s.replace(' ', "").contains("display:none"))
        {
            el.remove_attr("style");
        }
    }
}

/// Whether an element carries an inline `display: none`.
#[must_use]
pub fn is_hidden(sel: &Selection) -> bool {
    sel.attr("style")
        .is_some_and(|s| s.replace(' ', "").contains("display:none"))
}
