//! Card markup for rendered entries.

use super::{escape_html, RENDER_MARKER};
use crate::article::Article;

pub(crate) const PLACEHOLDER_CLASS: &str = "card__thumb--placeholder";

/// Outer element and classes of a card.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CardShape {
    pub tag: &'static str,
    pub class: &'static str,
}

pub(crate) const LIST_CARD: CardShape = CardShape {
    tag: "li",
    class: "card card--article",
};

pub(crate) const STRIP_CARD: CardShape = CardShape {
    tag: "article",
    class: "card card--latest",
};

/// `<img>` markup for a thumbnail.
pub(crate) fn thumbnail_img(image_url: &str, title: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}のサムネ" loading="lazy" decoding="async" fetchpriority="low">"#,
        escape_html(image_url),
        escape_html(title)
    )
}

/// Markup for one card.
pub(crate) fn card_html(article: &Article, shape: CardShape) -> String {
    let link = escape_html(&article.link);
    let tag = article.source.tag();
    let mut html = String::with_capacity(512);

    html.push_str(&format!(
        r#"<{} class="{}" {RENDER_MARKER}="true" data-source="{tag}" data-link="{link}">"#,
        shape.tag, shape.class
    ));
    html.push_str(&format!(
        r#"<a class="card__link" href="{link}" target="_blank" rel="noopener noreferrer">"#
    ));
    html.push_str(&format!(
        r#"<span class="badge badge--{tag} badge--corner" aria-hidden="true">{}</span>"#,
        escape_html(&article.source.label().to_uppercase())
    ));

    if article.needs_thumbnail() {
        html.push_str(&format!(r#"<div class="card__thumb {PLACEHOLDER_CLASS}"></div>"#));
    } else {
        html.push_str(r#"<div class="card__thumb">"#);
        html.push_str(&thumbnail_img(&article.image_url, &article.title));
        html.push_str("</div>");
    }

    html.push_str(r#"<div class="card__content">"#);
    if !article.display_date.is_empty() {
        html.push_str(&format!(
            r#"<time class="card__date" datetime="{}">{}</time>"#,
            escape_html(&article.display_date.replace('/', "-")),
            escape_html(&article.display_date)
        ));
    }
    html.push_str(r#"<h3 class="card__title">"#);
    html.push_str(&escape_html(&article.title));
    html.push_str("</h3></div></a>");
    html.push_str(&format!("</{}>", shape.tag));
    html
}

/// Concatenated markup for a run of cards.
pub(crate) fn cards_html<'a>(articles: impl IntoIterator<Item = &'a Article>, shape: CardShape) -> String {
    articles.into_iter().map(|a| card_html(a, shape)).collect()
}
