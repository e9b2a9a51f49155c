//! RSS/Atom feeds parsed with `feed-rs`, used as the fallback path for
//! every platform.

use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::debug;

use super::image::pick_image;
use super::FetchContext;
use crate::article::{Article, Source};
use crate::error::{Error, Result};

/// Fetch `url` and parse it as an RSS or Atom feed.
pub async fn fetch_feed(ctx: &FetchContext, source: Source, url: String) -> Result<Vec<Article>> {
    debug!(source = %source, url = %url, "fetching feed");
    let body = ctx.http.get_text(&url).await?;
    parse_feed(ctx, source, &body)
}

/// Parse an already-decoded feed document.
pub fn parse_feed(ctx: &FetchContext, source: Source, body: &str) -> Result<Vec<Article>> {
    let feed = parser::parse(body.as_bytes()).map_err(|e| Error::Feed(e.to_string()))?;

    Ok(feed
        .entries
        .iter()
        .map(|entry| entry_to_article(ctx, source, entry))
        .collect())
}

fn entry_to_article(ctx: &FetchContext, source: Source, entry: &Entry) -> Article {
    let title = entry.title.as_ref().map(|t| t.content.as_str()).unwrap_or_default();
    let link = select_entry_link(entry);
    let published_at_ms = entry
        .published
        .or(entry.updated)
        .map_or(0, |d| d.timestamp_millis());

    let thumbnails = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| Some(t.image.uri.as_str()));
    let media_images = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter(|c| {
            c.content_type
                .as_ref()
                .is_none_or(|mime| mime.ty() == "image")
        })
        .map(|c| c.url.as_ref().map(url::Url::as_str));
    let enclosures = entry
        .links
        .iter()
        .filter(|l| l.rel.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("enclosure")))
        .map(|l| Some(l.href.as_str()));

    let summary = entry.summary.as_ref().map(|s| s.content.as_str());
    let content = entry.content.as_ref().and_then(|c| c.body.as_deref());

    let image = pick_image(
        enclosures.chain(thumbnails).chain(media_images),
        [summary, content],
    );

    ctx.article(source, title, link, published_at_ms, image.as_deref())
}

fn select_entry_link(entry: &Entry) -> &str {
    let usable = || entry.links.iter().filter(|l| !l.href.trim().is_empty());
    usable()
        .find(|l| l.rel.as_deref().is_none_or(|r| r.eq_ignore_ascii_case("alternate")))
        .or_else(|| usable().next())
        .map_or("", |l| l.href.as_str())
}
