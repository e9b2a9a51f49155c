//! Payload of the RSS-to-JSON relay.
//!
//! The relay returns `{"status": "ok", "items": [...]}` with dates as
//! `YYYY-MM-DD HH:MM:SS` in UTC.

use serde::Deserialize;

use super::image::pick_image;
use super::FetchContext;
use crate::article::{Article, Source};
use crate::dates::first_timestamp_ms;
use crate::error::{Error, Result};
use crate::url_utils::with_target_param;

#[derive(Debug, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub guid: String,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub enclosure: Option<Enclosure>,
}

/// The relay emits `{}` for items without an enclosure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Enclosure {
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// Relay URL for a feed.
#[must_use]
pub fn relay_url(ctx: &FetchContext, feed_url: &str) -> String {
    with_target_param(&ctx.relays.json_feed, "rss_url", feed_url)
}

/// Normalize a relay payload. A non-`ok` status is an error.
pub fn into_articles(ctx: &FetchContext, source: Source, payload: Payload) -> Result<Vec<Article>> {
    if !payload.status.eq_ignore_ascii_case("ok") {
        return Err(Error::Feed(
            payload
                .message
                .unwrap_or_else(|| format!("relay status '{}'", payload.status)),
        ));
    }

    Ok(payload
        .items
        .iter()
        .map(|item| {
            let link = if item.link.trim().is_empty() { &item.guid } else { &item.link };
            let published = first_timestamp_ms([item.pub_date.as_deref()]);
            let enclosure = item
                .enclosure
                .as_ref()
                .filter(|e| e.media_type.as_deref().is_none_or(|t| t.starts_with("image")))
                .and_then(|e| e.link.as_deref());
            let image = pick_image(
                [enclosure, item.thumbnail.as_deref()],
                [item.description.as_deref(), item.content.as_deref()],
            );
            ctx.article(source, &item.title, link, published, image.as_deref())
        })
        .collect())
}
