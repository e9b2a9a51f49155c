//! Per-platform article fetchers.
//!
//! Every fetcher tries its primary endpoint first. When that fails or
//! returns nothing, the platform's RSS/Atom feed is raced directly and
//! through the raw relay. A source never fails: total failure contributes
//! zero articles and a warning.

pub mod feed;
pub mod image;
pub mod note;
pub mod qiita;
pub mod rss2json;
pub mod zenn;

use chrono::FixedOffset;
use tracing::{debug, info, warn};

use crate::article::{Article, Source};
use crate::config::{Config, RelayConfig, SourceConfig};
use crate::dates::format_display_date;
use crate::error::Result;
use crate::http::HttpClient;
use crate::race::first_non_empty;
use crate::url_utils::{absolutize, apply_size_hint, with_target_param};

/// Everything a fetcher needs besides its own source settings.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub http: HttpClient,
    pub relays: RelayConfig,
    pub max_items: usize,
    pub display_offset: FixedOffset,
    pub size_hint_hosts: Vec<String>,
    pub image_width_hint: u32,
}

impl FetchContext {
    #[must_use]
    pub fn from_config(config: &Config, http: HttpClient) -> Self {
        Self {
            http,
            relays: config.relays.clone(),
            max_items: config.max_items_per_source,
            display_offset: config.display_offset(),
            size_hint_hosts: config.backfill.size_hint_hosts.clone(),
            image_width_hint: config.backfill.image_width_hint,
        }
    }

    /// Absolutize a scraped image URL and apply the width hint.
    #[must_use]
    pub fn finish_image_url(&self, raw: &str, source: Source) -> String {
        let absolute = absolutize(raw, source.origin());
        apply_size_hint(&absolute, &self.size_hint_hosts, self.image_width_hint)
    }

    /// Build a normalized article.
    pub(crate) fn article(
        &self,
        source: Source,
        title: &str,
        link: &str,
        published_at_ms: i64,
        raw_image: Option<&str>,
    ) -> Article {
        Article {
            title: title.trim().to_string(),
            link: link.trim().to_string(),
            published_at_ms,
            display_date: format_display_date(published_at_ms, self.display_offset),
            image_url: raw_image
                .map(|raw| self.finish_image_url(raw, source))
                .unwrap_or_default(),
            source,
        }
    }
}

/// Fetch one source's articles. Never fails.
pub async fn fetch(source: &SourceConfig, ctx: &FetchContext) -> Vec<Article> {
    let primary = match source.kind {
        Source::Note => note::fetch_primary(source, ctx).await,
        Source::Zenn => zenn::fetch_primary(source, ctx).await,
        Source::Qiita => qiita::fetch_primary(source, ctx).await,
    };

    let mut items = match primary {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => {
            debug!(source = %source.kind, "primary endpoint returned no items");
            fetch_feed_fallbacks(source, ctx).await
        }
        Err(e) => {
            debug!(source = %source.kind, error = %e, "primary endpoint failed");
            fetch_feed_fallbacks(source, ctx).await
        }
    };

    items.retain(Article::is_complete);
    items.truncate(ctx.max_items);

    if items.is_empty() {
        warn!(source = %source.kind, user = %source.user, "no articles from source");
    } else {
        info!(source = %source.kind, count = items.len(), "fetched articles");
    }
    items
}

/// Race the direct feed against the feed through the raw relay.
async fn fetch_feed_fallbacks(source: &SourceConfig, ctx: &FetchContext) -> Vec<Article> {
    let feed_url = source.feed_url();
    let relayed = with_target_param(&ctx.relays.raw, "url", &feed_url);
    first_non_empty([
        feed::fetch_feed(ctx, source.kind, feed_url),
        feed::fetch_feed(ctx, source.kind, relayed),
    ])
    .await
}

/// Shared helper for JSON primaries: fetch and convert in one step.
pub(crate) async fn fetch_json_items<T, F>(
    ctx: &FetchContext,
    url: &str,
    convert: F,
) -> Result<Vec<Article>>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce(T) -> Result<Vec<Article>>,
{
    debug!(url, "fetching primary endpoint");
    let payload: T = ctx.http.get_json(url).await?;
    convert(payload)
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>demo</title>
  <id>urn:demo</id>
  <updated>2024-03-01T00:00:00Z</updated>
  <entry>
    <title>From the feed</title>
    <id>urn:demo:1</id>
    <link href="https://qiita.com/demo/items/abc"/>
    <published>2024-03-01T00:00:00Z</published>
    <updated>2024-03-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[tokio::test]
    async fn failed_primary_falls_back_to_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/demo/items"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/demo/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(ATOM, "application/atom+xml"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let ctx = test_support::context(&server.uri());
        let mut source = SourceConfig::new(Source::Qiita, "demo");
        source.api_base = Some(server.uri());

        let items = fetch(&source, &ctx).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "From the feed");
        assert_eq!(items[0].source, Source::Qiita);
    }

    #[tokio::test]
    async fn relayed_feed_is_used_when_direct_feed_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/demo/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/demo/feed"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw"))
            .and(query_param("url", format!("{}/demo/feed", server.uri())))
            .respond_with(ResponseTemplate::new(200).set_body_raw(ATOM, "application/atom+xml"))
            .mount(&server)
            .await;

        let ctx = test_support::context(&server.uri());
        let mut source = SourceConfig::new(Source::Qiita, "demo");
        source.api_base = Some(server.uri());

        let items = fetch(&source, &ctx).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://qiita.com/demo/items/abc");
    }

    #[tokio::test]
    async fn total_failure_is_empty_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = test_support::context(&server.uri());
        let mut source = SourceConfig::new(Source::Zenn, "demo");
        source.api_base = Some(server.uri());

        assert!(fetch(&source, &ctx).await.is_empty());
    }

    #[tokio::test]
    async fn output_is_capped() {
        let items: Vec<_> = (0..30)
            .map(|i| {
                serde_json::json!({
                    "title": format!("t{i}"),
                    "url": format!("https://qiita.com/demo/items/{i}"),
                    "created_at": "2024-01-01T00:00:00+09:00",
                })
            })
            .collect();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/demo/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items))
            .mount(&server)
            .await;

        let mut ctx = test_support::context(&server.uri());
        ctx.max_items = 5;
        let mut source = SourceConfig::new(Source::Qiita, "demo");
        source.api_base = Some(server.uri());

        assert_eq!(fetch(&source, &ctx).await.len(), 5);
    }

    #[test]
    fn image_urls_are_absolutized_and_hinted() {
        let ctx = test_support::context("http://127.0.0.1:1");
        assert_eq!(
            ctx.finish_image_url("//assets.st-note.com/a.png", Source::Note),
            "https://assets.st-note.com/a.png?width=600"
        );
        assert_eq!(
            ctx.finish_image_url("/img/a.png", Source::Note),
            "https://note.com/img/a.png"
        );
    }
}
