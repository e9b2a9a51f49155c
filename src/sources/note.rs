//! note.com: the per-user RSS feed, read through the JSON feed relay.

use super::rss2json::{self, Payload};
use super::{fetch_json_items, FetchContext};
use crate::article::{Article, Source};
use crate::config::SourceConfig;
use crate::error::Result;

pub async fn fetch_primary(source: &SourceConfig, ctx: &FetchContext) -> Result<Vec<Article>> {
    let url = rss2json::relay_url(ctx, &source.feed_url());
    fetch_json_items(ctx, &url, |payload: Payload| {
        rss2json::into_articles(ctx, Source::Note, payload)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::context;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reads_feed_through_json_relay() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss2json"))
            .and(query_param("rss_url", "https://note.com/shiori_02_14_/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "items": [{
                    "title": "日記",
                    "link": "https://note.com/shiori_02_14_/n/n0123abcd",
                    "pubDate": "2024-02-14 09:00:00",
                    "thumbnail": "https://assets.st-note.com/production/uploads/x.jpeg"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context(&server.uri());
        let source = SourceConfig::new(Source::Note, "shiori_02_14_");
        let items = fetch_primary(&source, &ctx).await.expect("items");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "日記");
        assert_eq!(items[0].source, Source::Note);
        assert_eq!(
            items[0].image_url,
            "https://assets.st-note.com/production/uploads/x.jpeg?width=600"
        );
    }
}
