//! End-to-end pipeline runs against mock platform endpoints.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sitefeed::config::RenderConfig;
use sitefeed::{Aggregator, Config, FileStore, KeyValueStore, MemoryStore, Page, Source, SourceConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><body id="articles-page">
<section class="latest-articles"><div class="latest-articles__track"><p>loading</p></div></section>
<ul class="cards">
  <li class="card card--article" data-source="note"><a href="https://hand/1"><h3>Hand-written</h3></a></li>
</ul>
</body></html>"#;

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.relays.json_feed = format!("{}/rss2json", server.uri());
    config.relays.raw = format!("{}/raw", server.uri());
    config.relays.text = format!("{}/text", server.uri());
    config.request_timeout_ms = 2_000;

    for kind in Source::ALL {
        let mut source = SourceConfig::new(kind, "demo");
        source.api_base = Some(server.uri());
        config.sources.push(source);
    }
    config
}

async fn mount_platforms(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rss2json"))
        .and(query_param("rss_url", format!("{}/demo/rss", server.uri())))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "items": [{
                "title": "note post",
                "link": "https://note.com/demo/n/n1111aaaa",
                "pubDate": "2024-03-03 00:00:00",
                "thumbnail": "https://cdn.example.com/note.png"
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("username", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "articles": [{
                "title": "zenn post",
                "slug": "rust-tips",
                "path": "/demo/articles/rust-tips",
                "published_at": "2024-03-02T09:00:00.000+09:00"
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users/demo/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "title": "qiita post",
            "url": "https://qiita.com/demo/items/abc",
            "created_at": "2024-03-01T09:00:00+09:00"
        }])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles/rust-tips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "article": {"og_image_url": "https://res.cloudinary.com/zenn-og.png"}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// Memory store that counts writes per key.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    list_writes: AtomicUsize,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> sitefeed::Result<()> {
        if key == "sitefeed:articles" {
            self.list_writes.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.set(key, value)
    }
}

fn list_titles(page: &Page) -> Vec<String> {
    let doc = sitefeed::dom::parse(&page.html());
    doc.select("#articles-page .cards > li h3")
        .iter()
        .map(|h| h.text().to_string())
        .collect()
}

#[tokio::test]
async fn merges_renders_and_backfills() {
    let server = MockServer::start().await;
    mount_platforms(&server).await;

    let config = config_for(&server);
    let page = Page::parse(PAGE, config.render.clone());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let aggregator = Aggregator::new(config, store.clone()).expect("aggregator");

    let articles = aggregator.run(&page).await;

    let links: Vec<&str> = articles.iter().map(|a| a.link.as_str()).collect();
    assert_eq!(
        links,
        [
            "https://note.com/demo/n/n1111aaaa",
            "https://zenn.dev/demo/articles/rust-tips",
            "https://qiita.com/demo/items/abc",
        ]
    );
    assert_eq!(articles[1].image_url, "https://res.cloudinary.com/zenn-og.png");

    assert_eq!(
        list_titles(&page),
        ["note post", "zenn post", "qiita post", "Hand-written"]
    );

    let html = page.html();
    assert!(html.contains(r#"src="https://res.cloudinary.com/zenn-og.png""#));
    assert!(!html.contains("loading"));

    let persisted: serde_json::Value =
        serde_json::from_str(&store.get("sitefeed:articles").expect("list cached")).expect("json");
    assert_eq!(persisted["data"].as_array().map(Vec::len), Some(3));
    assert!(store.get("sitefeed:thumbnails").is_some());
}

#[tokio::test]
async fn fast_sources_render_before_slow_one_settles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/demo/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(1_500))
                .set_body_json(serde_json::json!([{
                    "title": "qiita post",
                    "url": "https://qiita.com/demo/items/abc",
                    "created_at": "2024-03-01T09:00:00+09:00"
                }])),
        )
        .mount(&server)
        .await;
    mount_platforms(&server).await;

    let mut config = config_for(&server);
    config.request_timeout_ms = 5_000;
    let page = Page::parse(PAGE, config.render.clone());
    let store = Arc::new(CountingStore::default());
    let aggregator = Aggregator::new(config, store.clone()).expect("aggregator");

    let observe = async {
        for _ in 0..100 {
            if page
                .html()
                .contains(r#"src="https://res.cloudinary.com/zenn-og.png""#)
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        (
            list_titles(&page),
            page.html(),
            store.list_writes.load(Ordering::SeqCst),
        )
    };
    let (articles, (early_titles, early_html, early_writes)) =
        tokio::join!(aggregator.run(&page), observe);

    assert_eq!(early_titles, ["note post", "zenn post", "Hand-written"]);
    assert!(early_html.contains(r#"src="https://res.cloudinary.com/zenn-og.png""#));
    assert_eq!(early_writes, 0);

    assert_eq!(articles.len(), 3);
    assert_eq!(
        list_titles(&page),
        ["note post", "zenn post", "qiita post", "Hand-written"]
    );
    assert_eq!(store.list_writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cached_list_and_thumbnails_render_offline() {
    let server = MockServer::start().await;
    mount_platforms(&server).await;
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let config = config_for(&server);
        let page = Page::parse(PAGE, config.render.clone());
        let store = Arc::new(FileStore::open(dir.path()).expect("store"));
        Aggregator::new(config, store).expect("aggregator").run(&page).await;
    }

    let config = config_for(&server);
    let page = Page::parse(PAGE, config.render.clone());
    let store = Arc::new(FileStore::open(dir.path()).expect("store"));
    let aggregator = Aggregator::new(config, store).expect("aggregator");

    let cached = aggregator.render_cached(&page);
    assert_eq!(cached.len(), 3);
    assert_eq!(
        list_titles(&page),
        ["note post", "zenn post", "qiita post", "Hand-written"]
    );
    assert!(page
        .html()
        .contains(r#"src="https://res.cloudinary.com/zenn-og.png""#));
}

#[tokio::test]
async fn total_failure_keeps_hand_authored_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let page = Page::parse(PAGE, config.render.clone());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let aggregator = Aggregator::new(config, store.clone()).expect("aggregator");

    let articles = aggregator.run(&page).await;

    assert!(articles.is_empty());
    assert_eq!(list_titles(&page), ["Hand-written"]);
    assert!(store.get("sitefeed:articles").is_none());
}

#[tokio::test]
async fn failed_refresh_keeps_cached_entries_visible() {
    let server = MockServer::start().await;
    mount_platforms(&server).await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let config = config_for(&server);
    let first = Page::parse(PAGE, config.render.clone());
    Aggregator::new(config, store.clone())
        .expect("aggregator")
        .run(&first)
        .await;

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let second = Page::parse(PAGE, config.render.clone());
    Aggregator::new(config, store)
        .expect("aggregator")
        .run(&second)
        .await;

    assert_eq!(
        list_titles(&second),
        ["note post", "zenn post", "qiita post", "Hand-written"]
    );
}

#[tokio::test]
async fn page_without_targets_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let page = Page::parse("<html><body><p>about me</p></body></html>", RenderConfig::default());
    let aggregator =
        Aggregator::new(config, Arc::new(MemoryStore::new())).expect("aggregator");

    assert!(aggregator.run(&page).await.is_empty());
    assert_eq!(page.html().matches("data-rss").count(), 0);
}
