//! Thumbnail backfill for articles whose feed carried no image.
//!
//! An article's link is mapped to a platform content identifier, the
//! thumbnail cache is consulted, and on a miss three strategies race
//! against the platform's metadata endpoint. Resolved thumbnails are
//! reported as [`ThumbnailUpdate`] events so the page owner applies them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::article::{Article, Source};
use crate::cache::ThumbnailCache;
use crate::config::{Config, RelayConfig};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::patterns::{NOTE_KEY, ZENN_SLUG};
use crate::race::first_truthy;
use crate::url_utils::{absolutize, apply_size_hint, join_path, with_target_param, with_target_path};

/// Platform-specific identifier derived from an article link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentId {
    /// note article key (`n` followed by hex).
    Note(String),
    /// Zenn article slug.
    Zenn(String),
}

impl ContentId {
    /// Derive the identifier from a canonical article link.
    ///
    /// Links on platforms without a metadata lookup (Qiita) yield `None`.
    #[must_use]
    pub fn from_link(link: &str) -> Option<Self> {
        let link = link.trim();
        if let Some(caps) = NOTE_KEY.captures(link) {
            return Some(Self::Note(caps[1].to_string()));
        }
        ZENN_SLUG
            .captures(link)
            .map(|caps| Self::Zenn(caps[1].to_string()))
    }

    #[must_use]
    pub fn source(&self) -> Source {
        match self {
            Self::Note(_) => Source::Note,
            Self::Zenn(_) => Source::Zenn,
        }
    }

    /// Key under which the resolved thumbnail is cached.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Note(key) => format!("note:{key}"),
            Self::Zenn(slug) => format!("zenn:{slug}"),
        }
    }

    /// JSON pointer to the image field in the metadata response.
    fn image_pointer(&self) -> &'static str {
        match self {
            Self::Note(_) => "/data/eyecatch",
            Self::Zenn(_) => "/article/og_image_url",
        }
    }
}

/// A thumbnail resolved for the entry with the given link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailUpdate {
    pub link: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Direct,
    TextRelay,
    RawRelay,
}

impl Strategy {
    const ALL: [Strategy; 3] = [Strategy::Direct, Strategy::TextRelay, Strategy::RawRelay];
}

/// Resolves missing thumbnails with a fixed pool of workers.
pub struct Backfill {
    http: HttpClient,
    relays: RelayConfig,
    cache: Arc<ThumbnailCache>,
    api_bases: HashMap<Source, String>,
    concurrency: usize,
    size_hint_hosts: Vec<String>,
    image_width_hint: u32,
}

impl Backfill {
    #[must_use]
    pub fn new(config: &Config, http: HttpClient, cache: Arc<ThumbnailCache>) -> Self {
        let mut api_bases: HashMap<Source, String> = Source::ALL
            .iter()
            .map(|s| (*s, s.origin().to_string()))
            .collect();
        // The first configured account of each platform decides its API base
        for source in config.sources.iter().rev() {
            api_bases.insert(source.kind, source.api_base());
        }

        Self {
            http,
            relays: config.relays.clone(),
            cache,
            api_bases,
            concurrency: config.backfill.concurrency.max(1),
            size_hint_hosts: config.backfill.size_hint_hosts.clone(),
            image_width_hint: config.backfill.image_width_hint,
        }
    }

    /// Metadata endpoint for an identifier.
    #[must_use]
    pub fn metadata_endpoint(&self, id: &ContentId) -> String {
        let base = self
            .api_bases
            .get(&id.source())
            .map_or(id.source().origin(), String::as_str);
        match id {
            ContentId::Note(key) => join_path(base, &format!("api/v3/notes/{key}")),
            ContentId::Zenn(slug) => join_path(base, &format!("api/articles/{slug}")),
        }
    }

    /// Fresh cached thumbnail for `link`, without touching the network.
    #[must_use]
    pub fn cached(&self, link: &str) -> Option<String> {
        let id = ContentId::from_link(link)?;
        self.cache.get(&id.cache_key())
    }

    /// Resolve a thumbnail for `link`, from cache or network.
    ///
    /// Returns `None` for links without a content identifier and when no
    /// strategy produced a URL.
    pub async fn resolve(&self, link: &str) -> Option<String> {
        let id = ContentId::from_link(link)?;
        let key = id.cache_key();

        if let Some(url) = self.cache.get(&key) {
            debug!(key = %key, "thumbnail cache hit");
            return Some(url);
        }

        let endpoint = self.metadata_endpoint(&id);
        let found = first_truthy(Strategy::ALL.map(|s| self.attempt(s, &id, &endpoint))).await;
        if found.is_empty() {
            debug!(key = %key, "no thumbnail resolved");
            return None;
        }

        let url = apply_size_hint(
            &absolutize(&found, id.source().origin()),
            &self.size_hint_hosts,
            self.image_width_hint,
        );
        if let Err(e) = self.cache.insert(&key, &url) {
            warn!(key = %key, error = %e, "failed to persist thumbnail");
        }
        Some(url)
    }

    /// Backfill every image-less article, sending one update per resolution.
    ///
    /// Runs `concurrency` workers over a shared cursor. One article's
    /// failure never stops the others.
    pub async fn run(&self, articles: &[Article], updates: &UnboundedSender<ThumbnailUpdate>) {
        let queue: Vec<&Article> = articles.iter().filter(|a| a.needs_thumbnail()).collect();
        if queue.is_empty() {
            return;
        }

        let cursor = AtomicUsize::new(0);
        let workers = self.concurrency.min(queue.len());
        debug!(pending = queue.len(), workers, "starting thumbnail backfill");

        let resolved: usize = join_all((0..workers).map(|_| self.worker(&queue, &cursor, updates)))
            .await
            .into_iter()
            .sum();

        info!(resolved, pending = queue.len(), "thumbnail backfill finished");
    }

    async fn worker(
        &self,
        queue: &[&Article],
        cursor: &AtomicUsize,
        updates: &UnboundedSender<ThumbnailUpdate>,
    ) -> usize {
        let mut resolved = 0;
        loop {
            let index = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(article) = queue.get(index) else {
                break;
            };

            let Some(image_url) = self.resolve(&article.link).await else {
                continue;
            };
            resolved += 1;

            let update = ThumbnailUpdate {
                link: article.link.clone(),
                image_url,
            };
            if updates.send(update).is_err() {
                debug!(link = %article.link, "thumbnail receiver gone");
            }
        }
        resolved
    }

    async fn attempt(&self, strategy: Strategy, id: &ContentId, endpoint: &str) -> Result<String> {
        let body: Value = match strategy {
            Strategy::Direct => self.http.get_json(endpoint).await?,
            Strategy::TextRelay => {
                let text = self
                    .http
                    .get_text(&with_target_path(&self.relays.text, endpoint))
                    .await?;
                serde_json::from_str(outermost_json(&text).ok_or(Error::NoPayload)?)?
            }
            Strategy::RawRelay => {
                self.http
                    .get_json(&with_target_param(&self.relays.raw, "url", endpoint))
                    .await?
            }
        };

        let image = body
            .pointer(id.image_pointer())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        debug!(?strategy, found = !image.is_empty(), "metadata lookup");
        Ok(image)
    }
}

/// The outermost `{...}` span of a document that embeds a JSON body.
fn outermost_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
