//! End-to-end aggregation of one page.
//!
//! The cached list is painted first. Every source resolution then triggers
//! its own merge and render pass, and newly seen image-less links are handed
//! to the thumbnail backfill. Thumbnail updates arrive on a channel and are
//! applied to the page by the same task that owns it. The merged list is
//! persisted once every source has settled.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use crate::article::Article;
use crate::backfill::{Backfill, ThumbnailUpdate};
use crate::cache::{ArticleListCache, ThumbnailCache};
use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::merge::merge;
use crate::render::Page;
use crate::sources::{self, FetchContext};
use crate::store::KeyValueStore;

/// Fetches, merges, renders and backfills articles for a page.
pub struct Aggregator {
    config: Config,
    ctx: FetchContext,
    list_cache: ArticleListCache,
    backfill: Backfill,
}

impl Aggregator {
    /// Build an aggregator over `store`. Fails only on invalid configuration.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::new(config.request_timeout())?;
        let list_cache = ArticleListCache::new(
            store.clone(),
            config.cache.article_list_key.clone(),
            config.cache.article_list_ttl_secs,
        );
        let thumbnails = Arc::new(ThumbnailCache::load(
            store,
            config.cache.thumbnail_key.clone(),
            config.cache.thumbnail_ttl_secs,
        ));
        let backfill = Backfill::new(&config, http.clone(), thumbnails);
        let ctx = FetchContext::from_config(&config, http);

        Ok(Self {
            config,
            ctx,
            list_cache,
            backfill,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render the cached list with cached thumbnails only. No network.
    pub fn render_cached(&self, page: &Page) -> Vec<Article> {
        if !page.has_targets() {
            debug!("page has no render targets");
            return Vec::new();
        }

        let cached: Vec<Article> = self
            .list_cache
            .read()
            .iter()
            .map(|a| self.with_cached_thumbnail(a))
            .collect();
        if cached.is_empty() {
            info!("no cached articles");
        } else {
            page.render(&cached);
            info!(count = cached.len(), "rendered cached articles");
        }
        cached
    }

    /// Run the full pipeline against `page` and return the final list.
    ///
    /// Never fails: sources that fail contribute nothing, and when every
    /// source fails the page keeps whatever it showed before.
    pub async fn run(&self, page: &Page) -> Vec<Article> {
        if !page.has_targets() {
            debug!("page has no render targets");
            return Vec::new();
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<ThumbnailUpdate>();
        let mut sender = Some(tx);
        let mut queued: HashSet<String> = HashSet::new();
        let mut resolved: HashMap<String, String> = HashMap::new();
        let mut backfills = FuturesUnordered::new();

        let cached = self.render_cached(page);
        if let Some(tx) = &sender {
            let pending = take_pending(&cached, &resolved, &mut queued);
            if !pending.is_empty() {
                backfills.push(self.backfill_pass(pending, tx.clone()));
            }
        }

        let enabled: Vec<_> = self.config.enabled_sources().collect();
        if enabled.is_empty() {
            warn!("no sources enabled");
        }
        let mut per_source: Vec<Vec<Article>> = vec![Vec::new(); enabled.len()];
        let mut fetches: FuturesUnordered<_> = enabled
            .iter()
            .enumerate()
            .map(|(index, source)| async move { (index, sources::fetch(source, &self.ctx).await) })
            .collect();
        let mut merged: Vec<Article> = Vec::new();

        if fetches.is_empty() {
            sender = None;
        }

        loop {
            tokio::select! {
                Some((index, items)) = fetches.next(), if !fetches.is_empty() => {
                    per_source[index] = items;
                    merged = merge(&per_source);

                    if !merged.is_empty() {
                        let shown = with_thumbnails(&merged, &resolved);
                        page.render(&shown);
                        info!(count = shown.len(), "rendered merged articles");
                    }

                    if let Some(tx) = &sender {
                        let pending = take_pending(&merged, &resolved, &mut queued);
                        if !pending.is_empty() {
                            backfills.push(self.backfill_pass(pending, tx.clone()));
                        }
                    }

                    if fetches.is_empty() {
                        self.persist(&with_thumbnails(&merged, &resolved));
                        sender = None;
                    }
                }
                Some(()) = backfills.next(), if !backfills.is_empty() => {}
                Some(update) = rx.recv() => {
                    if page.apply_thumbnail(&update) {
                        debug!(link = %update.link, "applied thumbnail");
                    }
                    resolved.insert(update.link, update.image_url);
                }
                else => break,
            }
        }

        if merged.is_empty() {
            warn!("no articles from any source; page left as it was");
        }
        with_thumbnails(&merged, &resolved)
    }

    async fn backfill_pass(&self, pending: Vec<Article>, updates: UnboundedSender<ThumbnailUpdate>) {
        self.backfill.run(&pending, &updates).await;
    }

    fn persist(&self, merged: &[Article]) {
        if merged.is_empty() {
            return;
        }
        match self.list_cache.write(merged) {
            Ok(()) => debug!(count = merged.len(), "persisted article list"),
            Err(e) => warn!(error = %e, "failed to persist article list"),
        }
    }

    fn with_cached_thumbnail(&self, article: &Article) -> Article {
        if !article.needs_thumbnail() {
            return article.clone();
        }
        match self.backfill.cached(&article.link) {
            Some(url) => article.with_image_url(url),
            None => article.clone(),
        }
    }
}

/// Re-apply thumbnails resolved earlier in the run.
fn with_thumbnails(articles: &[Article], resolved: &HashMap<String, String>) -> Vec<Article> {
    articles
        .iter()
        .map(|a| match resolved.get(&a.link) {
            Some(url) if a.needs_thumbnail() => a.with_image_url(url.as_str()),
            _ => a.clone(),
        })
        .collect()
}

/// Image-less articles not yet queued for backfill. Marks them queued.
fn take_pending(
    articles: &[Article],
    resolved: &HashMap<String, String>,
    queued: &mut HashSet<String>,
) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| a.needs_thumbnail() && !resolved.contains_key(&a.link))
        .filter(|a| queued.insert(a.link.clone()))
        .cloned()
        .collect()
}
