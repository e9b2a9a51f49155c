//! Last merged article list, used to paint the page before any fetch resolves.

use std::sync::Arc;

use tracing::debug;

use super::{is_fresh, now_millis, ttl_ms_from_secs, Envelope};
use crate::article::Article;
use crate::error::Result;
use crate::store::KeyValueStore;

/// Cache of the most recent non-empty merged list.
#[derive(Clone)]
pub struct ArticleListCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    ttl_ms: i64,
}

impl ArticleListCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            store,
            key: key.into(),
            ttl_ms: ttl_ms_from_secs(ttl_secs),
        }
    }

    /// Cached items if present and fresh, otherwise empty.
    #[must_use]
    pub fn read(&self) -> Vec<Article> {
        self.read_at(now_millis())
    }

    /// Like [`read`](Self::read) with an explicit clock.
    #[must_use]
    pub fn read_at(&self, now_ms: i64) -> Vec<Article> {
        let Some(raw) = self.store.get(&self.key) else {
            return Vec::new();
        };

        match serde_json::from_str::<Envelope<Vec<Article>>>(&raw) {
            Ok(envelope) if is_fresh(envelope.timestamp, self.ttl_ms, now_ms) => envelope.data,
            Ok(envelope) => {
                debug!(key = %self.key, age_ms = now_ms - envelope.timestamp, "article list cache expired");
                Vec::new()
            }
            Err(e) => {
                debug!(key = %self.key, error = %e, "article list cache unreadable");
                Vec::new()
            }
        }
    }

    /// Persist `items`. Empty lists are not written, so a failed refresh
    /// never wipes a good cache.
    pub fn write(&self, items: &[Article]) -> Result<()> {
        self.write_at(items, now_millis())
    }

    /// Like [`write`](Self::write) with an explicit clock.
    pub fn write_at(&self, items: &[Article], now_ms: i64) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let envelope = Envelope {
            timestamp: now_ms,
            data: items,
        };
        self.store.set(&self.key, &serde_json::to_string(&envelope)?)
    }
}
