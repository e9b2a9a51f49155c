//! Resolved thumbnails keyed by platform content identifier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{is_fresh, now_millis, ttl_ms_from_secs, Envelope};
use crate::error::Result;
use crate::store::KeyValueStore;

/// One resolved thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailEntry {
    pub url: String,
    /// When the thumbnail was resolved, in epoch milliseconds.
    pub timestamp: i64,
}

/// Thumbnail cache, seeded from the store once and flushed on every insert.
pub struct ThumbnailCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    ttl_ms: i64,
    entries: Mutex<HashMap<String, ThumbnailEntry>>,
}

impl ThumbnailCache {
    /// Load the cache from `store`. Unreadable data starts an empty cache.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, ttl_secs: u64) -> Self {
        Self::load_at(store, key, ttl_secs, now_millis())
    }

    /// Like [`load`](Self::load) with an explicit clock. Expired entries are
    /// dropped.
    #[must_use]
    pub fn load_at(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        ttl_secs: u64,
        now_ms: i64,
    ) -> Self {
        let key = key.into();
        let ttl_ms = ttl_ms_from_secs(ttl_secs);
        let mut entries = store
            .get(&key)
            .and_then(|raw| {
                serde_json::from_str::<Envelope<HashMap<String, ThumbnailEntry>>>(&raw)
                    .inspect_err(|e| debug!(key = %key, error = %e, "thumbnail cache unreadable"))
                    .ok()
            })
            .map(|envelope| envelope.data)
            .unwrap_or_default();
        entries.retain(|_, entry| is_fresh(entry.timestamp, ttl_ms, now_ms));

        Self {
            store,
            key,
            ttl_ms,
            entries: Mutex::new(entries),
        }
    }

    /// Cached URL for `content_id` if resolved within the TTL.
    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<String> {
        self.get_at(content_id, now_millis())
    }

    /// Like [`get`](Self::get) with an explicit clock.
    #[must_use]
    pub fn get_at(&self, content_id: &str, now_ms: i64) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(content_id)
            .filter(|entry| is_fresh(entry.timestamp, self.ttl_ms, now_ms))
            .map(|entry| entry.url.clone())
    }

    /// Record a resolved thumbnail and flush the whole cache to the store.
    pub fn insert(&self, content_id: &str, url: &str) -> Result<()> {
        self.insert_at(content_id, url, now_millis())
    }

    /// Like [`insert`](Self::insert) with an explicit clock. Expired entries
    /// are pruned before the flush.
    pub fn insert_at(&self, content_id: &str, url: &str, now_ms: i64) -> Result<()> {
        let serialized = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.retain(|_, entry| is_fresh(entry.timestamp, self.ttl_ms, now_ms));
            entries.insert(
                content_id.to_string(),
                ThumbnailEntry {
                    url: url.to_string(),
                    timestamp: now_ms,
                },
            );
            serde_json::to_string(&Envelope {
                timestamp: now_ms,
                data: &*entries,
            })?
        };
        self.store.set(&self.key, &serialized)
    }

    /// Number of entries held in memory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
