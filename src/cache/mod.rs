//! TTL caches over a [`KeyValueStore`](crate::store::KeyValueStore).
//!
//! Both caches persist a JSON envelope `{ "timestamp": <ms>, "data": ... }`
//! under a fixed key. An envelope is valid while `now - timestamp <= ttl`.

mod article_list;
mod thumbnail;

pub use article_list::ArticleListCache;
pub use thumbnail::{ThumbnailCache, ThumbnailEntry};

use serde::{Deserialize, Serialize};

/// Stored wrapper around cached data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// When the data was written, in epoch milliseconds.
    pub timestamp: i64,
    pub data: T,
}

/// Get current timestamp in milliseconds since Unix epoch
#[inline]
#[must_use]
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Check whether a value written at `written_at_ms` is still valid at `now_ms`.
///
/// # Examples
/// ```
/// use sitefeed::cache::is_fresh;
///
/// assert!(is_fresh(1_000, 500, 1_500));  // exactly at the TTL boundary
/// assert!(!is_fresh(1_000, 500, 1_501)); // one millisecond past it
/// ```
#[inline]
#[must_use]
pub fn is_fresh(written_at_ms: i64, ttl_ms: i64, now_ms: i64) -> bool {
    now_ms.saturating_sub(written_at_ms) <= ttl_ms
}

/// Convert a TTL in seconds to milliseconds, saturating.
#[inline]
#[must_use]
pub(crate) fn ttl_ms_from_secs(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}
