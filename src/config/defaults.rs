//! Default values for configuration fields
//!
//! This module centralizes all default value functions used in serde deserialization.

/// Default JSON feed relay (rss2json response shape)
#[inline]
pub fn json_feed_relay() -> String {
    "https://api.rss2json.com/v1/api.json".to_string()
}

/// Default raw pass-through relay, takes the target as `?url=`
#[inline]
pub fn raw_relay() -> String {
    "https://api.allorigins.win/raw".to_string()
}

/// Default text-extraction relay, takes the target as a path suffix
#[inline]
pub fn text_relay() -> String {
    "https://r.jina.ai".to_string()
}

/// Default per-attempt network timeout (5 seconds)
#[inline]
pub fn request_timeout_ms() -> u64 {
    5_000
}

/// Default cap on articles kept from one source
#[inline]
pub fn max_items_per_source() -> usize {
    20
}

/// Default store key for the merged article list
#[inline]
pub fn article_list_key() -> String {
    "sitefeed:articles".to_string()
}

/// Default store key for resolved thumbnails
#[inline]
pub fn thumbnail_key() -> String {
    "sitefeed:thumbnails".to_string()
}

/// Default article list TTL (30 minutes)
#[inline]
pub fn article_list_ttl_secs() -> u64 {
    30 * 60
}

/// Default thumbnail TTL (7 days); images change far less often than lists
#[inline]
pub fn thumbnail_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

/// Default backfill worker count
#[inline]
pub fn backfill_concurrency() -> usize {
    4
}

/// Default width requested from oversized image hosts
#[inline]
pub fn image_width_hint() -> u32 {
    600
}

/// Default hosts known to serve full-size originals
#[inline]
pub fn size_hint_hosts() -> Vec<String> {
    vec!["assets.st-note.com".to_string()]
}

/// Default list render target
#[inline]
pub fn list_selector() -> String {
    "#articles-page .cards".to_string()
}

/// Default strip render target
#[inline]
pub fn strip_selector() -> String {
    ".latest-articles__track".to_string()
}

/// Default number of entries in the latest strip
#[inline]
pub fn strip_limit() -> usize {
    6
}

/// Default display offset (JST)
#[inline]
pub fn display_utc_offset_hours() -> i32 {
    9
}

/// Sources are enabled unless switched off
#[inline]
pub fn enabled() -> bool {
    true
}
