//! Configuration for the aggregation pipeline.
//!
//! `Config` is deserialized from TOML with every field optional; missing
//! fields take the values in [`defaults`].
//!
//! ```toml
//! request_timeout_ms = 4000
//!
//! [[sources]]
//! kind = "note"
//! user = "someone"
//!
//! [[sources]]
//! kind = "zenn"
//! user = "someone"
//!
//! [backfill]
//! concurrency = 4
//! ```

pub mod defaults;

use std::path::Path;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::article::Source;
use crate::dates::offset_from_hours;
use crate::error::{Error, Result};
use crate::url_utils::join_path;

/// Top-level configuration.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sources to aggregate, in dedupe priority order.
    pub sources: Vec<SourceConfig>,

    /// CORS-relay endpoints used as fetch fallbacks.
    pub relays: RelayConfig,

    /// Time budget for every single network attempt.
    ///
    /// Default: `5000`
    pub request_timeout_ms: u64,

    /// Articles kept from each source after normalization.
    ///
    /// Default: `20`
    pub max_items_per_source: usize,

    pub cache: CacheConfig,

    pub backfill: BackfillConfig,

    pub render: RenderConfig,

    /// Offset used to format `display_date`, in whole hours east of UTC.
    ///
    /// Default: `9`
    pub display_utc_offset_hours: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            relays: RelayConfig::default(),
            request_timeout_ms: defaults::request_timeout_ms(),
            max_items_per_source: defaults::max_items_per_source(),
            cache: CacheConfig::default(),
            backfill: BackfillConfig::default(),
            render: RenderConfig::default(),
            display_utc_offset_hours: defaults::display_utc_offset_hours(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(Error::Config("request_timeout_ms must be non-zero".into()));
        }
        if self.backfill.concurrency == 0 {
            return Err(Error::Config("backfill.concurrency must be non-zero".into()));
        }
        if offset_from_hours(self.display_utc_offset_hours).is_none() {
            return Err(Error::Config(format!(
                "display_utc_offset_hours out of range: {}",
                self.display_utc_offset_hours
            )));
        }
        if let Some(source) = self.sources.iter().find(|s| s.user.trim().is_empty()) {
            return Err(Error::Config(format!("source {} has an empty user", source.kind)));
        }
        Ok(())
    }

    /// Per-attempt timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Offset for display dates; falls back to UTC if out of range.
    #[must_use]
    pub fn display_offset(&self) -> FixedOffset {
        offset_from_hours(self.display_utc_offset_hours).unwrap_or_else(|| Utc.fix())
    }

    /// Enabled sources in priority order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }
}

/// One content platform account.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub kind: Source,

    /// Account name on the platform.
    pub user: String,

    /// Override for the platform origin (API calls and metadata lookups).
    #[serde(default)]
    pub api_base: Option<String>,

    /// Override for the RSS/Atom feed URL.
    #[serde(default)]
    pub feed_url: Option<String>,

    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
}

impl SourceConfig {
    /// Convenience constructor with platform defaults.
    #[must_use]
    pub fn new(kind: Source, user: impl Into<String>) -> Self {
        Self {
            kind,
            user: user.into(),
            api_base: None,
            feed_url: None,
            enabled: true,
        }
    }

    /// Base URL for API requests.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.api_base
            .as_deref()
            .unwrap_or(self.kind.origin())
            .trim_end_matches('/')
            .to_string()
    }

    /// Feed URL, defaulting to the platform's per-user feed.
    #[must_use]
    pub fn feed_url(&self) -> String {
        if let Some(url) = &self.feed_url {
            return url.clone();
        }
        let path = match self.kind {
            Source::Note => format!("{}/rss", self.user),
            Source::Zenn | Source::Qiita => format!("{}/feed", self.user),
        };
        join_path(&self.api_base(), &path)
    }
}

/// CORS-relay endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Converts an RSS feed to JSON; takes `?rss_url=`.
    pub json_feed: String,

    /// Returns the target body verbatim; takes `?url=`.
    pub raw: String,

    /// Returns a text rendition embedding the target body; takes the target as a path.
    pub text: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            json_feed: defaults::json_feed_relay(),
            raw: defaults::raw_relay(),
            text: defaults::text_relay(),
        }
    }
}

/// Store keys and TTLs for the two caches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub article_list_key: String,
    pub thumbnail_key: String,
    pub article_list_ttl_secs: u64,
    pub thumbnail_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            article_list_key: defaults::article_list_key(),
            thumbnail_key: defaults::thumbnail_key(),
            article_list_ttl_secs: defaults::article_list_ttl_secs(),
            thumbnail_ttl_secs: defaults::thumbnail_ttl_secs(),
        }
    }
}

/// Thumbnail backfill tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackfillConfig {
    /// Number of workers pulling from the shared queue.
    ///
    /// Default: `4`
    pub concurrency: usize,

    /// Width requested from hosts in `size_hint_hosts`.
    pub image_width_hint: u32,

    pub size_hint_hosts: Vec<String>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::backfill_concurrency(),
            image_width_hint: defaults::image_width_hint(),
            size_hint_hosts: defaults::size_hint_hosts(),
        }
    }
}

/// Render targets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Container of the filterable vertical list.
    pub list_selector: String,

    /// Container of the horizontal "latest" strip.
    pub strip_selector: String,

    /// Maximum list entries; `None` renders everything.
    pub list_limit: Option<usize>,

    /// Maximum strip entries.
    ///
    /// Default: `6`
    pub strip_limit: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            list_selector: defaults::list_selector(),
            strip_selector: defaults::strip_selector(),
            list_limit: None,
            strip_limit: defaults::strip_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").expect("empty config");
        assert!(config.sources.is_empty());
        assert_eq!(config.request_timeout_ms, 5_000);
        assert_eq!(config.backfill.concurrency, 4);
        assert_eq!(config.render.list_selector, "#articles-page .cards");
        assert_eq!(config.display_offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn sources_keep_declared_order() {
        let config = Config::from_toml_str(
            r#"
            [[sources]]
            kind = "qiita"
            user = "q"

            [[sources]]
            kind = "note"
            user = "n"
            enabled = false
            "#,
        )
        .expect("config");

        let kinds: Vec<Source> = config.sources.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![Source::Qiita, Source::Note]);
        assert_eq!(config.enabled_sources().count(), 1);
    }

    #[test]
    fn feed_url_defaults_follow_platform_layout() {
        assert_eq!(SourceConfig::new(Source::Note, "me").feed_url(), "https://note.com/me/rss");
        assert_eq!(SourceConfig::new(Source::Zenn, "me").feed_url(), "https://zenn.dev/me/feed");

        let mut qiita = SourceConfig::new(Source::Qiita, "me");
        qiita.api_base = Some("http://127.0.0.1:9999/".to_string());
        assert_eq!(qiita.feed_url(), "http://127.0.0.1:9999/me/feed");
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = Config::from_toml_str("[backfill]\nconcurrency = 0").expect_err("invalid");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn unknown_source_kind_is_rejected() {
        let result = Config::from_toml_str("[[sources]]\nkind = \"hatena\"\nuser = \"x\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
