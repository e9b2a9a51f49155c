//! The common article record every source normalizes into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content platform an article was fetched from.
///
/// Declaration order is the default source priority used when two
/// platforms report the same link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Note,
    Zenn,
    Qiita,
}

impl Source {
    /// All sources in default priority order.
    pub const ALL: [Source; 3] = [Source::Note, Source::Zenn, Source::Qiita];

    /// Tag written to `data-source` on rendered entries.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Source::Note => "note",
            Source::Zenn => "zenn",
            Source::Qiita => "qiita",
        }
    }

    /// Human-readable platform name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Source::Note => "note",
            Source::Zenn => "Zenn",
            Source::Qiita => "Qiita",
        }
    }

    /// Public origin of the platform, used to absolutize relative URLs.
    #[must_use]
    pub const fn origin(self) -> &'static str {
        match self {
            Source::Note => "https://note.com",
            Source::Zenn => "https://zenn.dev",
            Source::Qiita => "https://qiita.com",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(Source::Note),
            "zenn" => Ok(Source::Zenn),
            "qiita" => Ok(Source::Qiita),
            other => Err(format!("unknown source: {other}")),
        }
    }
}

/// A normalized article.
///
/// Records are immutable once built; use [`Article::with_image_url`] to
/// derive a copy carrying a backfilled thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Display title. Required non-empty.
    pub title: String,

    /// Canonical URL and deduplication key. Required non-empty.
    pub link: String,

    /// Publish time in epoch milliseconds, `0` when unknown.
    #[serde(default)]
    pub published_at_ms: i64,

    /// Formatted publish date (`YYYY/MM/DD`), empty when unknown.
    #[serde(default)]
    pub display_date: String,

    /// Thumbnail URL. Empty means unresolved and eligible for backfill.
    #[serde(default)]
    pub image_url: String,

    /// Platform that produced the record.
    pub source: Source,
}

impl Article {
    /// Whether the record has the fields required to be merged and rendered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.link.trim().is_empty()
    }

    /// Whether the record still needs a thumbnail.
    #[must_use]
    pub fn needs_thumbnail(&self) -> bool {
        self.image_url.trim().is_empty()
    }

    /// Returns a copy of this article with the given thumbnail.
    #[must_use]
    pub fn with_image_url(&self, image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..self.clone()
        }
    }
}
