//! # sitefeed
//!
//! Article aggregation for static personal sites.
//!
//! Articles published on note, Zenn and Qiita are fetched, normalized into
//! one [`Article`] record, merged into a single newest-first list and
//! rendered into an HTML page next to hand-authored entries. Articles whose
//! feed carried no image get their thumbnail backfilled from the platform's
//! metadata endpoint.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sitefeed::{Aggregator, Config, MemoryStore, Page, Source, SourceConfig};
//!
//! # async fn demo() -> sitefeed::Result<()> {
//! let mut config = Config::default();
//! config.sources.push(SourceConfig::new(Source::Note, "shiori_02_14_"));
//! config.sources.push(SourceConfig::new(Source::Zenn, "shiori"));
//!
//! let page = Page::parse(
//!     r#"<body id="articles-page"><ul class="cards"></ul></body>"#,
//!     config.render.clone(),
//! );
//! let aggregator = Aggregator::new(config, Arc::new(MemoryStore::new()))?;
//! let articles = aggregator.run(&page).await;
//! println!("{} articles\n{}", articles.len(), page.html());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! Nothing is fatal to the page. A source that fails contributes no
//! articles, and if every source fails the page keeps what it already
//! showed. Only configuration loading reports errors to the caller.

mod error;
mod patterns;

/// Normalized article record and content platforms.
pub mod article;

/// Thumbnail backfill from platform metadata endpoints.
pub mod backfill;

/// TTL caches for the article list and resolved thumbnails.
pub mod cache;

/// Configuration loaded from TOML.
pub mod config;

/// Publish-date parsing and formatting.
pub mod dates;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// HTTP client with per-attempt timeouts.
pub mod http;

/// Logging setup.
pub mod logging;

/// Merge, dedupe and sort of per-source lists.
pub mod merge;

/// End-to-end aggregation of one page.
pub mod pipeline;

/// Race and fallback combinators over fallible futures.
pub mod race;

/// Rendering into list and strip targets.
pub mod render;

/// Per-platform article fetchers.
pub mod sources;

/// Key-value stores backing the caches.
pub mod store;

/// URL utilities for absolutizing, size hints and relay URLs.
pub mod url_utils;

// Public API - re-exports
pub use article::{Article, Source};
pub use backfill::ThumbnailUpdate;
pub use config::{Config, SourceConfig};
pub use error::{Error, Result};
pub use merge::merge;
pub use pipeline::Aggregator;
pub use render::{Filter, Page};
pub use store::{FileStore, KeyValueStore, MemoryStore};
