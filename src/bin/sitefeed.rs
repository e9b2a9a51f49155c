//! Render aggregated articles into an HTML page.
//!
//! Usage:
//!   sitefeed --page index.html --out dist/index.html --config sitefeed.toml
//!   sitefeed --page articles.html --note shiori_02_14_ --zenn shiori --filter zenn

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sitefeed::logging::init_logging;
use sitefeed::{
    Aggregator, Config, FileStore, Filter, KeyValueStore, MemoryStore, Page, Source, SourceConfig,
};

/// Fetch note/Zenn/Qiita articles and render them into a page.
#[derive(Parser, Debug)]
#[command(name = "sitefeed", version, about)]
struct Args {
    /// HTML page to render into
    #[arg(long, env = "SITEFEED_PAGE")]
    page: PathBuf,

    /// Output file (stdout when absent)
    #[arg(long)]
    out: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "SITEFEED_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the persistent caches (in-memory when absent)
    #[arg(long, env = "SITEFEED_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Show only one platform's entries: all, note, zenn or qiita
    #[arg(long, default_value = "all")]
    filter: Filter,

    /// Render the cached list only, without network access
    #[arg(long)]
    offline: bool,

    /// Add a note account after the configured sources
    #[arg(long, value_name = "USER")]
    note: Option<String>,

    /// Add a Zenn account after the configured sources
    #[arg(long, value_name = "USER")]
    zenn: Option<String>,

    /// Add a Qiita account after the configured sources
    #[arg(long, value_name = "USER")]
    qiita: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        for (kind, user) in [
            (Source::Note, &self.note),
            (Source::Zenn, &self.zenn),
            (Source::Qiita, &self.qiita),
        ] {
            if let Some(user) = user {
                config.sources.push(SourceConfig::new(kind, user.clone()));
            }
        }
        Ok(config)
    }

    fn store(&self) -> Result<Arc<dyn KeyValueStore>> {
        Ok(match &self.cache_dir {
            Some(dir) => Arc::new(
                FileStore::open(dir)
                    .with_context(|| format!("failed to open cache dir {}", dir.display()))?,
            ),
            None => Arc::new(MemoryStore::new()),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.load_config()?;
    let html = std::fs::read_to_string(&args.page)
        .with_context(|| format!("failed to read page {}", args.page.display()))?;
    let page = Page::parse(&html, config.render.clone());

    let aggregator = Aggregator::new(config, args.store()?).context("invalid configuration")?;
    let articles = if args.offline {
        aggregator.render_cached(&page)
    } else {
        aggregator.run(&page).await
    };

    page.apply_filter(args.filter);
    info!(articles = articles.len(), filter = %args.filter, "page rendered");

    let output = page.html();
    match &args.out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}
