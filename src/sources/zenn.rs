//! Zenn: the public article list API.
//!
//! The list carries no images; Zenn thumbnails come from the backfill.

use serde::Deserialize;

use super::{fetch_json_items, FetchContext};
use crate::article::{Article, Source};
use crate::config::SourceConfig;
use crate::dates::first_timestamp_ms;
use crate::error::Result;
use crate::url_utils::{api_url, join_path};

#[derive(Debug, Deserialize)]
struct ArticleList {
    #[serde(default)]
    articles: Vec<ZennArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ZennArticle {
    title: String,
    slug: String,
    path: Option<String>,
    published_at: Option<String>,
    body_updated_at: Option<String>,
}

pub async fn fetch_primary(source: &SourceConfig, ctx: &FetchContext) -> Result<Vec<Article>> {
    let url = api_url(
        &source.api_base(),
        &["api", "articles"],
        &[("username", source.user.as_str()), ("order", "latest")],
    );

    fetch_json_items(ctx, &url, |list: ArticleList| {
        Ok(list
            .articles
            .iter()
            .map(|a| {
                let link = match a.path.as_deref().filter(|p| !p.is_empty()) {
                    Some(path) => join_path(Source::Zenn.origin(), path),
                    None if !a.slug.is_empty() => format!(
                        "{}/{}/articles/{}",
                        Source::Zenn.origin(),
                        source.user,
                        a.slug
                    ),
                    None => String::new(),
                };
                let published =
                    first_timestamp_ms([a.published_at.as_deref(), a.body_updated_at.as_deref()]);
                ctx.article(Source::Zenn, &a.title, &link, published, None)
            })
            .collect())
    })
    .await
}
