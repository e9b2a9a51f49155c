//! Qiita: the v2 user items API.

use serde::Deserialize;

use super::image::pick_image;
use super::{fetch_json_items, FetchContext};
use crate::article::{Article, Source};
use crate::config::SourceConfig;
use crate::dates::first_timestamp_ms;
use crate::error::Result;
use crate::url_utils::api_url;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QiitaItem {
    title: String,
    url: String,
    created_at: Option<String>,
    updated_at: Option<String>,
    rendered_body: Option<String>,
}

pub async fn fetch_primary(source: &SourceConfig, ctx: &FetchContext) -> Result<Vec<Article>> {
    let per_page = ctx.max_items.clamp(1, 100).to_string();
    let url = api_url(
        &source.api_base(),
        &["api", "v2", "users", source.user.as_str(), "items"],
        &[("per_page", per_page.as_str())],
    );

    fetch_json_items(ctx, &url, |items: Vec<QiitaItem>| {
        Ok(items
            .iter()
            .map(|item| {
                let published =
                    first_timestamp_ms([item.created_at.as_deref(), item.updated_at.as_deref()]);
                let image = pick_image([None], [item.rendered_body.as_deref()]);
                ctx.article(Source::Qiita, &item.title, &item.url, published, image.as_deref())
            })
            .collect())
    })
    .await
}
