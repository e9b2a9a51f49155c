//! Thin HTTP layer shared by fetchers and the thumbnail backfill.
//!
//! Every request is bounded by the configured per-attempt timeout and
//! decoded to UTF-8 using the payload's declared charset.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::encoding::transcode_to_utf8;
use crate::error::{Error, Result};
use crate::race::bounded;

const USER_AGENT: &str = concat!("sitefeed/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with a per-attempt time budget.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client whose every request is abandoned after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "application/json, application/rss+xml, application/atom+xml, text/xml;q=0.9, */*;q=0.8",
            ),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// The per-attempt time budget.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the body as UTF-8 text.
    ///
    /// Non-success statuses are errors; the body is not read for them.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        bounded(self.timeout, self.get_text_unbounded(url)).await
    }

    /// GET `url` and deserialize the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get_text(url).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_text_unbounded(&self, url: &str) -> Result<String> {
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "http response");

        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport)?;

        Ok(transcode_to_utf8(&body, content_type.as_deref()))
    }
}
