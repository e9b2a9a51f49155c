//! Race/fallback combinators.
//!
//! Several strategies for the same result run concurrently; the first one
//! producing an acceptable value wins and the rest are dropped (abandoned).
//! Failures never propagate: an attempt that errors counts as "no result".

use std::future::Future;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use crate::error::{Error, Result};

/// Resolve with the first successful value accepted by `accept`.
///
/// Returns `None` only after every attempt has settled without an
/// acceptable value. Errors are logged at debug level and swallowed.
pub async fn first_matching<T, F, I, P>(attempts: I, accept: P) -> Option<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let mut pending: FuturesUnordered<F> = attempts.into_iter().collect();

    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(value) if accept(&value) => return Some(value),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "race attempt failed"),
        }
    }

    None
}

/// First non-empty string among the attempts, or `""` once all settled.
pub async fn first_truthy<F, I>(attempts: I) -> String
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<String>>,
{
    first_matching(attempts, |s: &String| !s.trim().is_empty())
        .await
        .unwrap_or_default()
}

/// First non-empty list among the attempts, or an empty list once all settled.
pub async fn first_non_empty<T, F, I>(attempts: I) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<Vec<T>>>,
{
    first_matching(attempts, |items: &Vec<T>| !items.is_empty())
        .await
        .unwrap_or_default()
}

/// Run `fut` with a time budget; an elapsed budget becomes [`Error::Timeout`].
pub async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(outcome) => outcome,
        Err(_) => Err(Error::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))),
    }
}
