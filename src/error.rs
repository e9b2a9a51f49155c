//! Error types for sitefeed.
//!
//! Every fetch attempt, parse step and store operation reports failures
//! through [`Error`]. The pipeline recovers from all of them locally; only
//! configuration loading surfaces errors to the caller.

/// Error type for fetch, parse, cache and configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or the body could not be read.
    #[error("transport failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The attempt did not finish within its time budget.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// A JSON payload was malformed or missing expected fields.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// An RSS/Atom document could not be parsed.
    #[error("feed parsing failed: {0}")]
    Feed(String),

    /// A relay response did not contain the embedded payload.
    #[error("relay response had no embedded payload")]
    NoPayload,

    /// The key/value store could not be read or written.
    #[error("store I/O failed: {0}")]
    Store(#[from] std::io::Error),

    /// Configuration was unreadable or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for sitefeed operations.
pub type Result<T> = std::result::Result<T, Error>;
