use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Seed URL failed validation. Fatal before the crawl starts.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Transport-level failure (connect, timeout) for a single URL.
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response for a single URL.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("crawl cancelled")]
    Cancelled,

    #[error("{0}")]
    Internal(String),
}
