use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport failure: DNS, TLS, connect, timeout or a truncated body.
    #[error("request to GitHub failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A 2xx body that does not have the expected shape.
    #[error("could not decode {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 404: unknown account or repository, or a token without access.
    #[error("GitHub returned 404 for {url}")]
    NotFound { url: String },

    /// HTTP 401: the token is missing, expired or revoked.
    #[error("unauthorized: {url} rejected the access token")]
    Unauthorized { url: String },

    /// The API quota is exhausted. `reset_at` comes from `x-ratelimit-reset`.
    #[error("rate limited on {url}; quota resets at {reset_at:?}")]
    RateLimited {
        url: String,
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("GitHub returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("repository \"{repo}\" is not in owner/name form")]
    InvalidRepository { repo: String },

    #[error("access token contains characters that are not valid in an HTTP header")]
    InvalidToken,

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
