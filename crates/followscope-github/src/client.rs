//! HTTP client for the GitHub REST API.
//!
//! Wraps `reqwest` with token authentication, a bounded per-request timeout,
//! typed status classification, and retry on transient failures.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use followscope_core::{AppConfig, ProfilePayload};

use crate::error::GitHubError;
use crate::retry::RetryPolicy;

const API_VERSION: &str = "2022-11-28";

/// Connection and paging settings for [`GitHubClient`].
#[derive(Clone)]
pub struct GitHubSettings {
    pub username: String,
    pub token: String,
    pub base_url: String,
    pub per_page: u32,
    /// `owner/name` of the repository whose traffic is recorded.
    pub traffic_repo: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl GitHubSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            username: config.username.clone(),
            token: config.token.clone(),
            base_url: config.api_base_url.clone(),
            per_page: config.per_page,
            traffic_repo: config.traffic_repo.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("username", &self.username)
            .field("token", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("per_page", &self.per_page)
            .field("traffic_repo", &self.traffic_repo)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

/// Client for the GitHub REST API, bound to one monitored account.
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    pub(crate) username: String,
    pub(crate) per_page: u32,
    pub(crate) traffic_repo: Option<String>,
    retry: RetryPolicy,
}

impl GitHubClient {
    /// Builds a client from `settings`.
    ///
    /// # Errors
    ///
    /// - [`GitHubError::InvalidBaseUrl`] if `settings.base_url` is not an
    ///   absolute http(s) URL.
    /// - [`GitHubError::InvalidToken`] if the token cannot be sent as a header.
    /// - [`GitHubError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(settings: &GitHubSettings) -> Result<Self, GitHubError> {
        let base_url = parse_base_url(&settings.base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .map_err(|_| GitHubError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: settings.username.clone(),
            per_page: settings.per_page,
            traffic_repo: settings.traffic_repo.clone(),
            retry: RetryPolicy::new(settings.max_retries, settings.backoff_base_ms),
        })
    }

    /// Fetches the monitored account's profile from `GET /users/{login}`.
    ///
    /// # Errors
    ///
    /// Any [`GitHubError`] from the request; see [`Self::get_json`].
    pub async fn fetch_profile(&self) -> Result<ProfilePayload, GitHubError> {
        let url = self.endpoint(&["users", &self.username], &[])?;
        self.get_json(&url, &format!("profile of {}", self.username))
            .await
    }

    /// Builds an API URL from percent-encoded path segments and query pairs.
    pub(crate) fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, GitHubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GitHubError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with retry and decodes the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// - [`GitHubError::NotFound`] on 404.
    /// - [`GitHubError::Unauthorized`] on 401.
    /// - [`GitHubError::RateLimited`] on 429, or 403 with an exhausted quota.
    /// - [`GitHubError::UnexpectedStatus`] on any other non-2xx status
    ///   (5xx retried first).
    /// - [`GitHubError::Http`] on network failure after retries.
    /// - [`GitHubError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T>(&self, url: &Url, context: &str) -> Result<T, GitHubError>
    where
        T: DeserializeOwned,
    {
        self.retry.run(|| async move {
            let response = self.client.get(url.clone()).send().await?;
            if let Some(err) = classify_status(response.status(), response.headers(), url) {
                return Err(err);
            }
            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|e| GitHubError::Deserialize {
                context: context.to_owned(),
                source: e,
            })
        })
        .await
    }
}

/// Normalises the base URL so it ends with exactly one slash and rejects
/// anything that cannot carry path segments.
fn parse_base_url(raw: &str) -> Result<Url, GitHubError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| GitHubError::InvalidBaseUrl {
        base_url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(GitHubError::InvalidBaseUrl {
            base_url: raw.to_owned(),
            reason: "expected an absolute http(s) URL".to_owned(),
        });
    }
    Ok(url)
}

/// Maps a non-success response to a typed error. Returns `None` for 2xx.
pub(crate) fn classify_status(
    status: StatusCode,
    headers: &HeaderMap,
    url: &Url,
) -> Option<GitHubError> {
    if status.is_success() {
        return None;
    }
    let url = url.to_string();

    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    let err = match status {
        StatusCode::NOT_FOUND => GitHubError::NotFound { url },
        StatusCode::UNAUTHORIZED => GitHubError::Unauthorized { url },
        StatusCode::TOO_MANY_REQUESTS => GitHubError::RateLimited {
            url,
            reset_at: rate_limit_reset(headers),
        },
        StatusCode::FORBIDDEN if quota_exhausted => GitHubError::RateLimited {
            url,
            reset_at: rate_limit_reset(headers),
        },
        other => GitHubError::UnexpectedStatus {
            status: other.as_u16(),
            url,
        },
    };
    Some(err)
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let secs = headers
        .get("x-ratelimit-reset")?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
