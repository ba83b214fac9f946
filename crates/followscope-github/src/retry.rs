//! Jittered exponential back-off for GitHub requests.
//!
//! Only transient failures are retried: timeouts, refused connections and
//! 5xx responses. An exhausted quota is not transient on any useful time
//! scale (the window can be an hour), so it is returned at once like every
//! other 4xx.

use std::future::Future;
use std::time::Duration;

use crate::error::GitHubError;

/// Upper bound on a single back-off sleep, before jitter.
const BACKOFF_CAP: Duration = Duration::from_secs(60);

/// How many times to retry, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub base: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, base_ms: u64) -> Self {
        Self {
            max_retries,
            base: Duration::from_millis(base_ms),
        }
    }

    /// Un-jittered sleep before retry `n` (1-based): `base * 2^(n-1)`,
    /// capped at [`BACKOFF_CAP`].
    fn nominal_delay(&self, n: u32) -> Duration {
        let factor = 1u32 << n.saturating_sub(1).min(16);
        self.base.saturating_mul(factor).min(BACKOFF_CAP)
    }

    /// Runs `attempt` until it succeeds, fails permanently, or the retry
    /// budget is spent. The last error is returned in the latter two cases.
    pub(crate) async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, GitHubError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GitHubError>>,
    {
        let mut retries = 0;
        loop {
            let err = match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && retries < self.max_retries => err,
                Err(err) => return Err(err),
            };
            retries += 1;
            let delay = jitter(self.nominal_delay(retries));
            tracing::warn!(
                retry = retries,
                of = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "transient GitHub failure, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Scales `delay` by a random factor in `[0.75, 1.25)`.
fn jitter(delay: Duration) -> Duration {
    delay.mul_f64(0.75 + rand::random::<f64>() * 0.5)
}

pub(crate) fn is_transient(err: &GitHubError) -> bool {
    match err {
        GitHubError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GitHubError::UnexpectedStatus { status, .. } => *status >= 500,
        GitHubError::Deserialize { .. }
        | GitHubError::NotFound { .. }
        | GitHubError::Unauthorized { .. }
        | GitHubError::RateLimited { .. }
        | GitHubError::PaginationLimit { .. }
        | GitHubError::InvalidRepository { .. }
        | GitHubError::InvalidToken
        | GitHubError::InvalidBaseUrl { .. } => false,
    }
}
