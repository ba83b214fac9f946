//! Raw response shapes for the repository and traffic endpoints.

use serde::Deserialize;

use followscope_core::{RepositorySummary, TrafficCounts};

/// Subset of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    /// Actual watchers. `watchers_count` is a legacy alias for stars.
    #[serde(default)]
    pub subscribers_count: Option<u64>,
    #[serde(default)]
    pub watchers_count: u64,
}

impl From<RepositoryPayload> for RepositorySummary {
    fn from(repo: RepositoryPayload) -> Self {
        RepositorySummary {
            name: repo.name,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.subscribers_count.unwrap_or(repo.watchers_count),
        }
    }
}

/// Totals from `traffic/views` or `traffic/clones`; the per-day breakdown
/// in the response is ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrafficPayload {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

impl From<TrafficPayload> for TrafficCounts {
    fn from(t: TrafficPayload) -> Self {
        TrafficCounts {
            count: t.count,
            uniques: t.uniques,
        }
    }
}
