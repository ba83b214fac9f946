//! Repository traffic: metadata, views and clones fetched together.

use followscope_core::{TrafficOutcome, TrafficSummary};

use crate::client::GitHubClient;
use crate::error::GitHubError;
use crate::types::{RepositoryPayload, TrafficPayload};

impl GitHubClient {
    /// Fetches traffic for the configured repository.
    ///
    /// Never fails: a missing repository setting or any error from the three
    /// underlying calls yields [`TrafficOutcome::Unavailable`].
    pub async fn fetch_traffic(&self) -> TrafficOutcome {
        let Some(repo) = self.traffic_repo.as_deref() else {
            tracing::debug!("no traffic repository configured");
            return TrafficOutcome::Unavailable {
                reason: "no traffic repository configured".to_owned(),
            };
        };

        match self.fetch_traffic_summary(repo).await {
            Ok(summary) => {
                tracing::debug!(
                    repo,
                    views = summary.views.count,
                    clones = summary.clones.count,
                    "fetched traffic"
                );
                TrafficOutcome::Available(summary)
            }
            Err(e) => {
                tracing::warn!(repo, error = %e, "traffic unavailable, continuing without it");
                TrafficOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Runs the repository, views and clones requests concurrently.
    ///
    /// # Errors
    ///
    /// The first [`GitHubError`] among the three requests.
    pub async fn fetch_traffic_summary(&self, repo: &str) -> Result<TrafficSummary, GitHubError> {
        let (owner, name) = repo
            .split_once('/')
            .ok_or_else(|| GitHubError::InvalidRepository {
                repo: repo.to_owned(),
            })?;

        let repo_url = self.endpoint(&["repos", owner, name], &[])?;
        let views_url = self.endpoint(&["repos", owner, name, "traffic", "views"], &[])?;
        let clones_url = self.endpoint(&["repos", owner, name, "traffic", "clones"], &[])?;

        let repo_ctx = format!("repository {repo}");
        let views_ctx = format!("views of {repo}");
        let clones_ctx = format!("clones of {repo}");

        let (meta, views, clones) = futures::try_join!(
            self.get_json::<RepositoryPayload>(&repo_url, &repo_ctx),
            self.get_json::<TrafficPayload>(&views_url, &views_ctx),
            self.get_json::<TrafficPayload>(&clones_url, &clones_ctx),
        )?;

        Ok(TrafficSummary {
            repository: meta.into(),
            views: views.into(),
            clones: clones.into(),
        })
    }
}
