use followscope_core::{Fetcher, FollowerPayload, ProfilePayload, TrafficOutcome};

use crate::client::GitHubClient;
use crate::error::GitHubError;

impl Fetcher for GitHubClient {
    type Error = GitHubError;

    async fn fetch_profile(&self) -> Result<ProfilePayload, GitHubError> {
        GitHubClient::fetch_profile(self).await
    }

    async fn fetch_followers(&self) -> Result<Vec<FollowerPayload>, GitHubError> {
        self.fetch_all_followers().await
    }

    async fn fetch_traffic(&self) -> TrafficOutcome {
        GitHubClient::fetch_traffic(self).await
    }
}
