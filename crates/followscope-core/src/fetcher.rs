//! The upstream collaborator that supplies one run's raw observations.

use std::future::Future;

use crate::types::{FollowerPayload, ProfilePayload, TrafficOutcome};

/// Source of profile, follower and traffic data for the monitored account.
///
/// Profile and follower failures are fatal for a run and surface as
/// `Self::Error`. Traffic is optional and never fails at the type level.
pub trait Fetcher {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_profile(&self) -> impl Future<Output = Result<ProfilePayload, Self::Error>> + Send;

    /// Returns the complete follower list, all pages drained.
    fn fetch_followers(
        &self,
    ) -> impl Future<Output = Result<Vec<FollowerPayload>, Self::Error>> + Send;

    fn fetch_traffic(&self) -> impl Future<Output = TrafficOutcome> + Send;
}
