use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One follower as stored in the `followers` roster and inside snapshots.
///
/// `id` is the only field used for membership comparisons. `followed_at` is
/// the time the run observed the follower, not the time they followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerRecord {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub followed_at: DateTime<Utc>,
}

/// One entry of an upstream follower page. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowerPayload {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(rename = "type", default = "default_account_type")]
    pub account_type: String,
}

fn default_account_type() -> String {
    "User".to_owned()
}

impl FollowerPayload {
    /// Stamps the payload with the run's observation time.
    #[must_use]
    pub fn observe(self, now: DateTime<Utc>) -> FollowerRecord {
        FollowerRecord {
            id: self.id,
            login: self.login,
            avatar_url: self.avatar_url,
            html_url: self.html_url,
            account_type: self.account_type,
            followed_at: now,
        }
    }
}

/// The account record exactly as the upstream API returned it.
///
/// Fields the snapshot does not persist are kept in `extra` so that nothing
/// is silently lost at decode time; the snapshot builder decides what is
/// copied forward.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfilePayload {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Point-in-time copy of the account metadata persisted with each snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: u64,
    pub followers_count: u64,
    pub following_count: u64,
    pub created_at: DateTime<Utc>,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
}

/// Rolling two-week totals as reported by the traffic endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficCounts {
    pub count: u64,
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub repository: RepositorySummary,
    pub views: TrafficCounts,
    pub clones: TrafficCounts,
}

/// Result of a traffic fetch. Traffic is optional, so failure is a value
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficOutcome {
    Available(TrafficSummary),
    Unavailable { reason: String },
}

impl TrafficOutcome {
    #[must_use]
    pub fn into_summary(self) -> Option<TrafficSummary> {
        match self {
            TrafficOutcome::Available(summary) => Some(summary),
            TrafficOutcome::Unavailable { .. } => None,
        }
    }
}

/// Joins and leaves for one run relative to the previously stored roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub new_followers: Vec<FollowerRecord>,
    pub unfollowers: Vec<FollowerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerSection {
    pub count: u64,
    pub list: Vec<FollowerRecord>,
}

/// One run's complete observation. Never modified after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub profile: Profile,
    pub followers: FollowerSection,
    pub changes: ChangeSet,
    pub traffic: Option<TrafficSummary>,
}

/// Summary metrics derived from the whole retained history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub current_followers: u64,
    pub total_new_followers: u64,
    pub total_unfollowers: u64,
    pub growth_7d: i64,
    pub growth_30d: i64,
    pub max_followers: u64,
    pub min_followers: u64,
    pub avg_followers: u64,
    pub last_updated: DateTime<Utc>,
    pub monitoring_since: DateTime<Utc>,
}
