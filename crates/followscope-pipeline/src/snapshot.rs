//! Assembles one run's [`Snapshot`] from fetched data.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use followscope_core::{
    ChangeSet, FollowerPayload, FollowerRecord, FollowerSection, Profile, ProfilePayload,
    Snapshot, TrafficSummary,
};

/// Stamps every fetched follower with the run timestamp.
///
/// Page-numbered listings can repeat an account when the roster shifts
/// between page requests; only the first occurrence of each id is kept.
#[must_use]
pub fn observe_followers(payloads: Vec<FollowerPayload>, now: DateTime<Utc>) -> Vec<FollowerRecord> {
    let fetched = payloads.len();
    let mut seen = HashSet::with_capacity(fetched);
    let followers: Vec<FollowerRecord> = payloads
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .map(|p| p.observe(now))
        .collect();

    let dropped = fetched - followers.len();
    if dropped > 0 {
        tracing::warn!(dropped, "dropped duplicate follower ids");
    }
    followers
}

/// Copies the persisted subset of the upstream profile.
fn profile_subset(payload: &ProfilePayload) -> Profile {
    Profile {
        login: payload.login.clone(),
        name: payload.name.clone(),
        bio: payload.bio.clone(),
        public_repos: payload.public_repos,
        followers_count: payload.followers,
        following_count: payload.following,
        created_at: payload.created_at,
        avatar_url: payload.avatar_url.clone(),
    }
}

/// Builds the snapshot for a run.
///
/// Only the documented profile fields are copied; anything the upstream
/// returned in [`ProfilePayload::extra`] is dropped. `followers.count` is
/// always the length of `followers`, never the upstream profile counter.
#[must_use]
pub fn build_snapshot(
    profile: &ProfilePayload,
    followers: Vec<FollowerRecord>,
    changes: ChangeSet,
    traffic: Option<TrafficSummary>,
    now: DateTime<Utc>,
) -> Snapshot {
    Snapshot {
        timestamp: now,
        profile: profile_subset(profile),
        followers: FollowerSection {
            count: followers.len() as u64,
            list: followers,
        },
        changes,
        traffic,
    }
}
