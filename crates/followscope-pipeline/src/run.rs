//! Run orchestration: fetch, diff, record and persist.

use chrono::{DateTime, Utc};
use serde::Serialize;

use followscope_core::{Fetcher, Stats, TrafficOutcome, DEFAULT_HISTORY_LIMIT};
use followscope_store::{BlobKey, BlobStore};

use crate::differ::diff;
use crate::error::{PipelineError, Stage};
use crate::history::append;
use crate::load::{previous_followers, stored_history};
use crate::snapshot::{build_snapshot, observe_followers};
use crate::stats::aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum number of snapshots retained in history. Values below 1 are
    /// treated as 1 so the run's own snapshot is always kept.
    pub history_limit: usize,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            dry_run: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub follower_count: u64,
    pub new_followers: usize,
    pub unfollowers: usize,
    pub traffic_available: bool,
    pub stats: Stats,
}

/// Performs one monitoring run at time `now`.
///
/// 1. Fetches profile, followers and traffic concurrently.
/// 2. Loads the previous roster and history; unusable blobs count as absent.
/// 3. Diffs the rosters, builds the snapshot, appends it to history and
///    re-aggregates stats.
/// 4. Serializes all four artifacts, then writes `followers`, `history`,
///    `latest` and `stats` in that order (skipped when `dry_run` is set).
///
/// Overlapping runs against the same store are not guarded against; the
/// last writer wins.
///
/// # Errors
///
/// - [`PipelineError::Fetch`] if the profile or follower fetch fails. Nothing
///   is written in that case.
/// - [`PipelineError::Encode`] if an artifact cannot be serialized. Nothing is
///   written in that case either.
/// - [`PipelineError::Store`] if a write fails. Artifacts written before the
///   failing one are left in place.
pub async fn run_once<F, S>(
    fetcher: &F,
    store: &S,
    options: &RunOptions,
    now: DateTime<Utc>,
) -> Result<RunReport, PipelineError>
where
    F: Fetcher,
    S: BlobStore,
{
    let (profile, followers, traffic) = futures::join!(
        fetcher.fetch_profile(),
        fetcher.fetch_followers(),
        fetcher.fetch_traffic(),
    );
    let profile = profile.map_err(|e| PipelineError::fetch(Stage::Profile, e))?;
    let followers = followers.map_err(|e| PipelineError::fetch(Stage::Followers, e))?;
    if let TrafficOutcome::Unavailable { reason } = &traffic {
        tracing::info!(%reason, "recording run without traffic");
    }
    let traffic = traffic.into_summary();

    let current = observe_followers(followers, now);
    let previous = previous_followers(store);
    if previous.is_none() {
        tracing::info!("no previous follower roster, treating run as bootstrap");
    }
    let changes = diff(&current, previous.as_deref());

    let snapshot = build_snapshot(&profile, current, changes, traffic, now);
    let history = append(
        stored_history(store),
        snapshot,
        options.history_limit.max(1),
    );
    let stats = aggregate(&history, now)?;

    let latest = &history[0];
    let report = RunReport {
        timestamp: now,
        follower_count: latest.followers.count,
        new_followers: latest.changes.new_followers.len(),
        unfollowers: latest.changes.unfollowers.len(),
        traffic_available: latest.traffic.is_some(),
        stats: stats.clone(),
    };

    let artifacts = [
        (BlobKey::Followers, encode(BlobKey::Followers, &latest.followers.list)?),
        (BlobKey::History, encode(BlobKey::History, &history)?),
        (BlobKey::Latest, encode(BlobKey::Latest, latest)?),
        (BlobKey::Stats, encode(BlobKey::Stats, &stats)?),
    ];

    if options.dry_run {
        tracing::info!("dry run, skipping writes");
    } else {
        persist(store, &artifacts)?;
    }

    tracing::info!(
        login = %latest.profile.login,
        followers = report.follower_count,
        new_followers = report.new_followers,
        unfollowers = report.unfollowers,
        traffic = report.traffic_available,
        history_len = history.len(),
        "run complete"
    );
    Ok(report)
}

/// Re-aggregates stats from the stored history without fetching anything.
/// Writes the `stats` blob when `write` is set.
///
/// # Errors
///
/// - [`PipelineError::Stats`] if there is no usable stored history.
/// - [`PipelineError::Store`] if the write fails.
pub fn recompute_stats<S: BlobStore>(
    store: &S,
    now: DateTime<Utc>,
    write: bool,
) -> Result<Stats, PipelineError> {
    let history = stored_history(store);
    let stats = aggregate(&history, now)?;
    if write {
        let bytes = encode(BlobKey::Stats, &stats)?;
        persist(store, &[(BlobKey::Stats, bytes)])?;
    }
    tracing::info!(
        entries = history.len(),
        current_followers = stats.current_followers,
        "recomputed stats"
    );
    Ok(stats)
}

fn encode<T: Serialize + ?Sized>(key: BlobKey, value: &T) -> Result<Vec<u8>, PipelineError> {
    serde_json::to_vec_pretty(value).map_err(|source| PipelineError::Encode { key, source })
}

fn persist<S: BlobStore>(store: &S, artifacts: &[(BlobKey, Vec<u8>)]) -> Result<(), PipelineError> {
    for (key, bytes) in artifacts {
        store.put(*key, bytes)?;
        tracing::debug!(%key, bytes = bytes.len(), "wrote blob");
    }
    Ok(())
}
