//! Summary metrics over the retained history.
//!
//! Growth over a window compares the newest and oldest snapshots that fall
//! inside that window, so the baseline moves with the sampling cadence.
//! `monitoring_since` likewise tracks the oldest *retained* entry and drifts
//! forward once the history bound is reached. The dashboard reads both as
//! they are.

use chrono::{DateTime, Duration, Utc};

use followscope_core::{Snapshot, Stats};

use crate::error::StatsError;

/// Aggregates `history` (newest first) into [`Stats`].
///
/// # Errors
///
/// Returns [`StatsError::EmptyHistory`] if `history` is empty.
pub fn aggregate(history: &[Snapshot], now: DateTime<Utc>) -> Result<Stats, StatsError> {
    let (Some(latest), Some(oldest)) = (history.first(), history.last()) else {
        return Err(StatsError::EmptyHistory);
    };

    let counts: Vec<u64> = history.iter().map(|s| s.followers.count).collect();
    let max_followers = counts.iter().copied().max().unwrap_or_default();
    let min_followers = counts.iter().copied().min().unwrap_or_default();

    let total_new_followers = history
        .iter()
        .map(|s| s.changes.new_followers.len() as u64)
        .sum();
    let total_unfollowers = history
        .iter()
        .map(|s| s.changes.unfollowers.len() as u64)
        .sum();

    Ok(Stats {
        current_followers: latest.followers.count,
        total_new_followers,
        total_unfollowers,
        growth_7d: window_growth(history, now - Duration::days(7)),
        growth_30d: window_growth(history, now - Duration::days(30)),
        max_followers,
        min_followers,
        avg_followers: rounded_mean(&counts),
        last_updated: latest.timestamp,
        monitoring_since: oldest.timestamp,
    })
}

/// Newest minus oldest follower count among entries newer than `since`.
/// Zero unless at least two entries fall in the window.
fn window_growth(history: &[Snapshot], since: DateTime<Utc>) -> i64 {
    let mut window = history.iter().filter(|s| s.timestamp > since);
    let Some(newest) = window.next() else {
        return 0;
    };
    match window.last() {
        Some(oldest) => signed(newest.followers.count) - signed(oldest.followers.count),
        None => 0,
    }
}

fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Integer mean, rounding halves up.
fn rounded_mean(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let n = values.len() as u128;
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    u64::try_from((sum + n / 2) / n).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
