//! Lenient readers for previously persisted artifacts.
//!
//! A blob that is missing, unreadable or malformed is treated as absent so
//! the run proceeds as a bootstrap run instead of failing.

use serde_json::Value;

use followscope_core::{FollowerRecord, Snapshot};
use followscope_store::{BlobKey, BlobStore};

fn read<S: BlobStore>(store: &S, key: BlobKey) -> Option<Vec<u8>> {
    match store.get(key) {
        Ok(Some(bytes)) => Some(bytes),
        Ok(None) => {
            tracing::debug!(%key, "no stored blob");
            None
        }
        Err(e) => {
            tracing::warn!(%key, error = %e, "stored blob unreadable, treating as absent");
            None
        }
    }
}

/// The stored follower roster, or `None` if there is no usable one.
pub(crate) fn previous_followers<S: BlobStore>(store: &S) -> Option<Vec<FollowerRecord>> {
    let bytes = read(store, BlobKey::Followers)?;
    match serde_json::from_slice(&bytes) {
        Ok(roster) => Some(roster),
        Err(e) => {
            tracing::warn!(
                key = %BlobKey::Followers,
                error = %e,
                "stored follower roster is malformed, treating as absent"
            );
            None
        }
    }
}

/// The stored history, newest first. Entries that do not decode are dropped
/// individually; a blob that is not a JSON array yields an empty history.
pub(crate) fn stored_history<S: BlobStore>(store: &S) -> Vec<Snapshot> {
    let Some(bytes) = read(store, BlobKey::History) else {
        return Vec::new();
    };
    let entries = match serde_json::from_slice::<Vec<Value>>(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                key = %BlobKey::History,
                error = %e,
                "stored history is malformed, starting a new one"
            );
            return Vec::new();
        }
    };

    let total = entries.len();
    let history: Vec<Snapshot> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if history.len() < total {
        tracing::warn!(
            dropped = total - history.len(),
            kept = history.len(),
            "dropped malformed history entries"
        );
    }
    history
}
