//! Bounded, newest-first snapshot history.

use followscope_core::Snapshot;

pub use followscope_core::DEFAULT_HISTORY_LIMIT;

/// Prepends `snapshot` and drops the oldest entries beyond `max_len`.
///
/// Takes `history` by value; the caller's sequence is consumed and the
/// returned one replaces it. Appending the same snapshot twice records it
/// twice.
#[must_use]
pub fn append(mut history: Vec<Snapshot>, snapshot: Snapshot, max_len: usize) -> Vec<Snapshot> {
    if let Some(head) = history.first() {
        if snapshot.timestamp < head.timestamp {
            tracing::warn!(
                snapshot = %snapshot.timestamp,
                head = %head.timestamp,
                "snapshot is older than the newest history entry"
            );
        }
    }
    history.insert(0, snapshot);
    history.truncate(max_len);
    history
}
