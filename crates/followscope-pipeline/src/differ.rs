//! Roster comparison by follower id.

use std::collections::HashSet;

use followscope_core::{ChangeSet, FollowerRecord};

/// Classifies followers as joined or left relative to `previous`.
///
/// `new_followers` keeps the order of `current`, `unfollowers` the order of
/// `previous`. A missing previous roster is treated as empty, so a bootstrap
/// run reports every current follower as new.
#[must_use]
pub fn diff(current: &[FollowerRecord], previous: Option<&[FollowerRecord]>) -> ChangeSet {
    let previous = previous.unwrap_or_default();

    let current_ids: HashSet<u64> = current.iter().map(|f| f.id).collect();
    let previous_ids: HashSet<u64> = previous.iter().map(|f| f.id).collect();

    let new_followers = current
        .iter()
        .filter(|f| !previous_ids.contains(&f.id))
        .cloned()
        .collect();
    let unfollowers = previous
        .iter()
        .filter(|f| !current_ids.contains(&f.id))
        .cloned()
        .collect();

    ChangeSet {
        new_followers,
        unfollowers,
    }
}
