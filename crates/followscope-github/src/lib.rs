//! GitHub REST implementation of the followscope [`Fetcher`].
//!
//! [`GitHubClient`] fetches the monitored account's profile, drains the
//! paginated follower listing, and gathers repository traffic counters.
//! Transient failures are retried with jittered exponential back-off; traffic
//! failures degrade to [`TrafficOutcome::Unavailable`] instead of erroring.
//!
//! [`Fetcher`]: followscope_core::Fetcher
//! [`TrafficOutcome::Unavailable`]: followscope_core::TrafficOutcome::Unavailable

pub mod client;
pub mod error;
pub mod types;

mod fetcher;
mod followers;
mod retry;
mod traffic;

pub use client::{GitHubClient, GitHubSettings};
pub use error::GitHubError;
pub use followers::MAX_PAGES;
