//! Shared data model and configuration for followscope.
//!
//! Every other crate in the workspace depends on the types defined here:
//! the persisted snapshot shapes, the upstream payloads a [`Fetcher`]
//! produces, and the environment-driven [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod fetcher;
pub mod types;

pub use app_config::{AppConfig, DEFAULT_HISTORY_LIMIT};
pub use config::{load_app_config, load_app_config_from_env};
pub use fetcher::Fetcher;
pub use types::{
    ChangeSet, FollowerPayload, FollowerRecord, FollowerSection, Profile, ProfilePayload,
    RepositorySummary, Snapshot, Stats, TrafficCounts, TrafficOutcome, TrafficSummary,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
