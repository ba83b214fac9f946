//! Follower monitoring pipeline: diff, snapshot, history and stats.
//!
//! Every step except [`run_once`] and [`recompute_stats`] is a pure function
//! over values with the run's timestamp passed in explicitly. The two entry
//! points sequence those steps against a [`followscope_core::Fetcher`] and a
//! [`followscope_store::BlobStore`].

pub mod differ;
pub mod error;
pub mod history;
mod load;
pub mod run;
pub mod snapshot;
pub mod stats;

pub use differ::diff;
pub use error::{PipelineError, Stage, StatsError};
pub use history::append;
pub use run::{recompute_stats, run_once, RunOptions, RunReport};
pub use snapshot::{build_snapshot, observe_followers};
pub use stats::aggregate;
