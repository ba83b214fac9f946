use std::fmt;

use followscope_store::{BlobKey, StoreError};
use thiserror::Error;

/// The fetch step that failed a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Profile,
    Followers,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Profile => "profile",
            Stage::Followers => "followers",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot aggregate stats over an empty history")]
    EmptyHistory,
}

/// Errors that abort a run. Nothing is written once one of these occurs
/// before the persist step.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch {stage}: {source}")]
    Fetch {
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode {key} blob: {source}")]
    Encode {
        key: BlobKey,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl PipelineError {
    pub(crate) fn fetch<E>(stage: Stage, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch {
            stage,
            source: Box::new(source),
        }
    }

    /// The failed fetch stage, if this is a fetch error.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Fetch { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
