use std::path::PathBuf;

use thiserror::Error;

use crate::key::BlobKey;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {key} blob at {path:?}: {source}")]
    Io {
        key: BlobKey,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
