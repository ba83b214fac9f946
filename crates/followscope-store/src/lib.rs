//! Key-value blob storage for the four artifacts a run produces.
//!
//! The pipeline never touches the filesystem directly; it reads and writes
//! opaque JSON bytes through [`BlobStore`]. [`FileStore`] is the production
//! backend and [`MemoryStore`] backs tests. Dry runs read from the
//! [`FileStore`] and skip every `put`.

pub mod error;
pub mod file;
pub mod key;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use key::BlobKey;
pub use memory::MemoryStore;

/// Get/put access to named JSON blobs.
pub trait BlobStore {
    /// Returns `Ok(None)` when nothing has been stored under `key` yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the blob exists but cannot be read.
    fn get(&self, key: BlobKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the blob cannot be written.
    fn put(&self, key: BlobKey, bytes: &[u8]) -> Result<(), StoreError>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn get(&self, key: BlobKey) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: BlobKey, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, bytes)
    }
}
