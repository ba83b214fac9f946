use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;
use crate::key::BlobKey;
use crate::BlobStore;

/// In-process store for tests. Nothing is ever written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<BlobKey, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panicked writer cannot leave a half-inserted Vec behind, so the map
    // is still consistent after poisoning.
    fn lock(&self) -> MutexGuard<'_, HashMap<BlobKey, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: BlobKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().get(&key).cloned())
    }

    fn put(&self, key: BlobKey, bytes: &[u8]) -> Result<(), StoreError> {
        self.lock().insert(key, bytes.to_vec());
        Ok(())
    }
}
