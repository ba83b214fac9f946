//! Directory-backed store: one `<key>.json` file per blob.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::key::BlobKey;
use crate::BlobStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: BlobKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: BlobKey) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(%key, path = %path.display(), bytes = bytes.len(), "read blob");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(%key, path = %path.display(), "blob not present");
                Ok(None)
            }
            Err(source) => Err(StoreError::Io { key, path, source }),
        }
    }

    /// Writes to a sibling temp file and renames it into place, so a
    /// concurrent reader sees either the old blob or the new one.
    fn put(&self, key: BlobKey, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { key, path, source }
        };

        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let tmp_path = self.dir.join(format!(".{}.tmp", key.file_name()));
        {
            let mut file = fs::File::create(&tmp_path).map_err(io_err(&tmp_path))?;
            file.write_all(bytes).map_err(io_err(&tmp_path))?;
            file.sync_all().map_err(io_err(&tmp_path))?;
        }
        fs::rename(&tmp_path, &path).map_err(io_err(&path))?;

        tracing::debug!(%key, path = %path.display(), bytes = bytes.len(), "wrote blob");
        Ok(())
    }
}
