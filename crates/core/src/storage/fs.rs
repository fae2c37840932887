//! File system sink implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::traits::{StorageError, StorageSink};

/// File system based sink rooted at `<root>/<album_id>`.
pub struct FsStorageSink {
    dir: PathBuf,
}

impl FsStorageSink {
    /// Create the destination directory (both levels) and return a sink
    /// rooted there. Called once before any download starts.
    pub async fn create(root: &Path, album_id: &str) -> Result<Self, StorageError> {
        let dir = root.join(album_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::DirectoryCreationFailed {
                path: dir.display().to_string(),
                source: e,
            })?;
        Ok(Self { dir })
    }

    /// The directory files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl StorageSink for FsStorageSink {
    fn name(&self) -> &str {
        "fs"
    }

    async fn exists(&self, name: &str) -> bool {
        fs::metadata(self.dir.join(name)).await.is_ok()
    }

    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(self.dir.join(name), bytes)
            .await
            .map_err(|e| StorageError::WriteFailed {
                name: name.to_string(),
                source: e,
            })
    }
}
