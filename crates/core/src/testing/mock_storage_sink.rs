//! Mock storage sink for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{StorageError, StorageSink};

/// Mock implementation of the StorageSink trait.
///
/// Provides controllable behavior for testing:
/// - In-memory file map, optionally pre-seeded with "already downloaded"
///   names to exercise the skip path
/// - Injectable save failures
/// - Recorded save calls for assertions
pub struct MockStorageSink {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    save_calls: Arc<RwLock<Vec<String>>>,
    fail_saves: Arc<RwLock<bool>>,
}

impl Default for MockStorageSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorageSink {
    /// Create a new empty mock sink.
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            save_calls: Arc::new(RwLock::new(Vec::new())),
            fail_saves: Arc::new(RwLock::new(false)),
        }
    }

    /// Pre-seed a name as already downloaded.
    pub async fn seed_existing(&self, name: &str) {
        self.files
            .write()
            .await
            .insert(name.to_string(), b"seeded".to_vec());
    }

    /// Make every subsequent save fail.
    pub async fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.write().await = fail;
    }

    /// Names passed to `save`, in call order, failed saves included.
    pub async fn save_calls(&self) -> Vec<String> {
        self.save_calls.read().await.clone()
    }

    /// Number of files currently held.
    pub async fn file_count(&self) -> usize {
        self.files.read().await.len()
    }

    /// Stored content for a name, if present.
    pub async fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(name).cloned()
    }
}

#[async_trait]
impl StorageSink for MockStorageSink {
    fn name(&self) -> &str {
        "mock"
    }

    async fn exists(&self, name: &str) -> bool {
        self.files.read().await.contains_key(name)
    }

    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.save_calls.write().await.push(name.to_string());

        if *self.fail_saves.read().await {
            return Err(StorageError::WriteFailed {
                name: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected save failure"),
            });
        }

        self.files
            .write()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}
