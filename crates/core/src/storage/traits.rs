//! Trait definitions for the storage module.

use async_trait::async_trait;
use thiserror::Error;

/// A sink that can persist downloaded files and check for prior downloads.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Returns the name of this sink implementation.
    fn name(&self) -> &str;

    /// Whether a file with this name was already persisted.
    ///
    /// Presence only; content is never verified.
    async fn exists(&self, name: &str) -> bool;

    /// Persist the full body under the given name.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Errors that can occur while persisting a file.
///
/// Save failures are soft: the run counts them and moves on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create storage directory {path}: {source}")]
    DirectoryCreationFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {name}: {source}")]
    WriteFailed {
        name: String,
        source: std::io::Error,
    },
}
