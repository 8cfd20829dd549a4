//! Asset store abstraction trait
//!
//! This module defines the AssetStore trait that all storage backends must
//! implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Asset store abstraction trait
///
/// The orchestrator works against this trait so byte persistence stays
/// decoupled from any particular backend.
///
/// **Path format:** Paths are entity-scoped and relative to the media root:
/// `{entity_id}/profile/{token}.{ext}` or `{entity_id}/gallery/{token}.{ext}`.
/// See the crate root documentation.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist bytes at the given path, creating parent directories as needed.
    ///
    /// Overwrites silently if the path already exists; path allocation makes a
    /// collision negligible, so an existing file is not an error.
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()>;

    /// Delete the bytes at the given path.
    ///
    /// Idempotent: a missing file is Ok. Fails only on an I/O failure distinct
    /// from not-found.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Check whether bytes exist at the given path.
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}
