use crate::traits::{AssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem asset store
#[derive(Clone)]
pub struct LocalAssetStore {
    base_path: PathBuf,
}

impl LocalAssetStore {
    /// Create a new LocalAssetStore rooted at the given media root.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for asset storage (e.g., "/var/lib/paddock/media")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAssetStore { base_path })
    }

    /// Convert a storage path to a filesystem path with security validation.
    ///
    /// Rejects storage paths containing traversal sequences that could escape
    /// the media root.
    fn resolve(&self, storage_path: &str) -> StorageResult<PathBuf> {
        if storage_path.is_empty()
            || storage_path.contains("..")
            || storage_path.starts_with('/')
        {
            return Err(StorageError::InvalidPath(
                "Storage path contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_path);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidPath(
                    "Storage path resolves outside media root".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn write(&self, storage_path: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resolve(storage_path)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            storage_path = %storage_path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local asset write successful"
        );

        Ok(())
    }

    async fn delete(&self, storage_path: &str) -> StorageResult<()> {
        let path = self.resolve(storage_path)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            storage_path = %storage_path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local asset delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let path = self.resolve(storage_path)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
