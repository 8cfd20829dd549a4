//! Error types module
//!
//! All errors raised by the media subsystem are unified under the `MediaError`
//! enum. Validation failures carry the limit values and offending measurements
//! so the boundary layer can render a precise message without re-deriving
//! anything.

use uuid::Uuid;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Entity not found: {0}")]
    EntityNotFound(Uuid),

    #[error("Asset not found: {0}")]
    AssetNotFound(Uuid),

    #[error("Gallery limit exceeded: {current}/{max} assets")]
    LimitExceeded { max: u32, current: u32 },

    #[error("Unsupported format: {content_type} (allowed: {allowed:?})")]
    UnsupportedFormat {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid image: {0}")]
    InvalidImage(#[source] image::ImageError),

    #[error("Image too small: {width}x{height} (min: {min_width}x{min_height})")]
    ImageTooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("Image too large: {width}x{height} (max: {max_width}x{max_height})")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("Storage delete failed: {0}")]
    StorageDelete(String),

    #[error("Invalid limit configuration: {0}")]
    PolicyConfiguration(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn static_metadata(err: &MediaError) -> (u16, &'static str, LogLevel) {
    match err {
        MediaError::EntityNotFound(_) => (404, "ENTITY_NOT_FOUND", LogLevel::Debug),
        MediaError::AssetNotFound(_) => (404, "ASSET_NOT_FOUND", LogLevel::Debug),
        MediaError::LimitExceeded { .. } => (409, "LIMIT_EXCEEDED", LogLevel::Warn),
        MediaError::UnsupportedFormat { .. } => (400, "UNSUPPORTED_FORMAT", LogLevel::Debug),
        MediaError::FileTooLarge { .. } => (413, "FILE_TOO_LARGE", LogLevel::Debug),
        MediaError::InvalidImage(_) => (400, "INVALID_IMAGE", LogLevel::Debug),
        MediaError::ImageTooSmall { .. } => (400, "IMAGE_TOO_SMALL", LogLevel::Debug),
        MediaError::ImageTooLarge { .. } => (400, "IMAGE_TOO_LARGE", LogLevel::Debug),
        MediaError::StorageWrite(_) => (500, "STORAGE_WRITE_ERROR", LogLevel::Error),
        MediaError::StorageDelete(_) => (500, "STORAGE_DELETE_ERROR", LogLevel::Error),
        MediaError::PolicyConfiguration(_) => (500, "POLICY_CONFIGURATION_ERROR", LogLevel::Error),
        MediaError::Ledger(_) => (500, "LEDGER_ERROR", LogLevel::Error),
        MediaError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl MediaError {
    /// HTTP status code the boundary layer should map this error to.
    pub fn http_status_code(&self) -> u16 {
        static_metadata(self).0
    }

    /// Machine-readable error code (e.g. "LIMIT_EXCEEDED").
    pub fn error_code(&self) -> &'static str {
        static_metadata(self).1
    }

    /// Log level for this error.
    pub fn log_level(&self) -> LogLevel {
        static_metadata(self).2
    }

    /// Whether the caller can fix the request and retry (validation-kind errors).
    pub fn is_client_error(&self) -> bool {
        let status = self.http_status_code();
        (400..500).contains(&status)
    }
}
