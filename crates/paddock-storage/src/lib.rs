//! Paddock Storage Library
//!
//! This crate provides the asset store abstraction and the local filesystem
//! backend, plus storage-path allocation.
//!
//! # Storage path format
//!
//! Paths are entity-scoped and relative to the configured media root:
//!
//! - **Profile image**: `{entity_id}/profile/{token}.{ext}` (at most one live
//!   file at a time)
//! - **Gallery asset**: `{entity_id}/gallery/{token}.{ext}` (zero or more)
//!
//! `{token}` is 32 lowercase hex characters from 128 bits of entropy, so path
//! uniqueness needs no filesystem locking. Paths must not contain `..` or a
//! leading `/`. Path generation is centralized in the `paths` module so every
//! backend stays consistent.

pub mod local;
pub mod paths;
pub mod traits;

// Re-export commonly used types
pub use local::LocalAssetStore;
pub use paths::allocate_asset_path;
pub use traits::{AssetStore, StorageError, StorageResult};
