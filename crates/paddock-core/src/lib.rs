//! Paddock Core Library
//!
//! This crate provides the domain models, error types, limit policy, and image
//! validation shared across all Paddock components.

pub mod config;
pub mod error;
pub mod limits;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::MediaConfig;
pub use error::{LogLevel, MediaError};
pub use limits::{LimitPolicy, LimitSource, StaticLimits};
pub use models::{AssetKind, GalleryAsset, GallerySort, LimitsSummary, NewGalleryAsset};
pub use validation::validate_image;
