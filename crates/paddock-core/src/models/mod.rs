//! Domain models

pub mod asset;

pub use asset::{AssetKind, GalleryAsset, GallerySort, LimitsSummary, NewGalleryAsset};
