use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an upload lands in an entity's gallery or replaces its profile
/// image. Storage-path layout is a total function of this tag; it is never
/// inferred from call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Profile,
    Gallery,
}

/// Sort key for gallery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GallerySort {
    CreatedAt,
    CapturedOn,
}

/// One stored gallery image belonging to one entity.
///
/// `storage_path` is relative to the media root and immutable for the asset's
/// lifetime; assets are never moved, only deleted and re-created. Uniqueness
/// comes from the random token in the path, not from a constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryAsset {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub storage_path: String,
    pub captured_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub byte_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for a ledger insert. The ledger assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewGalleryAsset {
    pub entity_id: Uuid,
    pub storage_path: String,
    pub captured_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub byte_size: i64,
}

/// Snapshot of the current limits and usage for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSummary {
    pub max_assets: u32,
    pub max_bytes_per_asset: usize,
    pub current_count: u32,
    pub remaining_count: u32,
}
