//! Collaborator traits for gallery persistence and the owning entity.

use async_trait::async_trait;
use paddock_core::{GalleryAsset, GallerySort, MediaError, NewGalleryAsset};
use uuid::Uuid;

/// Authoritative record of the gallery assets belonging to each entity.
///
/// The ledger exclusively owns the set of `GalleryAsset` records for an
/// entity; the asset store owns the bytes each `storage_path` resolves to.
/// Implementations must serialize their own mutations.
#[async_trait]
pub trait GalleryLedger: Send + Sync {
    /// Current number of recorded assets for the entity.
    async fn count(&self, entity_id: Uuid) -> Result<u32, MediaError>;

    /// Persist a new asset, assigning `id` and `created_at`.
    async fn insert(&self, asset: NewGalleryAsset) -> Result<GalleryAsset, MediaError>;

    /// Persist a new asset only if the entity currently holds fewer than
    /// `max_assets` records. The count check and the insert happen under the
    /// ledger's own serialization, so concurrent uploads cannot push an
    /// entity past the cap.
    async fn insert_guarded(
        &self,
        asset: NewGalleryAsset,
        max_assets: u32,
    ) -> Result<GalleryAsset, MediaError>;

    /// Fetch one asset by id.
    async fn get(&self, id: Uuid) -> Result<Option<GalleryAsset>, MediaError>;

    /// List an entity's assets in the requested order.
    ///
    /// For `CapturedOn`, assets without a capture date sort after all dated
    /// assets, ordered among themselves by `created_at` (stable secondary
    /// key). Ties on the primary key break by `created_at`, then insertion
    /// order.
    async fn list(
        &self,
        entity_id: Uuid,
        sort: GallerySort,
        ascending: bool,
    ) -> Result<Vec<GalleryAsset>, MediaError>;

    /// Remove one asset record. Fails with `AssetNotFound` if absent.
    async fn remove(&self, id: Uuid) -> Result<(), MediaError>;

    /// The entity's asset with the greatest `created_at`, if any.
    async fn latest(&self, entity_id: Uuid) -> Result<Option<GalleryAsset>, MediaError>;
}

/// Narrow view of the owning entity record: existence and the display-image
/// field. The field is set explicitly by profile operations, never implicitly
/// by gallery uploads.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn exists(&self, entity_id: Uuid) -> Result<bool, MediaError>;

    /// The entity's display-image storage path, if one has been set.
    async fn display_image(&self, entity_id: Uuid) -> Result<Option<String>, MediaError>;

    async fn set_display_image(&self, entity_id: Uuid, path: String) -> Result<(), MediaError>;
}
