//! Ingestion orchestrator.
//!
//! One upload moves through admission, validation, storage, and recording, in
//! that order. A write is never attempted before validation passes, and a
//! ledger record is never created before the bytes it references are durably
//! stored; an abort at any gate leaves no partial ledger state. Bytes written
//! for an upload that fails at the recording gate are discarded best-effort
//! (orphaned bytes are acceptable garbage, an orphaned ledger record is not).

use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use paddock_core::{
    validate_image, AssetKind, GalleryAsset, GallerySort, LimitPolicy, LimitSource, LimitsSummary,
    MediaConfig, MediaError, NewGalleryAsset,
};
use paddock_ledger::{EntityStore, GalleryLedger};
use paddock_storage::{allocate_asset_path, AssetStore, StorageError};
use uuid::Uuid;

/// Top-level media operations for entity galleries and profile images.
#[derive(Clone)]
pub struct MediaService {
    ledger: Arc<dyn GalleryLedger>,
    entities: Arc<dyn EntityStore>,
    store: Arc<dyn AssetStore>,
    limits: Arc<dyn LimitSource>,
    pub(crate) media_url_prefix: String,
    pub(crate) placeholder_path: String,
}

impl MediaService {
    pub fn new(
        ledger: Arc<dyn GalleryLedger>,
        entities: Arc<dyn EntityStore>,
        store: Arc<dyn AssetStore>,
        limits: Arc<dyn LimitSource>,
        config: &MediaConfig,
    ) -> Self {
        Self {
            ledger,
            entities,
            store,
            limits,
            media_url_prefix: config.media_url_prefix.trim_end_matches('/').to_string(),
            placeholder_path: config.placeholder_path.clone(),
        }
    }

    pub(crate) fn ledger(&self) -> &dyn GalleryLedger {
        self.ledger.as_ref()
    }

    pub(crate) fn entities(&self) -> &dyn EntityStore {
        self.entities.as_ref()
    }

    /// Public URL path for a storage path.
    pub(crate) fn public_path(&self, storage_path: &str) -> String {
        format!("{}/{}", self.media_url_prefix, storage_path)
    }

    /// Upload one image into an entity's gallery.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn ingest_gallery(
        &self,
        entity_id: Uuid,
        data: Bytes,
        content_type: &str,
        filename: &str,
        captured_on: Option<NaiveDate>,
        description: Option<String>,
    ) -> Result<GalleryAsset, MediaError> {
        // Fresh policy snapshot per call; the configuration may change
        // between requests.
        let policy = self.limits.current();

        if !self.entities.exists(entity_id).await? {
            return Err(MediaError::EntityNotFound(entity_id));
        }
        let current = self.ledger.count(entity_id).await?;
        if current >= policy.max_assets_per_entity {
            return Err(MediaError::LimitExceeded {
                max: policy.max_assets_per_entity,
                current,
            });
        }

        let (width, height) = self.validate_payload(&data, content_type, &policy).await?;

        let storage_path = allocate_asset_path(entity_id, AssetKind::Gallery, filename);
        self.store
            .write(&storage_path, &data)
            .await
            .map_err(write_error)?;

        // The guarded insert re-checks the cap under the ledger's own
        // serialization; the count check above is only a cheap early reject.
        let inserted = self
            .ledger
            .insert_guarded(
                NewGalleryAsset {
                    entity_id,
                    storage_path: storage_path.clone(),
                    captured_on,
                    description,
                    byte_size: data.len() as i64,
                },
                policy.max_assets_per_entity,
            )
            .await;

        match inserted {
            Ok(asset) => {
                tracing::info!(
                    entity_id = %entity_id,
                    asset_id = %asset.id,
                    storage_path = %asset.storage_path,
                    width,
                    height,
                    "Gallery asset ingested"
                );
                Ok(asset)
            }
            Err(e) => {
                // A concurrent upload won the last slot after our bytes were
                // written. The record never existed, so the bytes are plain
                // garbage; drop them best-effort.
                self.discard_bytes(&storage_path, "gallery insert rejected")
                    .await;
                Err(e)
            }
        }
    }

    /// Upload a new profile image for an entity, superseding any previous one.
    ///
    /// Profile images are never duplicated into the gallery ledger. The
    /// previous profile file's bytes are deleted only after the new image is
    /// live, and only best-effort.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn ingest_profile(
        &self,
        entity_id: Uuid,
        data: Bytes,
        content_type: &str,
        filename: &str,
    ) -> Result<String, MediaError> {
        let policy = self.limits.current();

        if !self.entities.exists(entity_id).await? {
            return Err(MediaError::EntityNotFound(entity_id));
        }

        self.validate_payload(&data, content_type, &policy).await?;

        // Captured before the field changes so the superseded file can be
        // dropped after the replacement is live.
        let prior = self.entities.display_image(entity_id).await?;

        let storage_path = allocate_asset_path(entity_id, AssetKind::Profile, filename);
        self.store
            .write(&storage_path, &data)
            .await
            .map_err(write_error)?;

        self.entities
            .set_display_image(entity_id, storage_path.clone())
            .await?;

        tracing::info!(
            entity_id = %entity_id,
            storage_path = %storage_path,
            "Profile image ingested"
        );

        if let Some(prior_path) = prior {
            // A promoted gallery asset may also be the display image; its
            // bytes belong to the ledger and must survive. Only dedicated
            // profile files are superseded.
            if prior_path.starts_with(&format!("{entity_id}/profile/")) {
                self.discard_bytes(&prior_path, "superseded profile image")
                    .await;
            }
        }

        Ok(self.public_path(&storage_path))
    }

    /// Designate an existing gallery asset as the entity's profile image.
    ///
    /// No file copy and no ledger mutation: the asset stays owned by the
    /// gallery ledger and is reachable from both places.
    pub async fn promote_to_profile(
        &self,
        entity_id: Uuid,
        asset_id: Uuid,
    ) -> Result<String, MediaError> {
        if !self.entities.exists(entity_id).await? {
            return Err(MediaError::EntityNotFound(entity_id));
        }

        let asset = self
            .ledger
            .get(asset_id)
            .await?
            .filter(|a| a.entity_id == entity_id)
            .ok_or(MediaError::AssetNotFound(asset_id))?;

        self.entities
            .set_display_image(entity_id, asset.storage_path.clone())
            .await?;

        tracing::info!(
            entity_id = %entity_id,
            asset_id = %asset_id,
            storage_path = %asset.storage_path,
            "Gallery asset promoted to profile image"
        );

        Ok(self.public_path(&asset.storage_path))
    }

    /// List an entity's gallery in the requested order.
    pub async fn list_gallery(
        &self,
        entity_id: Uuid,
        sort: GallerySort,
        ascending: bool,
    ) -> Result<Vec<GalleryAsset>, MediaError> {
        self.ledger.list(entity_id, sort, ascending).await
    }

    /// Delete one gallery asset: bytes first, record second.
    ///
    /// A byte-delete failure is logged and never blocks the record removal; a
    /// missing file with no ledger record beats an orphaned record pointing
    /// at one.
    pub async fn delete_asset(&self, asset_id: Uuid) -> Result<(), MediaError> {
        let asset = self
            .ledger
            .get(asset_id)
            .await?
            .ok_or(MediaError::AssetNotFound(asset_id))?;

        self.discard_bytes(&asset.storage_path, "asset deletion").await;

        self.ledger.remove(asset_id).await?;

        tracing::info!(
            entity_id = %asset.entity_id,
            asset_id = %asset_id,
            storage_path = %asset.storage_path,
            "Gallery asset deleted"
        );

        Ok(())
    }

    /// Current limits and usage for one entity.
    pub async fn limits_summary(&self, entity_id: Uuid) -> Result<LimitsSummary, MediaError> {
        if !self.entities.exists(entity_id).await? {
            return Err(MediaError::EntityNotFound(entity_id));
        }

        let policy = self.limits.current();
        let current_count = self.ledger.count(entity_id).await?;

        Ok(LimitsSummary {
            max_assets: policy.max_assets_per_entity,
            max_bytes_per_asset: policy.max_bytes_per_asset,
            current_count,
            remaining_count: policy.max_assets_per_entity.saturating_sub(current_count),
        })
    }

    /// Decode and check the payload off the async pool; decode is CPU-bound.
    async fn validate_payload(
        &self,
        data: &Bytes,
        content_type: &str,
        policy: &LimitPolicy,
    ) -> Result<(u32, u32), MediaError> {
        let data = data.clone();
        let content_type = content_type.to_string();
        let policy = policy.clone();
        tokio::task::spawn_blocking(move || validate_image(&data, &content_type, &policy))
            .await
            .map_err(|e| MediaError::Internal(format!("validation task failed: {e}")))?
    }

    /// Fire-and-forget byte deletion. Failures are logged, never surfaced;
    /// both call sites have already committed their primary outcome.
    pub(crate) async fn discard_bytes(&self, storage_path: &str, context: &'static str) {
        if let Err(e) = self.store.delete(storage_path).await {
            tracing::warn!(
                storage_path = %storage_path,
                error = %e,
                context,
                "Best-effort byte delete failed"
            );
        }
    }
}

fn write_error(e: StorageError) -> MediaError {
    MediaError::StorageWrite(e.to_string())
}
