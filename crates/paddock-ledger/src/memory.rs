//! In-memory reference backend for the ledger and entity store.
//!
//! Used by tests and by embedders running without a database. A single
//! `RwLock` over each map is the in-memory analogue of the durable backend's
//! transaction: `insert_guarded` holds the write lock across its count check
//! and insert, which is what closes the check-then-act race on the per-entity
//! cap.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use paddock_core::{GalleryAsset, GallerySort, MediaError, NewGalleryAsset};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::traits::{EntityStore, GalleryLedger};

struct StoredAsset {
    asset: GalleryAsset,
    /// Insertion sequence, the final tie-break key. `created_at` alone is not
    /// strictly monotonic at clock resolution.
    seq: u64,
}

#[derive(Default)]
struct LedgerInner {
    assets: HashMap<Uuid, StoredAsset>,
    next_seq: u64,
}

/// In-memory gallery ledger.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<RwLock<LedgerInner>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(inner: &mut LedgerInner, new: NewGalleryAsset) -> GalleryAsset {
        let asset = GalleryAsset {
            id: Uuid::new_v4(),
            entity_id: new.entity_id,
            storage_path: new.storage_path,
            captured_on: new.captured_on,
            description: new.description,
            byte_size: new.byte_size,
            created_at: Utc::now(),
        };
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.assets.insert(
            asset.id,
            StoredAsset {
                asset: asset.clone(),
                seq,
            },
        );
        asset
    }
}

#[async_trait]
impl GalleryLedger for MemoryLedger {
    async fn count(&self, entity_id: Uuid) -> Result<u32, MediaError> {
        let inner = self.inner.read().await;
        let count = inner
            .assets
            .values()
            .filter(|s| s.asset.entity_id == entity_id)
            .count();
        Ok(count as u32)
    }

    async fn insert(&self, asset: NewGalleryAsset) -> Result<GalleryAsset, MediaError> {
        let mut inner = self.inner.write().await;
        Ok(Self::store(&mut inner, asset))
    }

    async fn insert_guarded(
        &self,
        asset: NewGalleryAsset,
        max_assets: u32,
    ) -> Result<GalleryAsset, MediaError> {
        let mut inner = self.inner.write().await;
        let current = inner
            .assets
            .values()
            .filter(|s| s.asset.entity_id == asset.entity_id)
            .count() as u32;
        if current >= max_assets {
            return Err(MediaError::LimitExceeded {
                max: max_assets,
                current,
            });
        }
        Ok(Self::store(&mut inner, asset))
    }

    async fn get(&self, id: Uuid) -> Result<Option<GalleryAsset>, MediaError> {
        let inner = self.inner.read().await;
        Ok(inner.assets.get(&id).map(|s| s.asset.clone()))
    }

    async fn list(
        &self,
        entity_id: Uuid,
        sort: GallerySort,
        ascending: bool,
    ) -> Result<Vec<GalleryAsset>, MediaError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<(&StoredAsset, Option<chrono::NaiveDate>)> = inner
            .assets
            .values()
            .filter(|s| s.asset.entity_id == entity_id)
            .map(|s| (s, s.asset.captured_on))
            .collect();

        match sort {
            GallerySort::CreatedAt => {
                rows.sort_by_key(|(s, _)| (s.asset.created_at, s.seq));
                if !ascending {
                    rows.reverse();
                }
            }
            GallerySort::CapturedOn => {
                // Undated assets sort after every dated asset, among
                // themselves in created_at order under the requested
                // direction.
                let (mut dated, mut undated): (Vec<_>, Vec<_>) =
                    rows.into_iter().partition(|(_, captured)| captured.is_some());
                dated.sort_by_key(|(s, captured)| (*captured, s.asset.created_at, s.seq));
                undated.sort_by_key(|(s, _)| (s.asset.created_at, s.seq));
                if !ascending {
                    dated.reverse();
                    undated.reverse();
                }
                dated.extend(undated);
                rows = dated;
            }
        }

        Ok(rows.into_iter().map(|(s, _)| s.asset.clone()).collect())
    }

    async fn remove(&self, id: Uuid) -> Result<(), MediaError> {
        let mut inner = self.inner.write().await;
        inner
            .assets
            .remove(&id)
            .map(|_| ())
            .ok_or(MediaError::AssetNotFound(id))
    }

    async fn latest(&self, entity_id: Uuid) -> Result<Option<GalleryAsset>, MediaError> {
        let inner = self.inner.read().await;
        Ok(inner
            .assets
            .values()
            .filter(|s| s.asset.entity_id == entity_id)
            .max_by_key(|s| (s.asset.created_at, s.seq))
            .map(|s| s.asset.clone()))
    }
}

#[derive(Default)]
struct EntityRecord {
    display_image: Option<String>,
}

/// In-memory entity store.
#[derive(Clone, Default)]
pub struct MemoryEntityStore {
    entities: Arc<RwLock<HashMap<Uuid, EntityRecord>>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with no display image. Test/embedder helper; entity
    /// creation itself belongs to the surrounding application.
    pub async fn register(&self, entity_id: Uuid) {
        let mut entities = self.entities.write().await;
        entities.entry(entity_id).or_default();
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn exists(&self, entity_id: Uuid) -> Result<bool, MediaError> {
        let entities = self.entities.read().await;
        Ok(entities.contains_key(&entity_id))
    }

    async fn display_image(&self, entity_id: Uuid) -> Result<Option<String>, MediaError> {
        let entities = self.entities.read().await;
        entities
            .get(&entity_id)
            .map(|e| e.display_image.clone())
            .ok_or(MediaError::EntityNotFound(entity_id))
    }

    async fn set_display_image(&self, entity_id: Uuid, path: String) -> Result<(), MediaError> {
        let mut entities = self.entities.write().await;
        let record = entities
            .get_mut(&entity_id)
            .ok_or(MediaError::EntityNotFound(entity_id))?;
        record.display_image = Some(path);
        Ok(())
    }
}
