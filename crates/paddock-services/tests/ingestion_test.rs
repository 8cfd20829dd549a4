//! End-to-end tests for the media service against the in-memory ledger and a
//! tempdir-backed local asset store.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, RgbaImage};
use paddock_core::{
    GallerySort, LimitPolicy, LimitSource, MediaConfig, MediaError, NewGalleryAsset,
};
use paddock_ledger::{EntityStore, GalleryLedger, MemoryEntityStore, MemoryLedger};
use paddock_services::MediaService;
use paddock_storage::{AssetStore, LocalAssetStore, StorageResult};
use tempfile::TempDir;
use uuid::Uuid;

/// Wraps the local store and counts calls, so tests can assert that failed
/// uploads perform zero writes.
struct RecordingStore {
    inner: LocalAssetStore,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

#[async_trait]
impl AssetStore for RecordingStore {
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(path, data).await
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path).await
    }
}

/// Limit source whose policy can change between calls.
struct MutableLimits(RwLock<LimitPolicy>);

impl LimitSource for MutableLimits {
    fn current(&self) -> LimitPolicy {
        self.0.read().unwrap().clone()
    }
}

struct Harness {
    service: MediaService,
    ledger: MemoryLedger,
    entities: MemoryEntityStore,
    store: Arc<RecordingStore>,
    limits: Arc<MutableLimits>,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore {
        inner: LocalAssetStore::new(dir.path()).await.unwrap(),
        writes: AtomicUsize::new(0),
        deletes: AtomicUsize::new(0),
    });
    let ledger = MemoryLedger::new();
    let entities = MemoryEntityStore::new();
    let limits = Arc::new(MutableLimits(RwLock::new(LimitPolicy::default())));

    let service = MediaService::new(
        Arc::new(ledger.clone()),
        Arc::new(entities.clone()),
        store.clone(),
        limits.clone(),
        &MediaConfig::default(),
    );

    Harness {
        service,
        ledger,
        entities,
        store,
        limits,
        _dir: dir,
    }
}

fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    Bytes::from(buf.into_inner())
}

async fn registered_entity(h: &Harness) -> Uuid {
    let entity_id = Uuid::new_v4();
    h.entities.register(entity_id).await;
    entity_id
}

#[tokio::test]
async fn ingest_gallery_stores_bytes_and_records_asset() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let asset = h
        .service
        .ingest_gallery(
            entity_id,
            png_bytes(200, 150),
            "image/png",
            "pasture.png",
            Some(NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()),
            Some("afternoon in the pasture".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(asset.entity_id, entity_id);
    assert!(asset.storage_path.contains("/gallery/"));
    assert!(asset.storage_path.ends_with(".png"));
    assert!(asset.byte_size > 0);
    assert!(h.store.exists(&asset.storage_path).await.unwrap());
    assert_eq!(h.ledger.count(entity_id).await.unwrap(), 1);
}

#[tokio::test]
async fn ingest_gallery_unknown_entity_fails() {
    let h = harness().await;
    let entity_id = Uuid::new_v4();

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "a.png", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::EntityNotFound(id) if id == entity_id));
    assert_eq!(h.store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_payload_performs_no_writes_and_no_inserts() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;
    h.limits.0.write().unwrap().max_bytes_per_asset = 64;

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "big.png", None, None)
        .await
        .unwrap_err();

    match err {
        MediaError::FileTooLarge { max, .. } => assert_eq!(max, 64),
        other => panic!("expected FileTooLarge, got {other:?}"),
    }
    assert_eq!(h.store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(h.ledger.count(entity_id).await.unwrap(), 0);
}

#[tokio::test]
async fn undersized_and_oversized_dimensions_rejected() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(50, 50), "image/png", "tiny.png", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::ImageTooSmall { .. }));

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(4001, 100), "image/png", "wide.png", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::ImageTooLarge { .. }));

    // 100x100 sits exactly on the minimum and passes.
    h.service
        .ingest_gallery(entity_id, png_bytes(100, 100), "image/png", "ok.png", None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn gif_content_type_rejected_regardless_of_bytes() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/gif", "anim.gif", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::UnsupportedFormat { .. }));
    assert_eq!(h.store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn full_gallery_rejects_upload_with_limit_in_context() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    // Seed 20 existing records directly; the files themselves are irrelevant
    // to admission control.
    for i in 0..20 {
        h.ledger
            .insert(NewGalleryAsset {
                entity_id,
                storage_path: format!("{entity_id}/gallery/seed{i}.jpg"),
                captured_on: None,
                description: None,
                byte_size: 1,
            })
            .await
            .unwrap();
    }

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "one-more.png", None, None)
        .await
        .unwrap_err();

    match err {
        MediaError::LimitExceeded { max, current } => {
            assert_eq!(max, 20);
            assert_eq!(current, 20);
        }
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
    assert_eq!(h.ledger.count(entity_id).await.unwrap(), 20);
    assert_eq!(h.store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn limit_policy_is_polled_per_call() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    h.service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "a.png", None, None)
        .await
        .unwrap();

    h.limits.0.write().unwrap().max_assets_per_entity = 1;

    let err = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "b.png", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::LimitExceeded { max: 1, .. }));
}

#[tokio::test]
async fn newest_upload_lists_first() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    h.service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "old.png", None, None)
        .await
        .unwrap();
    let newest = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "new.png", None, None)
        .await
        .unwrap();

    let listed = h
        .service
        .list_gallery(entity_id, GallerySort::CreatedAt, false)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newest.id);
}

#[tokio::test]
async fn delete_asset_removes_record_and_bytes() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let asset = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "a.png", None, None)
        .await
        .unwrap();

    h.service.delete_asset(asset.id).await.unwrap();

    assert_eq!(h.ledger.count(entity_id).await.unwrap(), 0);
    assert!(!h.store.exists(&asset.storage_path).await.unwrap());

    let err = h.service.delete_asset(asset.id).await.unwrap_err();
    assert!(matches!(err, MediaError::AssetNotFound(_)));
}

#[tokio::test]
async fn display_field_wins_over_newer_gallery_assets() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let profile_path = h
        .service
        .ingest_profile(entity_id, png_bytes(300, 300), "image/png", "face.png")
        .await
        .unwrap();

    // A newer gallery upload must not displace the explicit profile image.
    h.service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "later.png", None, None)
        .await
        .unwrap();

    let resolved = h.service.resolve_display_image(entity_id).await.unwrap();
    assert_eq!(resolved, profile_path);
    assert!(resolved.starts_with("/media/"));
    assert!(resolved.contains("/profile/"));
}

#[tokio::test]
async fn newest_gallery_asset_backs_display_when_no_profile_set() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    h.service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "old.png", None, None)
        .await
        .unwrap();
    let newest = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "new.png", None, None)
        .await
        .unwrap();

    let resolved = h.service.resolve_display_image(entity_id).await.unwrap();
    assert_eq!(resolved, format!("/media/{}", newest.storage_path));
}

#[tokio::test]
async fn entity_with_no_images_resolves_to_placeholder() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let resolved = h.service.resolve_display_image(entity_id).await.unwrap();
    assert_eq!(resolved, "/static/placeholder.png");
}

#[tokio::test]
async fn promote_sets_display_without_writing_files() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let asset = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "best.png", None, None)
        .await
        .unwrap();
    let writes_before = h.store.writes.load(Ordering::SeqCst);

    let path = h
        .service
        .promote_to_profile(entity_id, asset.id)
        .await
        .unwrap();

    assert_eq!(path, format!("/media/{}", asset.storage_path));
    assert_eq!(h.store.writes.load(Ordering::SeqCst), writes_before);
    assert_eq!(h.ledger.count(entity_id).await.unwrap(), 1);
    assert_eq!(
        h.service.resolve_display_image(entity_id).await.unwrap(),
        path
    );
}

#[tokio::test]
async fn promote_rejects_asset_of_another_entity() {
    let h = harness().await;
    let owner = registered_entity(&h).await;
    let intruder = registered_entity(&h).await;

    let asset = h
        .service
        .ingest_gallery(owner, png_bytes(200, 200), "image/png", "mine.png", None, None)
        .await
        .unwrap();

    let err = h
        .service
        .promote_to_profile(intruder, asset.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::AssetNotFound(_)));
}

#[tokio::test]
async fn replacing_profile_deletes_superseded_file() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    h.service
        .ingest_profile(entity_id, png_bytes(300, 300), "image/png", "first.png")
        .await
        .unwrap();
    let first_path = h
        .entities
        .display_image(entity_id)
        .await
        .unwrap()
        .unwrap();

    let second = h
        .service
        .ingest_profile(entity_id, png_bytes(300, 300), "image/png", "second.png")
        .await
        .unwrap();

    assert!(!h.store.exists(&first_path).await.unwrap());
    assert_eq!(
        h.service.resolve_display_image(entity_id).await.unwrap(),
        second
    );
}

#[tokio::test]
async fn replacing_profile_spares_promoted_gallery_bytes() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    let asset = h
        .service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "kept.png", None, None)
        .await
        .unwrap();
    h.service
        .promote_to_profile(entity_id, asset.id)
        .await
        .unwrap();

    // The display field now points at gallery-owned bytes; a profile upload
    // must not delete them.
    h.service
        .ingest_profile(entity_id, png_bytes(300, 300), "image/png", "fresh.png")
        .await
        .unwrap();

    assert!(h.store.exists(&asset.storage_path).await.unwrap());
}

#[tokio::test]
async fn limits_summary_reports_usage() {
    let h = harness().await;
    let entity_id = registered_entity(&h).await;

    h.service
        .ingest_gallery(entity_id, png_bytes(200, 200), "image/png", "a.png", None, None)
        .await
        .unwrap();

    let summary = h.service.limits_summary(entity_id).await.unwrap();
    assert_eq!(summary.max_assets, 20);
    assert_eq!(summary.max_bytes_per_asset, 5_242_880);
    assert_eq!(summary.current_count, 1);
    assert_eq!(summary.remaining_count, 19);

    let err = h.service.limits_summary(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, MediaError::EntityNotFound(_)));
}
