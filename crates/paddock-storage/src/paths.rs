//! Storage-path allocation.
//!
//! Path shape: `{entity_id}/profile/{token}.{ext}` or
//! `{entity_id}/gallery/{token}.{ext}`, relative to the media root. The base
//! name is a freshly generated random token; the caller-supplied filename
//! contributes nothing but the extension, which removes path-traversal and
//! collision risk from caller input.

use std::path::Path;

use paddock_core::AssetKind;
use rand::Rng;
use uuid::Uuid;

/// Extensions carried through from the original filename. Anything else falls
/// back to [`DEFAULT_EXTENSION`]; a mismatch is tolerated here because format
/// correctness was already certified against the decoded content.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Fallback extension for unrecognized filename suffixes.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Allocate a fresh, collision-free storage path for a new asset.
pub fn allocate_asset_path(entity_id: Uuid, kind: AssetKind, original_filename: &str) -> String {
    let token: u128 = rand::rng().random();
    let ext = infer_extension(original_filename);
    let segment = match kind {
        AssetKind::Profile => "profile",
        AssetKind::Gallery => "gallery",
    };
    format!("{entity_id}/{segment}/{token:032x}.{ext}")
}

/// Lower-cased extension from the filename suffix, or the default when the
/// suffix is not an allowed image extension.
fn infer_extension(original_filename: &str) -> String {
    Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
