//! Display image resolution.
//!
//! Three-tier priority, first match wins: the entity's explicit display-image
//! field, then the newest gallery asset, then the fixed placeholder. An entity
//! with no images resolves to the placeholder, not an error.

use paddock_core::MediaError;
use uuid::Uuid;

use crate::service::MediaService;

impl MediaService {
    /// The single path to show for an entity.
    ///
    /// Storage paths from tiers one and two are returned under the media URL
    /// prefix so the result is directly renderable.
    pub async fn resolve_display_image(&self, entity_id: Uuid) -> Result<String, MediaError> {
        if let Some(path) = self.entities().display_image(entity_id).await? {
            if !path.is_empty() {
                return Ok(self.public_path(&path));
            }
        }

        if let Some(latest) = self.ledger().latest(entity_id).await? {
            return Ok(self.public_path(&latest.storage_path));
        }

        Ok(self.placeholder_path.clone())
    }
}
