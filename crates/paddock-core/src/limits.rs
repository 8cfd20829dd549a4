//! Limit policy for per-entity galleries.
//!
//! The policy is read from a `LimitSource` on every ingestion call so that a
//! configuration change takes effect without a restart. Validation logic takes
//! the policy as an argument and never reads ambient state.

use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Default ceiling on gallery assets per entity.
pub const DEFAULT_MAX_ASSETS_PER_ENTITY: u32 = 20;
/// Default ceiling on a single asset, 5 MiB.
pub const DEFAULT_MAX_BYTES_PER_ASSET: usize = 5_242_880;
/// Default minimum decoded dimension (applies to both axes).
pub const DEFAULT_MIN_DIMENSION: u32 = 100;
/// Default maximum decoded dimension (applies to both axes).
pub const DEFAULT_MAX_DIMENSION: u32 = 4000;

/// Globally-scoped upload limits, polled per operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitPolicy {
    pub max_assets_per_entity: u32,
    pub max_bytes_per_asset: usize,
    pub allowed_content_types: Vec<String>,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            max_assets_per_entity: DEFAULT_MAX_ASSETS_PER_ENTITY,
            max_bytes_per_asset: DEFAULT_MAX_BYTES_PER_ASSET,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            min_width: DEFAULT_MIN_DIMENSION,
            min_height: DEFAULT_MIN_DIMENSION,
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl LimitPolicy {
    /// Check internal consistency. Run once at startup; an inconsistent policy
    /// must never reach the validator.
    pub fn validate(&self) -> Result<(), MediaError> {
        if self.max_assets_per_entity == 0 {
            return Err(MediaError::PolicyConfiguration(
                "max_assets_per_entity must be positive".to_string(),
            ));
        }
        if self.max_bytes_per_asset == 0 {
            return Err(MediaError::PolicyConfiguration(
                "max_bytes_per_asset must be positive".to_string(),
            ));
        }
        if self.allowed_content_types.is_empty() {
            return Err(MediaError::PolicyConfiguration(
                "allowed_content_types must not be empty".to_string(),
            ));
        }
        if self.min_width == 0 || self.min_height == 0 {
            return Err(MediaError::PolicyConfiguration(
                "minimum dimensions must be positive".to_string(),
            ));
        }
        if self.min_width > self.max_width {
            return Err(MediaError::PolicyConfiguration(format!(
                "min_width {} exceeds max_width {}",
                self.min_width, self.max_width
            )));
        }
        if self.min_height > self.max_height {
            return Err(MediaError::PolicyConfiguration(format!(
                "min_height {} exceeds max_height {}",
                self.min_height, self.max_height
            )));
        }
        Ok(())
    }

    /// Case-insensitive membership test against the allowed content types.
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let normalized = content_type.to_lowercase();
        self.allowed_content_types
            .iter()
            .any(|ct| ct.eq_ignore_ascii_case(&normalized))
    }
}

/// Source of the current limit policy.
///
/// The orchestrator fetches a fresh snapshot from this on every call; the
/// policy may change between calls and must never be cached across requests.
pub trait LimitSource: Send + Sync {
    fn current(&self) -> LimitPolicy;
}

/// A fixed limit policy, used when no configuration collaborator is wired in.
#[derive(Clone, Debug, Default)]
pub struct StaticLimits(pub LimitPolicy);

impl LimitSource for StaticLimits {
    fn current(&self) -> LimitPolicy {
        self.0.clone()
    }
}
