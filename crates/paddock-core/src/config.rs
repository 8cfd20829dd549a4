//! Configuration module
//!
//! Environment-backed configuration for the media subsystem: the media root
//! directory, the public URL prefix, the display placeholder, and limit-policy
//! overrides. Compiled-in defaults apply wherever no override is set.

use std::env;

use crate::error::MediaError;
use crate::limits::{LimitPolicy, LimitSource};

const DEFAULT_MEDIA_ROOT: &str = "data/media";
const DEFAULT_MEDIA_URL_PREFIX: &str = "/media";
const DEFAULT_PLACEHOLDER_PATH: &str = "/static/placeholder.png";

/// Media subsystem configuration.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Root directory for stored asset bytes.
    pub media_root: String,
    /// URL prefix prepended to storage paths when resolving display images.
    pub media_url_prefix: String,
    /// Fixed path returned when an entity has no profile image and no gallery.
    pub placeholder_path: String,
    /// Upload limits, possibly overridden from the environment.
    pub limits: LimitPolicy,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_root: DEFAULT_MEDIA_ROOT.to_string(),
            media_url_prefix: DEFAULT_MEDIA_URL_PREFIX.to_string(),
            placeholder_path: DEFAULT_PLACEHOLDER_PATH.to_string(),
            limits: LimitPolicy::default(),
        }
    }
}

impl MediaConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = LimitPolicy::default();

        let allowed_content_types = env::var("PADDOCK_ALLOWED_CONTENT_TYPES")
            .map(|s| {
                s.split(',')
                    .map(|ct| ct.trim().to_lowercase())
                    .filter(|ct| !ct.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_content_types);

        let limits = LimitPolicy {
            max_assets_per_entity: parse_env("PADDOCK_MAX_ASSETS_PER_ENTITY")?
                .unwrap_or(defaults.max_assets_per_entity),
            max_bytes_per_asset: parse_env("PADDOCK_MAX_ASSET_SIZE_BYTES")?
                .unwrap_or(defaults.max_bytes_per_asset),
            allowed_content_types,
            min_width: parse_env("PADDOCK_MIN_IMAGE_WIDTH")?.unwrap_or(defaults.min_width),
            min_height: parse_env("PADDOCK_MIN_IMAGE_HEIGHT")?.unwrap_or(defaults.min_height),
            max_width: parse_env("PADDOCK_MAX_IMAGE_WIDTH")?.unwrap_or(defaults.max_width),
            max_height: parse_env("PADDOCK_MAX_IMAGE_HEIGHT")?.unwrap_or(defaults.max_height),
        };

        let config = Self {
            media_root: env::var("PADDOCK_MEDIA_ROOT")
                .unwrap_or_else(|_| DEFAULT_MEDIA_ROOT.to_string()),
            media_url_prefix: env::var("PADDOCK_MEDIA_URL_PREFIX")
                .unwrap_or_else(|_| DEFAULT_MEDIA_URL_PREFIX.to_string()),
            placeholder_path: env::var("PADDOCK_PLACEHOLDER_PATH")
                .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_PATH.to_string()),
            limits,
        };

        Ok(config)
    }

    /// Validate the loaded configuration. Run once at startup; a configuration
    /// that fails here must not be handed to the orchestrator.
    pub fn validate(&self) -> Result<(), MediaError> {
        if self.media_root.is_empty() {
            return Err(MediaError::PolicyConfiguration(
                "media root must not be empty".to_string(),
            ));
        }
        self.limits.validate()
    }
}

impl LimitSource for MediaConfig {
    fn current(&self) -> LimitPolicy {
        self.limits.clone()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, anyhow::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => {
            let value = raw
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MediaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.media_url_prefix, "/media");
        assert_eq!(config.placeholder_path, "/static/placeholder.png");
    }

    #[test]
    fn test_inconsistent_limits_fail_validation() {
        let config = MediaConfig {
            limits: LimitPolicy {
                min_width: 8000,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MediaError::PolicyConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_media_root_rejected() {
        let config = MediaConfig {
            media_root: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_is_a_limit_source() {
        let config = MediaConfig::default();
        let policy = config.current();
        assert_eq!(policy.max_assets_per_entity, 20);
    }
}
