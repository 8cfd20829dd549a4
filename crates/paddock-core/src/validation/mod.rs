//! Image format and dimension validation.
//!
//! `validate_image` is a pure function over its inputs. Checks run in a fixed
//! order and stop at the first failure so error precedence is deterministic:
//! content type, byte size, decode, minimum dimensions, maximum dimensions.
//! Format correctness is certified against the decoded content, never the
//! file extension.

use std::io::Cursor;

use image::{GenericImageView, ImageReader};

use crate::error::MediaError;
use crate::limits::LimitPolicy;

/// Validate an in-memory image against the given policy.
///
/// Returns the decoded `(width, height)` on success. Decode is CPU-bound;
/// callers on an async runtime should run this under
/// `tokio::task::spawn_blocking`.
pub fn validate_image(
    data: &[u8],
    declared_content_type: &str,
    policy: &LimitPolicy,
) -> Result<(u32, u32), MediaError> {
    if !policy.allows_content_type(declared_content_type) {
        return Err(MediaError::UnsupportedFormat {
            content_type: declared_content_type.to_string(),
            allowed: policy.allowed_content_types.clone(),
        });
    }

    if data.len() > policy.max_bytes_per_asset {
        return Err(MediaError::FileTooLarge {
            size: data.len(),
            max: policy.max_bytes_per_asset,
        });
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| MediaError::InvalidImage(image::ImageError::IoError(e)))?;
    let img = reader.decode().map_err(MediaError::InvalidImage)?;
    let (width, height) = img.dimensions();

    if width < policy.min_width || height < policy.min_height {
        return Err(MediaError::ImageTooSmall {
            width,
            height,
            min_width: policy.min_width,
            min_height: policy.min_height,
        });
    }

    if width > policy.max_width || height > policy.max_height {
        return Err(MediaError::ImageTooLarge {
            width,
            height,
            max_width: policy.max_width,
            max_height: policy.max_height,
        });
    }

    Ok((width, height))
}
