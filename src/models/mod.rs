// src/models/mod.rs

pub mod destination;
pub mod event;
pub mod gallery;
pub mod review;
pub mod umkm;
pub mod user;

use url::Url;

/// Validates a collection of image URLs, ensuring each meets length and
/// format requirements. Shared by every entity that stores an image list.
pub(crate) fn validate_image_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
        if Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}
