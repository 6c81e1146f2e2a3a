// src/models/gallery.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'gallery_items' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// At least one entry, none blank.
    pub images: Json<Vec<String>>,

    pub category: String,
    pub is_active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a gallery item.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = validate_gallery_images))]
    pub images: Vec<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub is_active: Option<bool>,
}

/// DTO for partially updating a gallery item.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = validate_gallery_images))]
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

/// The image list must be non-empty and every entry non-blank after trim.
fn validate_gallery_images(images: &[String]) -> Result<(), validator::ValidationError> {
    if images.is_empty() {
        return Err(validator::ValidationError::new("images_empty"));
    }
    for image in images {
        if image.trim().is_empty() {
            return Err(validator::ValidationError::new("image_blank"));
        }
        if image.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
    }
    Ok(())
}
