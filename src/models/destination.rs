// src/models/destination.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use super::validate_image_urls;

/// The four destination categories the site knows about.
pub const DESTINATION_CATEGORIES: [&str; 4] =
    ["Wisata Alam", "Pendakian", "Camping", "Spot Foto"];

/// Represents the 'destinations' table in the database.
///
/// `rating` and `total_reviews` are derived columns, kept in sync with the
/// reviews table by the review handlers; they are never written directly.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: i64,
    pub name: String,

    /// URL-safe identifier derived from `name` at creation time.
    pub slug: String,

    pub category: String,
    pub description: String,

    /// Optional long-form body, sanitized before storage.
    pub content: Option<String>,

    /// Free-text price ("Gratis", "Rp 10.000", ...), not parsed currency.
    pub price: String,

    /// Ordered facility names, stored as a JSON array.
    pub facilities: Json<Vec<String>>,

    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Ordered image URLs, stored as a JSON array.
    pub images: Json<Vec<String>>,

    /// Mean of review ratings, 0 when there are none.
    pub rating: f64,
    pub total_reviews: i64,

    /// Visibility flag, distinct from physical deletion.
    pub is_active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a destination. The slug is derived server-side.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestinationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(custom(function = validate_destination_category))]
    pub category: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    pub content: Option<String>,
    #[validate(length(max = 100))]
    pub price: Option<String>,
    pub facilities: Option<Vec<String>>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// DTO for partially updating a destination. A new `name` re-derives the slug.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestinationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(custom(function = validate_destination_category))]
    pub category: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub price: Option<String>,
    pub facilities: Option<Vec<String>>,
    pub location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn validate_destination_category(category: &str) -> Result<(), validator::ValidationError> {
    if DESTINATION_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unknown_category"))
    }
}
