// src/models/review.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use super::validate_image_urls;

/// Represents the 'reviews' table in the database.
/// Every write to this table re-aggregates the parent destination.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub destination_id: i64,

    /// Star rating, 1 to 5.
    pub rating: i64,

    pub comment: String,
    pub images: Json<Vec<String>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
}

/// DTO for editing a review. A new rating re-aggregates the destination.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i64>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}
