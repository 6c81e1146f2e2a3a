// src/models/umkm.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use super::validate_image_urls;

/// Represents the 'umkm' table: a local business/product listing owned by the
/// user who created it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Umkm {
    pub id: i64,

    /// Owning user.
    pub user_id: i64,

    pub name: String,
    pub category: String,
    pub description: String,

    /// Free-text price, not parsed currency.
    pub price: String,

    /// None means unlimited stock.
    pub stock: Option<i64>,

    pub images: Json<Vec<String>>,
    pub contact: String,
    pub location: String,
    pub is_active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a listing. The caller becomes the owner.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUmkmRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    #[validate(length(max = 100))]
    pub price: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
    #[validate(length(max = 100))]
    pub contact: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for partially updating a listing. Owner or admin only.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUmkmRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
    pub contact: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}
