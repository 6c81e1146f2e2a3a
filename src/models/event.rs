// src/models/event.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use super::validate_image_urls;

/// Represents the 'events' table in the database.
///
/// `current_participants` is reserved for a join-event flow that is not part
/// of this service; nothing here increments it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub content: Option<String>,
    pub category: String,

    pub date: chrono::DateTime<chrono::Utc>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,

    pub location: String,
    pub max_participants: Option<i64>,
    pub current_participants: i64,

    pub price: String,
    pub images: Json<Vec<String>>,
    pub is_active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating an event. Requires name, description, category, date and
/// location; the slug is derived from the name.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    pub content: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = 1))]
    pub max_participants: Option<i64>,
    #[validate(length(max = 100))]
    pub price: Option<String>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// DTO for partially updating an event. A new `name` re-derives the slug.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub max_participants: Option<i64>,
    pub price: Option<String>,
    #[validate(custom(function = validate_image_urls))]
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
