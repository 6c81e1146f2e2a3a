// src/handlers/destination.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::destination::{CreateDestinationRequest, Destination, UpdateDestinationRequest},
    query::{DESTINATION_BOUNDS, ListParams, ListQuery, Pagination, fetch_page},
    utils::{html::sanitize_content, slug::slugify},
};

const SEARCH_COLUMNS: &[&str] = &["name", "description", "location"];

/// Lists destinations with category/search filters and pagination.
/// Newest first. Out-of-range page/limit values are clamped, not rejected.
pub async fn list_destinations(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::resolve(params, DESTINATION_BOUNDS)?;

    let (destinations, total): (Vec<Destination>, i64) = fetch_page(
        &pool,
        "destinations",
        "created_at DESC",
        SEARCH_COLUMNS,
        &query,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "destinations": destinations,
        "pagination": Pagination::new(total, query.page, query.limit),
    })))
}

/// Retrieves a single destination by ID.
pub async fn get_destination(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let destination = fetch_destination(&pool, id).await?;
    Ok(Json(destination))
}

pub(crate) async fn fetch_destination(
    pool: &SqlitePool,
    id: i64,
) -> Result<Destination, AppError> {
    sqlx::query_as::<_, Destination>("SELECT * FROM destinations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Destination not found".to_string()))
}

/// Creates a new destination. Admin only.
/// The slug is derived from the name; a duplicate slug is a 409.
pub async fn create_destination(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateDestinationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let slug = slugify(&payload.name);
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Name must contain at least one letter or digit".to_string(),
        ));
    }

    let content = payload.content.map(|c| sanitize_content(&c));

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO destinations
        (name, slug, category, description, content, price, facilities,
         location, latitude, longitude, images, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&slug)
    .bind(&payload.category)
    .bind(&payload.description)
    .bind(content)
    .bind(payload.price.unwrap_or_default())
    .bind(SqlJson(payload.facilities.unwrap_or_default()))
    .bind(&payload.location)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(SqlJson(payload.images.unwrap_or_default()))
    .bind(payload.is_active.unwrap_or(true))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!("A destination with slug '{}' already exists", slug))
        } else {
            tracing::error!("Failed to create destination: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    let destination = fetch_destination(&pool, id).await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

/// Partially updates a destination. Admin only.
/// A new name re-derives the slug; other fields leave it untouched.
pub async fn update_destination(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDestinationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE destinations SET updated_at = CURRENT_TIMESTAMP");

    let mut slug = None;
    if let Some(name) = &payload.name {
        let derived = slugify(name);
        if derived.is_empty() {
            return Err(AppError::BadRequest(
                "Name must contain at least one letter or digit".to_string(),
            ));
        }
        builder.push(", name = ").push_bind(name.clone());
        builder.push(", slug = ").push_bind(derived.clone());
        slug = Some(derived);
    }

    if let Some(category) = payload.category {
        builder.push(", category = ").push_bind(category);
    }

    if let Some(description) = payload.description {
        builder.push(", description = ").push_bind(description);
    }

    if let Some(content) = payload.content {
        builder.push(", content = ").push_bind(sanitize_content(&content));
    }

    if let Some(price) = payload.price {
        builder.push(", price = ").push_bind(price);
    }

    if let Some(facilities) = payload.facilities {
        builder.push(", facilities = ").push_bind(SqlJson(facilities));
    }

    if let Some(location) = payload.location {
        builder.push(", location = ").push_bind(location);
    }

    if let Some(latitude) = payload.latitude {
        builder.push(", latitude = ").push_bind(latitude);
    }

    if let Some(longitude) = payload.longitude {
        builder.push(", longitude = ").push_bind(longitude);
    }

    if let Some(images) = payload.images {
        builder.push(", images = ").push_bind(SqlJson(images));
    }

    if let Some(is_active) = payload.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!(
                "A destination with slug '{}' already exists",
                slug.unwrap_or_default()
            ))
        } else {
            tracing::error!("Failed to update destination: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Destination not found".to_string()));
    }

    let destination = fetch_destination(&pool, id).await?;
    Ok(Json(destination))
}

/// Deletes a destination by ID. Admin only.
/// Reviews referencing it go with it (ON DELETE CASCADE).
pub async fn delete_destination(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM destinations WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete destination: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Destination not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
