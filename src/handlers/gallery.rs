// src/handlers/gallery.rs

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
    models::gallery::{CreateGalleryRequest, GalleryItem, UpdateGalleryRequest},
    query::{GALLERY_BOUNDS, ListParams, ListQuery, Pagination, fetch_page},
};

const SEARCH_COLUMNS: &[&str] = &["title", "description"];

/// Lists gallery items, newest first.
/// The gallery is strict about paging: page < 1 or limit outside [1,50]
/// is a 400, unlike the other list endpoints.
pub async fn list_gallery(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::resolve(params, GALLERY_BOUNDS)?;

    let (items, total): (Vec<GalleryItem>, i64) = fetch_page(
        &pool,
        "gallery_items",
        "created_at DESC",
        SEARCH_COLUMNS,
        &query,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "items": items,
        "pagination": Pagination::new(total, query.page, query.limit),
    })))
}

/// Retrieves a single gallery item by ID.
pub async fn get_gallery_item(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let item = fetch_gallery_item(&pool, id).await?;
    Ok(Json(item))
}

async fn fetch_gallery_item(pool: &SqlitePool, id: i64) -> Result<GalleryItem, AppError> {
    sqlx::query_as::<_, GalleryItem>("SELECT * FROM gallery_items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Gallery item not found".to_string()))
}

/// Creates a gallery item. Admin only.
/// Title, category and a non-empty image list (no blank entries) required.
pub async fn create_gallery_item(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateGalleryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO gallery_items (title, description, images, category, is_active)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(payload.description.unwrap_or_default())
    .bind(SqlJson(payload.images))
    .bind(&payload.category)
    .bind(payload.is_active.unwrap_or(true))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create gallery item: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let item = fetch_gallery_item(&pool, id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Partially updates a gallery item. Admin only.
pub async fn update_gallery_item(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateGalleryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE gallery_items SET updated_at = CURRENT_TIMESTAMP");

    if let Some(title) = payload.title {
        builder.push(", title = ").push_bind(title);
    }

    if let Some(description) = payload.description {
        builder.push(", description = ").push_bind(description);
    }

    if let Some(images) = payload.images {
        builder.push(", images = ").push_bind(SqlJson(images));
    }

    if let Some(category) = payload.category {
        builder.push(", category = ").push_bind(category);
    }

    if let Some(is_active) = payload.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update gallery item: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Gallery item not found".to_string()));
    }

    let item = fetch_gallery_item(&pool, id).await?;
    Ok(Json(item))
}

/// Deletes a gallery item by ID. Admin only.
pub async fn delete_gallery_item(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM gallery_items WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete gallery item: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Gallery item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
