// src/handlers/umkm.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::umkm::{CreateUmkmRequest, Umkm, UpdateUmkmRequest},
    query::{ListParams, ListQuery, Pagination, UMKM_BOUNDS, fetch_page},
    utils::auth::Claims,
};

const SEARCH_COLUMNS: &[&str] = &["name", "description", "location"];

/// Lists UMKM entries, newest first. The village directory is small, so the
/// default page size is a generous 100.
pub async fn list_umkm(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::resolve(params, UMKM_BOUNDS)?;

    let (umkm, total): (Vec<Umkm>, i64) =
        fetch_page(&pool, "umkm", "created_at DESC", SEARCH_COLUMNS, &query).await?;

    Ok(Json(serde_json::json!({
        "umkm": umkm,
        "pagination": Pagination::new(total, query.page, query.limit),
    })))
}

/// Retrieves a single UMKM entry by ID.
pub async fn get_umkm(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let umkm = fetch_umkm(&pool, id).await?;
    Ok(Json(umkm))
}

async fn fetch_umkm(pool: &SqlitePool, id: i64) -> Result<Umkm, AppError> {
    sqlx::query_as::<_, Umkm>("SELECT * FROM umkm WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("UMKM not found".to_string()))
}

/// Creates an UMKM listing. The authenticated caller becomes the owner.
pub async fn create_umkm(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUmkmRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO umkm
        (user_id, name, category, description, price, stock, images, contact, location, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(claims.user_id())
    .bind(&payload.name)
    .bind(&payload.category)
    .bind(&payload.description)
    .bind(payload.price.unwrap_or_default())
    .bind(payload.stock)
    .bind(SqlJson(payload.images.unwrap_or_default()))
    .bind(payload.contact.unwrap_or_default())
    .bind(payload.location.unwrap_or_default())
    .bind(payload.is_active.unwrap_or(true))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create UMKM: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let umkm = fetch_umkm(&pool, id).await?;
    Ok((StatusCode::CREATED, Json(umkm)))
}

/// Partially updates an UMKM listing. Owner or admin only.
pub async fn update_umkm(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUmkmRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let existing = fetch_umkm(&pool, id).await?;
    if existing.user_id != claims.user_id() && !claims.is_admin() {
        return Err(AppError::AuthError(
            "You are not authorized to edit this UMKM".to_string(),
        ));
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE umkm SET updated_at = CURRENT_TIMESTAMP");

    if let Some(name) = payload.name {
        builder.push(", name = ").push_bind(name);
    }

    if let Some(category) = payload.category {
        builder.push(", category = ").push_bind(category);
    }

    if let Some(description) = payload.description {
        builder.push(", description = ").push_bind(description);
    }

    if let Some(price) = payload.price {
        builder.push(", price = ").push_bind(price);
    }

    if let Some(stock) = payload.stock {
        builder.push(", stock = ").push_bind(stock);
    }

    if let Some(images) = payload.images {
        builder.push(", images = ").push_bind(SqlJson(images));
    }

    if let Some(contact) = payload.contact {
        builder.push(", contact = ").push_bind(contact);
    }

    if let Some(location) = payload.location {
        builder.push(", location = ").push_bind(location);
    }

    if let Some(is_active) = payload.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update UMKM: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let umkm = fetch_umkm(&pool, id).await?;
    Ok(Json(umkm))
}

/// Deletes an UMKM listing. Owner or admin only.
pub async fn delete_umkm(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let existing = fetch_umkm(&pool, id).await?;
    if existing.user_id != claims.user_id() && !claims.is_admin() {
        return Err(AppError::AuthError(
            "You are not authorized to delete this UMKM".to_string(),
        ));
    }

    sqlx::query("DELETE FROM umkm WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete UMKM: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(StatusCode::NO_CONTENT)
}
