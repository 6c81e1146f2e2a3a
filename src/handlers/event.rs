// src/handlers/event.rs

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
    models::event::{CreateEventRequest, Event, UpdateEventRequest},
    query::{EVENT_BOUNDS, ListParams, ListQuery, Pagination, fetch_page},
    utils::{html::sanitize_content, slug::slugify},
};

const SEARCH_COLUMNS: &[&str] = &["name", "description", "location"];

/// Lists events, soonest first.
pub async fn list_events(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::resolve(params, EVENT_BOUNDS)?;

    let (events, total): (Vec<Event>, i64) =
        fetch_page(&pool, "events", "date ASC", SEARCH_COLUMNS, &query).await?;

    Ok(Json(serde_json::json!({
        "events": events,
        "pagination": Pagination::new(total, query.page, query.limit),
    })))
}

/// Retrieves a single event by ID.
pub async fn get_event(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let event = fetch_event(&pool, id).await?;
    Ok(Json(event))
}

async fn fetch_event(pool: &SqlitePool, id: i64) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))
}

/// Creates a new event. Admin only.
/// Requires name, description, category, date and location; the slug is
/// derived from the name.
pub async fn create_event(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateEventRequest>,
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
        INSERT INTO events
        (name, slug, description, content, category, date, end_date,
         location, max_participants, price, images, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&slug)
    .bind(&payload.description)
    .bind(content)
    .bind(&payload.category)
    .bind(payload.date)
    .bind(payload.end_date)
    .bind(&payload.location)
    .bind(payload.max_participants)
    .bind(payload.price.unwrap_or_default())
    .bind(SqlJson(payload.images.unwrap_or_default()))
    .bind(payload.is_active.unwrap_or(true))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!("An event with slug '{}' already exists", slug))
        } else {
            tracing::error!("Failed to create event: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    let event = fetch_event(&pool, id).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Partially updates an event. Admin only.
/// A new name re-derives the slug.
pub async fn update_event(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE events SET updated_at = CURRENT_TIMESTAMP");

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

    if let Some(description) = payload.description {
        builder.push(", description = ").push_bind(description);
    }

    if let Some(content) = payload.content {
        builder.push(", content = ").push_bind(sanitize_content(&content));
    }

    if let Some(category) = payload.category {
        builder.push(", category = ").push_bind(category);
    }

    if let Some(date) = payload.date {
        builder.push(", date = ").push_bind(date);
    }

    if let Some(end_date) = payload.end_date {
        builder.push(", end_date = ").push_bind(end_date);
    }

    if let Some(location) = payload.location {
        builder.push(", location = ").push_bind(location);
    }

    if let Some(max_participants) = payload.max_participants {
        builder.push(", max_participants = ").push_bind(max_participants);
    }

    if let Some(price) = payload.price {
        builder.push(", price = ").push_bind(price);
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
                "An event with slug '{}' already exists",
                slug.unwrap_or_default()
            ))
        } else {
            tracing::error!("Failed to update event: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    let event = fetch_event(&pool, id).await?;
    Ok(Json(event))
}

/// Deletes an event by ID. Admin only.
pub async fn delete_event(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete event: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
