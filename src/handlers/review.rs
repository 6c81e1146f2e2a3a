// src/handlers/review.rs
//
// Review CRUD plus the rating aggregator: every review write re-derives the
// parent destination's rating/total_reviews inside the same transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::review::{CreateReviewRequest, Review, UpdateReviewRequest},
    utils::auth::Claims,
};

/// Recomputes a destination's aggregates from scratch.
///
/// A full AVG/COUNT over the reviews table, never an incremental running
/// average, so concurrent recomputes converge on the same value. Rating is
/// rounded to one decimal; zero reviews reset both columns to 0.
async fn recompute_destination_rating(
    conn: &mut SqliteConnection,
    destination_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE destinations
        SET rating = COALESCE(
                (SELECT ROUND(AVG(rating), 1) FROM reviews WHERE destination_id = ?), 0),
            total_reviews =
                (SELECT COUNT(*) FROM reviews WHERE destination_id = ?),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(destination_id)
    .bind(destination_id)
    .bind(destination_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn fetch_review(pool: &SqlitePool, id: i64) -> Result<Review, AppError> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Review not found".to_string()))
}

/// Lists the reviews of a destination, newest first.
pub async fn list_reviews(
    State(pool): State<SqlitePool>,
    Path(destination_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_destination_exists(&pool, destination_id).await?;

    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE destination_id = ? ORDER BY created_at DESC",
    )
    .bind(destination_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(reviews))
}

async fn ensure_destination_exists(
    pool: &SqlitePool,
    destination_id: i64,
) -> Result<(), AppError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM destinations WHERE id = ?")
        .bind(destination_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Destination not found".to_string()))?;
    Ok(())
}

/// Submits a review for a destination. Any authenticated user.
/// The destination's aggregates are updated before the review is returned.
pub async fn create_review(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(destination_id): Path<i64>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    ensure_destination_exists(&pool, destination_id).await?;

    let mut tx = pool.begin().await?;

    let review_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO reviews (user_id, destination_id, rating, comment, images)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(claims.user_id())
    .bind(destination_id)
    .bind(payload.rating)
    .bind(payload.comment.unwrap_or_default())
    .bind(SqlJson(payload.images.unwrap_or_default()))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create review: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    recompute_destination_rating(&mut *tx, destination_id).await?;

    tx.commit().await?;

    let review = fetch_review(&pool, review_id).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Edits a review. Author or admin only.
/// A changed rating re-aggregates the destination.
pub async fn update_review(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let review = fetch_review(&pool, id).await?;

    if review.user_id != claims.user_id() && !claims.is_admin() {
        return Err(AppError::AuthError(
            "You are not authorized to edit this review".to_string(),
        ));
    }

    if payload.rating.is_none() && payload.comment.is_none() {
        return Ok(Json(review));
    }

    let mut tx = pool.begin().await?;

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE reviews SET updated_at = CURRENT_TIMESTAMP");

    let rating_changed = payload.rating.is_some();

    if let Some(rating) = payload.rating {
        builder.push(", rating = ").push_bind(rating);
    }

    if let Some(comment) = payload.comment {
        builder.push(", comment = ").push_bind(comment);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    builder.build().execute(&mut *tx).await.map_err(|e| {
        tracing::error!("Failed to update review: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if rating_changed {
        recompute_destination_rating(&mut *tx, review.destination_id).await?;
    }

    tx.commit().await?;

    let review = fetch_review(&pool, id).await?;
    Ok(Json(review))
}

/// Deletes a review. Author or admin only.
/// The destination's aggregates are recomputed over the remaining reviews.
pub async fn delete_review(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let review = fetch_review(&pool, id).await?;

    if review.user_id != claims.user_id() && !claims.is_admin() {
        return Err(AppError::AuthError(
            "You are not authorized to delete this review".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete review: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    recompute_destination_rating(&mut *tx, review.destination_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
