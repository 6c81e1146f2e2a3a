// src/handlers/admin.rs
//
// Back-office user management. All routes here sit behind the auth + admin
// middleware pair.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::User,
    utils::auth::{Claims, hash_password},
};

const ROLES: [&str; 2] = ["user", "admin"];
const STATUSES: [&str; 3] = ["active", "inactive", "suspended"];

/// Lists all users in the system.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id DESC")
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(users))
}

/// DTO for an admin creating a user (can specify role).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: String,
}

/// Creates a new user with a specific role.
pub async fn create_user(
    State(pool): State<SqlitePool>,
    Json(payload): Json<AdminCreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password, role, status)
        VALUES (?, ?, ?, ?, 'active')
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(hashed_password)
    .bind(&payload.role)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!("Email '{}' is already registered", payload.email))
        } else {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// DTO for updating a user. Fields are optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Updates user information, including role and account status.
pub async fn update_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Check existence
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if let Some(role) = &payload.role {
        if !ROLES.contains(&role.as_str()) {
            return Err(AppError::BadRequest(format!("Unknown role '{}'", role)));
        }
    }

    if let Some(status) = &payload.status {
        if !STATUSES.contains(&status.as_str()) {
            return Err(AppError::BadRequest(format!("Unknown status '{}'", status)));
        }
    }

    // Perform updates sequentially if fields are present
    if let Some(name) = payload.name {
        sqlx::query("UPDATE users SET name = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(email) = payload.email {
        sqlx::query("UPDATE users SET email = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(email)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    AppError::Conflict("Email is already registered".to_string())
                } else {
                    AppError::InternalServerError(e.to_string())
                }
            })?;
    }

    if let Some(password) = payload.password {
        let hashed = hash_password(&password)?;
        sqlx::query("UPDATE users SET password = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(hashed)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(role) = payload.role {
        sqlx::query("UPDATE users SET role = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(status) = payload.status {
        sqlx::query("UPDATE users SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    Ok(StatusCode::OK)
}

/// Deletes a user by ID. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.user_id() {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if ROLES.contains(&role) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unknown_role"))
    }
}
