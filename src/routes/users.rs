//! User routes
//!
//! Users are created by display name only and are immutable afterwards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::ids::parse_id;
use crate::domain::users::{CreateUserRequest, UserResponse};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = req.name.as_deref().unwrap_or("").trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
    )
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %row.id, "Created user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(row))))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("User not found"))?;

    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(row)))
}
