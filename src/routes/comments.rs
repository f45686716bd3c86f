//! Comment routes
//!
//! Comments hang off a profile; likes are kept as a relational set so the
//! count is always derived and concurrent likes from different users cannot
//! lose updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::AppState;
use crate::domain::comments::{
    sort_and_filter, CommentFilter, CommentResponse, CommentSort, CreateCommentRequest, UserRef,
};
use crate::domain::ids::parse_id;
use crate::domain::options::{is_valid_enneagram, is_valid_mbti, is_valid_zodiac, trim_or_null};
use crate::error::{ApiError, ApiResult};
use crate::routes::require_profile;

/// Database row for a comment joined with its like count and author
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    profile_id: Uuid,
    user_id: Option<Uuid>,
    title: String,
    body: String,
    mbti: Option<String>,
    enneagram: Option<String>,
    zodiac: Option<String>,
    like_count: i64,
    created_at: DateTime<Utc>,
    author_id: Option<Uuid>,
    author_name: Option<String>,
}

impl CommentRow {
    fn into_response(self, with_user: bool) -> CommentResponse {
        let user = with_user.then(|| match self.author_id {
            Some(id) => UserRef {
                id: id.to_string(),
                name: self.author_name.clone().unwrap_or_default(),
            },
            None => UserRef::unresolved(),
        });
        CommentResponse {
            id: self.id,
            profile_id: self.profile_id,
            user_id: self.user_id,
            user,
            title: self.title,
            body: self.body,
            mbti: self.mbti,
            enneagram: self.enneagram,
            zodiac: self.zodiac,
            like_count: self.like_count,
            created_at: self.created_at,
        }
    }
}

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.profile_id, c.user_id, c.title, c.body,
           c.mbti, c.enneagram, c.zodiac, c.created_at,
           COUNT(l.user_id) AS like_count,
           u.id AS author_id, u.name AS author_name
    FROM comments c
    LEFT JOIN comment_likes l ON l.comment_id = c.id
    LEFT JOIN users u ON u.id = c.user_id
"#;

async fn fetch_comment(db: &PgPool, comment_id: Uuid) -> Result<Option<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(&format!(
        "{COMMENT_SELECT} WHERE c.id = $1 GROUP BY c.id, u.id, u.name"
    ))
    .bind(comment_id)
    .fetch_optional(db)
    .await
}

fn validate_attribute_fields(req: &CreateCommentRequest) -> Result<(), ApiError> {
    if !is_valid_mbti(req.mbti.as_deref()) {
        return Err(ApiError::bad_request("invalid mbti value"));
    }
    if !is_valid_enneagram(req.enneagram.as_deref()) {
        return Err(ApiError::bad_request("invalid enneagram value"));
    }
    if !is_valid_zodiac(req.zodiac.as_deref()) {
        return Err(ApiError::bad_request("invalid zodiac value"));
    }
    Ok(())
}

/// POST /api/profiles/:profile_id/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile_id = require_profile(&state.db, &profile_id).await?;

    let user_id = parse_id(req.user_id.as_deref().unwrap_or(""))
        .ok_or_else(|| ApiError::bad_request("userId is required and must be a valid id"))?;
    let author: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;
    let (author_id, author_name) = author.ok_or_else(|| ApiError::bad_request("User not found"))?;

    let title = req.title.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    validate_attribute_fields(&req)?;

    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO comments (profile_id, user_id, title, body, mbti, enneagram, zodiac)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, profile_id, user_id, title, body, mbti, enneagram, zodiac, created_at,
                  0::bigint AS like_count,
                  NULL::uuid AS author_id, NULL::text AS author_name
        "#,
    )
    .bind(profile_id)
    .bind(user_id)
    .bind(&title)
    .bind(req.body.as_deref().unwrap_or("").trim())
    .bind(trim_or_null(req.mbti.as_deref()))
    .bind(trim_or_null(req.enneagram.as_deref()))
    .bind(trim_or_null(req.zodiac.as_deref()))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(comment_id = %row.id, profile_id = %profile_id, "Created comment");

    let mut comment = row.into_response(false);
    comment.user = Some(UserRef {
        id: author_id.to_string(),
        name: author_name,
    });
    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
}

/// GET /api/profiles/:profile_id/comments
///
/// Returns the entire filtered and sorted comment set for the profile. The
/// author name is joined in at read time, so a renamed user is reflected on
/// old comments.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Query(query): Query<ListCommentsQuery>,
) -> ApiResult<Json<CommentListResponse>> {
    let profile_id = require_profile(&state.db, &profile_id).await?;

    let sort = CommentSort::from_query(query.sort.as_deref());
    let filter = CommentFilter::from_query(query.filter.as_deref());

    let rows = sqlx::query_as::<_, CommentRow>(&format!(
        "{COMMENT_SELECT} WHERE c.profile_id = $1 GROUP BY c.id, u.id, u.name"
    ))
    .bind(profile_id)
    .fetch_all(&state.db)
    .await?;

    let comments = rows.into_iter().map(|r| r.into_response(true)).collect();
    Ok(Json(CommentListResponse {
        comments: sort_and_filter(comments, sort, filter),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeParams {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/profiles/:profile_id/comments/:comment_id/like
///
/// Adding a like the user already holds is a no-op, not an error.
pub async fn add_like(
    State(state): State<Arc<AppState>>,
    Path((profile_id, comment_id)): Path<(String, String)>,
    Query(query): Query<LikeParams>,
    body: Option<Json<LikeParams>>,
) -> ApiResult<Json<CommentResponse>> {
    let (comment_id, user_id) =
        resolve_like_target(&state.db, &profile_id, &comment_id, query, body).await?;

    sqlx::query("INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(comment_id)
        .bind(user_id)
        .execute(&state.db)
        .await?;

    liked_comment(&state.db, comment_id).await
}

/// DELETE /api/profiles/:profile_id/comments/:comment_id/like
///
/// Removing a like the user does not hold is likewise a no-op.
pub async fn remove_like(
    State(state): State<Arc<AppState>>,
    Path((profile_id, comment_id)): Path<(String, String)>,
    Query(query): Query<LikeParams>,
    body: Option<Json<LikeParams>>,
) -> ApiResult<Json<CommentResponse>> {
    let (comment_id, user_id) =
        resolve_like_target(&state.db, &profile_id, &comment_id, query, body).await?;

    sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
        .bind(comment_id)
        .bind(user_id)
        .execute(&state.db)
        .await?;

    liked_comment(&state.db, comment_id).await
}

/// Shared precondition chain for both like directions: parent profile first,
/// then id shape checks, then the profile-scoped comment lookup so a comment
/// cannot be liked through the wrong profile URL. The user id may arrive in
/// the JSON body or the query string.
async fn resolve_like_target(
    db: &PgPool,
    profile_id: &str,
    comment_id: &str,
    query: LikeParams,
    body: Option<Json<LikeParams>>,
) -> Result<(Uuid, Uuid), ApiError> {
    let profile_id = require_profile(db, profile_id).await?;

    let user_id_raw = body
        .and_then(|Json(b)| b.user_id)
        .or(query.user_id)
        .unwrap_or_default();
    let comment_id = parse_id(comment_id);
    let user_id = parse_id(&user_id_raw);
    let (comment_id, user_id) = match (comment_id, user_id) {
        (Some(c), Some(u)) => (c, u),
        _ => return Err(ApiError::bad_request("commentId and userId are required")),
    };

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND profile_id = $2)")
            .bind(comment_id)
            .bind(profile_id)
            .fetch_one(db)
            .await?;
    if !exists {
        return Err(ApiError::not_found("Comment not found"));
    }
    Ok((comment_id, user_id))
}

async fn liked_comment(db: &PgPool, comment_id: Uuid) -> ApiResult<Json<CommentResponse>> {
    let row = fetch_comment(db, comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    Ok(Json(row.into_response(false)))
}
