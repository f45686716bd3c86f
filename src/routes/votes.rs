//! Vote routes
//!
//! One vote row per (profile, user), written with an upsert that replaces the
//! full optional-field set. The uniqueness constraint makes concurrent
//! submissions for the same pair serialize to a single row.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::AppState;
use crate::domain::ids::parse_id;
use crate::domain::options::{is_valid_enneagram, is_valid_mbti, is_valid_zodiac, trim_or_null};
use crate::domain::votes::{tally, MyVoteResponse, TallyResponse, UpsertVoteRequest, VoteFields, VoteResponse};
use crate::error::{ApiError, ApiResult};
use crate::routes::require_profile;

#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    id: Uuid,
    profile_id: Uuid,
    user_id: Uuid,
    mbti: Option<String>,
    enneagram: Option<String>,
    zodiac: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VoteRow> for VoteResponse {
    fn from(row: VoteRow) -> Self {
        Self {
            id: row.id,
            profile_id: row.profile_id,
            user_id: row.user_id,
            mbti: row.mbti,
            enneagram: row.enneagram,
            zodiac: row.zodiac,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// POST /api/profiles/:profile_id/votes
///
/// A repeat submission overwrites all three attribute fields; a field absent
/// from the request becomes NULL rather than retaining its previous value.
/// The voting user's existence is not verified, only the id shape.
pub async fn upsert_vote(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(req): Json<UpsertVoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let profile_id = require_profile(&state.db, &profile_id).await?;

    let user_id = parse_id(req.user_id.as_deref().unwrap_or(""))
        .ok_or_else(|| ApiError::bad_request("userId is required and must be a valid id"))?;
    if !is_valid_mbti(req.mbti.as_deref()) {
        return Err(ApiError::bad_request("invalid mbti value"));
    }
    if !is_valid_enneagram(req.enneagram.as_deref()) {
        return Err(ApiError::bad_request("invalid enneagram value"));
    }
    if !is_valid_zodiac(req.zodiac.as_deref()) {
        return Err(ApiError::bad_request("invalid zodiac value"));
    }

    let row = sqlx::query_as::<_, VoteRow>(
        r#"
        INSERT INTO votes (profile_id, user_id, mbti, enneagram, zodiac)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (profile_id, user_id) DO UPDATE
        SET mbti = EXCLUDED.mbti,
            enneagram = EXCLUDED.enneagram,
            zodiac = EXCLUDED.zodiac,
            updated_at = now()
        RETURNING id, profile_id, user_id, mbti, enneagram, zodiac, created_at, updated_at
        "#,
    )
    .bind(profile_id)
    .bind(user_id)
    .bind(trim_or_null(req.mbti.as_deref()))
    .bind(trim_or_null(req.enneagram.as_deref()))
    .bind(trim_or_null(req.zodiac.as_deref()))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(profile_id = %profile_id, user_id = %user_id, "Recorded vote");

    Ok(Json(VoteResponse::from(row)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyVoteQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// GET /api/profiles/:profile_id/votes/me
pub async fn get_my_vote(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Query(query): Query<MyVoteQuery>,
) -> ApiResult<Json<MyVoteResponse>> {
    let profile_id = require_profile(&state.db, &profile_id).await?;

    let user_id = parse_id(query.user_id.as_deref().unwrap_or(""))
        .ok_or_else(|| ApiError::bad_request("userId query is required"))?;

    // No vote yet is a representable state, not a 404.
    let fields: Option<(Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT mbti, enneagram, zodiac FROM votes WHERE profile_id = $1 AND user_id = $2",
    )
    .bind(profile_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    let (mbti, enneagram, zodiac) = fields.unwrap_or_default();
    Ok(Json(MyVoteResponse {
        mbti,
        enneagram,
        zodiac,
    }))
}

/// GET /api/profiles/:profile_id/votes
pub async fn get_tally(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<TallyResponse>> {
    let profile_id = require_profile(&state.db, &profile_id).await?;

    let votes: Vec<(Option<String>, Option<String>, Option<String>)> =
        sqlx::query_as("SELECT mbti, enneagram, zodiac FROM votes WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_all(&state.db)
            .await?;

    let fields: Vec<VoteFields> = votes
        .into_iter()
        .map(|(mbti, enneagram, zodiac)| VoteFields {
            mbti,
            enneagram,
            zodiac,
        })
        .collect();

    Ok(Json(tally(&fields)))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::routes::test_router;

    async fn seed_profile(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO profiles (name, description) VALUES ('Seed', 'Seeded for tests') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn submit_vote(
        app: &axum::Router,
        profile_id: Uuid,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let res = app
            .clone()
            .oneshot(
                Request::post(format!("/api/profiles/{profile_id}/votes"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[sqlx::test]
    async fn repeat_vote_keeps_one_row_and_replaces_all_fields(pool: PgPool) {
        let profile_id = seed_profile(&pool).await;
        let user_id = Uuid::new_v4();
        let app = test_router(pool.clone());

        let (status, _) = submit_vote(
            &app,
            profile_id,
            serde_json::json!({ "userId": user_id, "mbti": "INTP", "enneagram": "5w4" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // The second submission omits enneagram; it must not be retained.
        let (status, vote) = submit_vote(
            &app,
            profile_id,
            serde_json::json!({ "userId": user_id, "mbti": "INTJ" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vote["mbti"], "INTJ");
        assert!(vote["enneagram"].is_null());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let (mbti, enneagram): (Option<String>, Option<String>) = sqlx::query_as(
            "SELECT mbti, enneagram FROM votes WHERE profile_id = $1 AND user_id = $2",
        )
        .bind(profile_id)
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(mbti.as_deref(), Some("INTJ"));
        assert_eq!(enneagram, None);
    }

    #[sqlx::test]
    async fn tally_counts_votes_across_users(pool: PgPool) {
        let profile_id = seed_profile(&pool).await;
        let app = test_router(pool.clone());

        for mbti in ["INTP", "INTP", "INTJ"] {
            let (status, _) = submit_vote(
                &app,
                profile_id,
                serde_json::json!({ "userId": Uuid::new_v4(), "mbti": mbti }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let res = app
            .oneshot(
                Request::get(format!("/api/profiles/{profile_id}/votes"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let tally: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tally["mbti"], "INTP");
        assert_eq!(tally["counts"]["mbti"]["INTP"], 2);
        assert_eq!(tally["counts"]["mbti"]["INTJ"], 1);
    }
}
