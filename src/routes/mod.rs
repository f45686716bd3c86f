pub mod comments;
pub mod health;
pub mod pages;
pub mod users;
pub mod votes;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::AppState;
use crate::domain::ids::parse_id;
use crate::error::ApiError;

/// Build the JSON API router (mounted under /api)
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Users
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        // Comments (nested under profiles)
        .route(
            "/profiles/:profile_id/comments",
            post(comments::create_comment).get(comments::list_comments),
        )
        .route(
            "/profiles/:profile_id/comments/:comment_id/like",
            post(comments::add_like).delete(comments::remove_like),
        )
        // Votes (nested under profiles)
        .route(
            "/profiles/:profile_id/votes",
            post(votes::upsert_vote).get(votes::get_tally),
        )
        .route("/profiles/:profile_id/votes/me", get(votes::get_my_vote))
}

/// Build the page-surface router (mounted at the root)
pub fn page_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(pages::landing).post(pages::create_profile))
        .route("/:id", get(pages::profile_page))
}

/// Resolves the path-scoped parent profile before any body validation runs,
/// so error precedence stays deterministic. A malformed id and an absent
/// profile are indistinguishable to the caller.
pub(crate) async fn require_profile(db: &PgPool, profile_id: &str) -> Result<Uuid, ApiError> {
    let id = parse_id(profile_id).ok_or_else(|| ApiError::not_found("Profile not found"))?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
        .bind(id)
        .fetch_one(db)
        .await?;
    if !exists {
        return Err(ApiError::not_found("Profile not found"));
    }
    Ok(id)
}

/// Assembles the full application router over the given pool for tests.
#[cfg(test)]
pub(crate) fn test_router(pool: PgPool) -> Router {
    use crate::app::{create_app, AppState};
    use crate::config::{Environment, Settings};

    let settings = Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        database_url: String::new(),
        database_max_connections: 1,
        cors_allow_origins: Vec::new(),
    };
    create_app(AppState::new(pool, settings))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::test_router;

    // Lazy pool: these requests all fail validation before any query runs,
    // so no live database is needed.
    fn test_app() -> axum::Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/personaboard_test")
            .expect("lazy pool");
        test_router(pool)
    }

    #[tokio::test]
    async fn malformed_profile_page_id_is_not_found() {
        let res = test_app()
            .oneshot(
                Request::get("/definitely-not-an-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Profile not found.");
    }

    #[tokio::test]
    async fn malformed_user_id_is_not_found() {
        let res = test_app()
            .oneshot(
                Request::get("/api/users/123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_user_name_is_rejected_before_any_write() {
        let res = test_app()
            .oneshot(
                Request::post("/api/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "name": "   " }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_profile_id_on_comment_list_is_not_found() {
        let res = test_app()
            .oneshot(
                Request::get("/api/profiles/not-a-uuid/comments?sort=best")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
