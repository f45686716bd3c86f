//! Page surface and profile creation
//!
//! One server-rendered profile page plus the landing redirect to the
//! earliest-created profile. Page-level not-found responses are plain text,
//! and a malformed id yields the same body as an absent one.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::ids::parse_id;
use crate::domain::profiles::{
    CreateProfileRequest, Profile, ProfileResponse, DEFAULT_IMAGE, SEED_PROFILE,
};
use crate::error::ApiResult;

const PROFILE_NOT_FOUND: &str = "Profile not found.";
const NO_PROFILES: &str = "No profiles found.";

const PROFILE_COLUMNS: &str = "id, name, description, mbti, enneagram, variant, tritype, \
     socionics, sloan, psyche, temperaments, image, created_at, updated_at";

/// GET / - redirect to the default (earliest-created) profile
pub async fn landing(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let first: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT id FROM profiles ORDER BY created_at ASC LIMIT 1")
            .fetch_optional(&state.db)
            .await?;

    Ok(match first {
        Some((id,)) => (
            StatusCode::FOUND,
            [(header::LOCATION, format!("/{id}"))],
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, NO_PROFILES).into_response(),
    })
}

/// GET /:id - render the profile page
pub async fn profile_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let Some(id) = parse_id(&id) else {
        return Ok((StatusCode::NOT_FOUND, PROFILE_NOT_FOUND).into_response());
    };

    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    Ok(match profile {
        Some(profile) => Html(render_profile_page(&profile)).into_response(),
        None => (StatusCode::NOT_FOUND, PROFILE_NOT_FOUND).into_response(),
    })
}

/// POST / - create a profile. The image is always the fixed default, whatever
/// the request says. A missing or empty body creates an all-defaults profile.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateProfileRequest>>,
) -> ApiResult<impl IntoResponse> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let profile = sqlx::query_as::<_, Profile>(&format!(
        "INSERT INTO profiles \
         (name, description, mbti, enneagram, variant, tritype, socionics, sloan, psyche, temperaments, image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(req.name.unwrap_or_default())
    .bind(req.description.unwrap_or_default())
    .bind(req.mbti.unwrap_or_default())
    .bind(req.enneagram.unwrap_or_default())
    .bind(req.variant.unwrap_or_default())
    .bind(req.tritype.unwrap_or(0))
    .bind(req.socionics.unwrap_or_default())
    .bind(req.sloan.unwrap_or_default())
    .bind(req.psyche.unwrap_or_default())
    .bind(req.temperaments.unwrap_or_default())
    .bind(DEFAULT_IMAGE)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(profile_id = %profile.id, "Created profile");

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

/// Inserts the default profile into an empty store. Runs once at startup and
/// is a no-op when any profile already exists.
pub async fn seed_default(db: &PgPool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO profiles \
         (name, description, mbti, enneagram, variant, tritype, socionics, sloan, psyche, temperaments, image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(SEED_PROFILE.name)
    .bind(SEED_PROFILE.description)
    .bind(SEED_PROFILE.mbti)
    .bind(SEED_PROFILE.enneagram)
    .bind(SEED_PROFILE.variant)
    .bind(SEED_PROFILE.tritype)
    .bind(SEED_PROFILE.socionics)
    .bind(SEED_PROFILE.sloan)
    .bind(SEED_PROFILE.psyche)
    .bind(SEED_PROFILE.temperaments)
    .bind(SEED_PROFILE.image)
    .execute(db)
    .await?;

    tracing::info!(name = SEED_PROFILE.name, "Seeded default profile");
    Ok(())
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn attribute_row(label: &str, value: &str) -> String {
    format!(
        "<tr><th>{}</th><td>{}</td></tr>",
        escape_html(label),
        escape_html(value)
    )
}

fn render_profile_page(profile: &Profile) -> String {
    let rows = [
        attribute_row("MBTI", &profile.mbti),
        attribute_row("Enneagram", &profile.enneagram),
        attribute_row("Variant", &profile.variant),
        attribute_row("Tritype", &profile.tritype.to_string()),
        attribute_row("Socionics", &profile.socionics),
        attribute_row("Sloan", &profile.sloan),
        attribute_row("Psyche", &profile.psyche),
        attribute_row("Temperaments", &profile.temperaments),
    ]
    .join("");

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
<title>{name} | Personaboard</title></head>\
<body>\
<img src=\"{image}\" alt=\"{name}\">\
<h1>{name}</h1>\
<p>{description}</p>\
<table>{rows}</table>\
</body></html>",
        name = escape_html(&profile.name),
        image = escape_html(&profile.image),
        description = escape_html(&profile.description),
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            name: "A Martinez".to_string(),
            description: "Adolph Larrue Martinez III.".to_string(),
            mbti: "ISFJ".to_string(),
            enneagram: "9w3".to_string(),
            variant: "sp/so".to_string(),
            tritype: 725,
            socionics: "SEE".to_string(),
            sloan: "RCOEN".to_string(),
            psyche: "FEVL".to_string(),
            temperaments: String::new(),
            image: DEFAULT_IMAGE.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rendered_page_carries_profile_fields() {
        let html = render_profile_page(&profile());
        assert!(html.contains("<h1>A Martinez</h1>"));
        assert!(html.contains("ISFJ"));
        assert!(html.contains("9w3"));
        assert!(html.contains("/static/space.png"));
    }

    #[test]
    fn rendered_page_escapes_markup() {
        let mut p = profile();
        p.name = "<script>x</script>".to_string();
        let html = render_profile_page(&p);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}

#[cfg(test)]
mod db_tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::routes::test_router;

    #[sqlx::test]
    async fn create_profile_without_body_uses_defaults(pool: PgPool) {
        let app = test_router(pool);

        let res = app
            .oneshot(Request::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let profile: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(profile["image"], "/static/space.png");
        assert_eq!(profile["tritype"], 0);
        assert_eq!(profile["name"], "");
    }
}
