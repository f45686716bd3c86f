//! Profile domain types
//!
//! Profiles are the root aggregate; comments and votes are only reachable
//! through a profile-scoped path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image path assigned to every profile regardless of request input.
pub const DEFAULT_IMAGE: &str = "/static/space.png";

/// Profile entity as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub mbti: String,
    pub enneagram: String,
    pub variant: String,
    pub tritype: i32,
    pub socionics: String,
    pub sloan: String,
    pub psyche: String,
    pub temperaments: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a profile. Every field is optional; absent text
/// fields default to empty and `image` is ignored in favor of the fixed
/// default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mbti: Option<String>,
    #[serde(default)]
    pub enneagram: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub tritype: Option<i32>,
    #[serde(default)]
    pub socionics: Option<String>,
    #[serde(default)]
    pub sloan: Option<String>,
    #[serde(default)]
    pub psyche: Option<String>,
    #[serde(default)]
    pub temperaments: Option<String>,
}

/// Response DTO for a profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub mbti: String,
    pub enneagram: String,
    pub variant: String,
    pub tritype: i32,
    pub socionics: String,
    pub sloan: String,
    pub psyche: String,
    pub temperaments: String,
    pub image: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            mbti: p.mbti,
            enneagram: p.enneagram,
            variant: p.variant,
            tritype: p.tritype,
            socionics: p.socionics,
            sloan: p.sloan,
            psyche: p.psyche,
            temperaments: p.temperaments,
            image: p.image,
        }
    }
}

/// Field values for the profile seeded into an empty store at first startup.
/// These literals are load-bearing for compatibility with existing data; do
/// not reword them.
pub struct SeedProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub mbti: &'static str,
    pub enneagram: &'static str,
    pub variant: &'static str,
    pub tritype: i32,
    pub socionics: &'static str,
    pub sloan: &'static str,
    pub psyche: &'static str,
    pub temperaments: &'static str,
    pub image: &'static str,
}

pub const SEED_PROFILE: SeedProfile = SeedProfile {
    name: "A Martinez",
    description: "Adolph Larrue Martinez III.",
    mbti: "ISFJ",
    enneagram: "9w3",
    variant: "sp/so",
    tritype: 725,
    socionics: "SEE",
    sloan: "RCOEN",
    psyche: "FEVL",
    temperaments: "",
    image: DEFAULT_IMAGE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_profile_literals() {
        assert_eq!(SEED_PROFILE.name, "A Martinez");
        assert_eq!(SEED_PROFILE.mbti, "ISFJ");
        assert_eq!(SEED_PROFILE.enneagram, "9w3");
        assert_eq!(SEED_PROFILE.tritype, 725);
        assert_eq!(SEED_PROFILE.image, "/static/space.png");
    }
}
