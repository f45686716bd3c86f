//! Vote domain types and tally aggregation
//!
//! A profile holds at most one vote per user; the three attribute guesses are
//! independently optional. The tally counts non-null values per attribute
//! kind over every vote for a profile.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request DTO for submitting (upserting) a vote
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertVoteRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub mbti: Option<String>,
    #[serde(default)]
    pub enneagram: Option<String>,
    #[serde(default)]
    pub zodiac: Option<String>,
}

/// Response DTO for a stored vote
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub zodiac: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for a user's own vote. "No vote yet" is the all-null body,
/// not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MyVoteResponse {
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub zodiac: Option<String>,
}

/// The attribute guesses of a single vote, as fed into the tally.
#[derive(Debug, Clone, Default)]
pub struct VoteFields {
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub zodiac: Option<String>,
}

/// Aggregated tally for a profile: the winning value per attribute kind plus
/// the full value-to-count maps for rendering a leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct TallyResponse {
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub zodiac: Option<String>,
    pub counts: TallyCounts,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TallyCounts {
    pub mbti: BTreeMap<String, u64>,
    pub enneagram: BTreeMap<String, u64>,
    pub zodiac: BTreeMap<String, u64>,
}

/// Ties are broken toward the lexicographically smallest value so the result
/// does not depend on row order.
fn top(counts: &BTreeMap<String, u64>) -> Option<String> {
    let mut winner: Option<(&String, u64)> = None;
    for (value, &count) in counts {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((value, count)),
        }
    }
    winner.map(|(value, _)| value.clone())
}

/// Computes the full tally over every vote for a profile.
pub fn tally(votes: &[VoteFields]) -> TallyResponse {
    let mut counts = TallyCounts::default();
    for vote in votes {
        if let Some(mbti) = &vote.mbti {
            *counts.mbti.entry(mbti.clone()).or_insert(0) += 1;
        }
        if let Some(enneagram) = &vote.enneagram {
            *counts.enneagram.entry(enneagram.clone()).or_insert(0) += 1;
        }
        if let Some(zodiac) = &vote.zodiac {
            *counts.zodiac.entry(zodiac.clone()).or_insert(0) += 1;
        }
    }
    TallyResponse {
        mbti: top(&counts.mbti),
        enneagram: top(&counts.enneagram),
        zodiac: top(&counts.zodiac),
        counts,
    }
}
