//! Comment domain types and list aggregation
//!
//! Sorting and filtering operate on the full comment set for a profile after
//! it is materialized from the database with derived like counts. The set is
//! assumed small; there is no pagination or upper bound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request DTO for creating a comment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub mbti: Option<String>,
    #[serde(default)]
    pub enneagram: Option<String>,
    #[serde(default)]
    pub zodiac: Option<String>,
}

/// Denormalized author snapshot carried on comment responses. The empty-id,
/// empty-name form stands in for a user that can no longer be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    pub fn unresolved() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
        }
    }
}

/// Response DTO for a comment. `like_count` is always derived from the like
/// set, never stored independently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    pub title: String,
    pub body: String,
    pub mbti: Option<String>,
    pub enneagram: Option<String>,
    pub zodiac: Option<String>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Sort order for comment listings. Unknown values fall back to `Best`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSort {
    Best,
    Recent,
}

impl CommentSort {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("").to_lowercase().as_str() {
            "recent" => Self::Recent,
            _ => Self::Best,
        }
    }
}

/// Attribute filter for comment listings. Unknown values fall back to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentFilter {
    All,
    Mbti,
    Enneagram,
    Zodiac,
}

impl CommentFilter {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("").to_lowercase().as_str() {
            "mbti" => Self::Mbti,
            "enneagram" => Self::Enneagram,
            "zodiac" => Self::Zodiac,
            _ => Self::All,
        }
    }
}

fn has_value(field: &Option<String>) -> bool {
    matches!(field, Some(v) if !v.is_empty())
}

/// Applies the filter and sort to a materialized comment set.
///
/// `Best` orders by descending like count with descending creation time as
/// the tie-break; `Recent` orders by descending creation time alone. The
/// attribute filters keep only comments where the corresponding field is
/// non-null and non-empty.
pub fn sort_and_filter(
    mut comments: Vec<CommentResponse>,
    sort: CommentSort,
    filter: CommentFilter,
) -> Vec<CommentResponse> {
    comments.retain(|c| match filter {
        CommentFilter::All => true,
        CommentFilter::Mbti => has_value(&c.mbti),
        CommentFilter::Enneagram => has_value(&c.enneagram),
        CommentFilter::Zodiac => has_value(&c.zodiac),
    });
    match sort {
        CommentSort::Best => comments.sort_by(|a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        CommentSort::Recent => comments.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(likes: i64, ts: i64, mbti: Option<&str>) -> CommentResponse {
        CommentResponse {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            user: None,
            title: "t".to_string(),
            body: String::new(),
            mbti: mbti.map(str::to_string),
            enneagram: None,
            zodiac: None,
            like_count: likes,
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn best_orders_by_likes_then_recency() {
        let older_liked = comment(2, 100, None);
        let newest = comment(0, 300, None);
        let middle = comment(0, 200, None);
        let sorted = sort_and_filter(
            vec![newest.clone(), older_liked.clone(), middle.clone()],
            CommentSort::Best,
            CommentFilter::All,
        );
        assert_eq!(sorted[0].id, older_liked.id);
        assert_eq!(sorted[1].id, newest.id);
        assert_eq!(sorted[2].id, middle.id);
    }

    #[test]
    fn recent_ignores_like_count() {
        let liked = comment(5, 100, None);
        let newest = comment(0, 200, None);
        let sorted = sort_and_filter(
            vec![liked.clone(), newest.clone()],
            CommentSort::Recent,
            CommentFilter::All,
        );
        assert_eq!(sorted[0].id, newest.id);
        assert_eq!(sorted[1].id, liked.id);
    }

    #[test]
    fn mbti_filter_excludes_null_and_empty() {
        let with = comment(0, 100, Some("INTP"));
        let empty = comment(0, 200, Some(""));
        let none = comment(0, 300, None);
        let listed = sort_and_filter(
            vec![with.clone(), empty, none],
            CommentSort::Best,
            CommentFilter::Mbti,
        );
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, with.id);
    }

    #[test]
    fn query_parsing_falls_back_silently() {
        assert_eq!(CommentSort::from_query(Some("recent")), CommentSort::Recent);
        assert_eq!(CommentSort::from_query(Some("RECENT")), CommentSort::Recent);
        assert_eq!(CommentSort::from_query(Some("oldest")), CommentSort::Best);
        assert_eq!(CommentSort::from_query(None), CommentSort::Best);
        assert_eq!(
            CommentFilter::from_query(Some("zodiac")),
            CommentFilter::Zodiac
        );
        assert_eq!(CommentFilter::from_query(Some("bogus")), CommentFilter::All);
        assert_eq!(CommentFilter::from_query(None), CommentFilter::All);
    }
}
