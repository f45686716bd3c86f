//! Record identifier parsing
//!
//! Every lookup-by-reference goes through `parse_id` first so an obviously
//! malformed id never reaches the database, and "malformed" and "absent" are
//! indistinguishable to callers that map both to not-found.

use uuid::Uuid;

/// Returns the parsed id, or `None` for empty or malformed input. Never
/// panics on arbitrary input.
pub fn parse_id(value: &str) -> Option<Uuid> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Uuid::parse_str(value).ok()
}
