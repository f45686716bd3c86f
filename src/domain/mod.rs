//! Domain types and DTOs
//!
//! These types define the data structures for profile-board entities, plus the
//! pure validation and aggregation logic the HTTP handlers delegate to.

pub mod comments;
pub mod ids;
pub mod options;
pub mod profiles;
pub mod users;
pub mod votes;
