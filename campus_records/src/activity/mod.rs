//! Activity feed: the server-authoritative log of account actions shown on
//! the admin dashboard and the activity view.

pub mod feed;
pub mod models;

pub use feed::{ActivityFeed, RECENT_LIMIT, format_timestamp};
pub use models::{ActivityKind, ActivityLogEntry};
