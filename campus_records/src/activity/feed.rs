//! Ordered, read-only view over activity log entries.

use chrono::{DateTime, Local, Utc};

use super::models::{ActivityKind, ActivityLogEntry};

/// Number of entries in the dashboard's "Recent Activity" panel.
pub const RECENT_LIMIT: usize = 5;

/// Activity entries, newest first
#[derive(Debug, Clone, Default)]
pub struct ActivityFeed {
    entries: Vec<ActivityLogEntry>,
}

impl ActivityFeed {
    /// Build a feed from entries in server order.
    ///
    /// Server order is kept when it is already newest-first. Otherwise the
    /// entries are sorted by descending timestamp; the sort is stable, so
    /// entries sharing a timestamp keep their server order.
    pub fn new(mut entries: Vec<ActivityLogEntry>) -> Self {
        if !is_newest_first(&entries) {
            log::debug!("Activity log arrived out of order, sorting {} entries", entries.len());
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        Self { entries }
    }

    /// The most recent [`RECENT_LIMIT`] entries
    pub fn recent(&self) -> &[ActivityLogEntry] {
        &self.entries[..self.entries.len().min(RECENT_LIMIT)]
    }

    /// Every entry
    pub fn all(&self) -> &[ActivityLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: ActivityKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

fn is_newest_first(entries: &[ActivityLogEntry]) -> bool {
    entries.windows(2).all(|w| w[0].timestamp >= w[1].timestamp)
}

/// Render a timestamp in the viewer's local time.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
