//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Input data for recording a click.
///
/// Click events are append-only; many may exist per link. Metadata fields
/// are `None` when the client did not send them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl NewClick {
    /// Builds a click, storing empty strings as absent.
    pub fn new(
        link_id: i64,
        clicked_at: DateTime<Utc>,
        referer: &str,
        user_agent: &str,
        ip: &str,
    ) -> Self {
        Self {
            link_id,
            clicked_at,
            referer: non_empty(referer),
            user_agent: non_empty(user_agent),
            ip: non_empty(ip),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Aggregated click analytics for one link.
///
/// The zero value (`click_count == 0`, no `last_click`) stands in when
/// statistics cannot be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClickStats {
    pub click_count: i64,
    pub last_click: Option<DateTime<Utc>>,
}
