//! Short link entity representing a code-to-URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its resolvable code.
///
/// `short_code` is either generated or equal to `custom_alias` when the link
/// was created (or updated) with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub creator_ip: Option<String>,
}

impl ShortLink {
    /// Returns true if the link has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for creating a new link.
///
/// `id` and `created_at` are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub creator_ip: Option<String>,
}

impl NewShortLink {
    /// Materializes the stored record once storage has assigned its identity.
    pub fn into_link(self, id: i64, created_at: DateTime<Utc>) -> ShortLink {
        ShortLink {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            custom_alias: self.custom_alias,
            created_at,
            expires_at: self.expires_at,
            creator_ip: self.creator_ip,
        }
    }
}
