//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Lookups only see live links: a deleted link is invisible to every `find_*`
/// method, but its code and alias stay reserved.
///
/// Uniqueness of `short_code` and `custom_alias` must be enforced here, not
/// only checked by callers. Concurrent creators race between check and
/// insert, so the constraint is the authoritative guard.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a link, returning it with the storage-assigned `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code is taken.
    /// Returns [`AppError::DuplicateAlias`] if the custom alias is taken.
    /// Returns [`AppError::StorageFailure`] on database errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a live link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a live link by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Finds a live link by its custom alias.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError>;

    /// Replaces the mutable fields of the link with `link.id`.
    ///
    /// The whole record is written; callers merge changes first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link has this id.
    /// Returns [`AppError::DuplicateCode`] / [`AppError::DuplicateAlias`] on
    /// uniqueness violations.
    async fn update(&self, link: ShortLink) -> Result<ShortLink, AppError>;

    /// Deletes a link by id.
    ///
    /// Returns `Ok(true)` if a live link was deleted, `Ok(false)` if none matched.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Verifies the backing store is reachable.
    async fn health_check(&self) -> Result<(), AppError>;
}
