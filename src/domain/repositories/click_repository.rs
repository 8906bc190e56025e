//! Repository trait for click analytics.

use crate::domain::entities::{ClickStats, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for click tracking and statistics.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on database errors.
    async fn record_click(&self, click: NewClick) -> Result<(), AppError>;

    /// Aggregates clicks for a link: total count and most recent click.
    ///
    /// A link without clicks yields [`ClickStats::default`].
    async fn stats_for_link(&self, link_id: i64) -> Result<ClickStats, AppError>;
}
