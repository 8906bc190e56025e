//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ClickStats, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct StatsRow {
    click_count: i64,
    last_click: Option<DateTime<Utc>>,
}

/// PostgreSQL repository for click events.
///
/// Clicks reference `urls.id` and survive soft deletion of their link.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, click: NewClick) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO url_clicks (url_id, clicked_at, referer, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(click.link_id)
        .bind(click.clicked_at)
        .bind(&click.referer)
        .bind(&click.user_agent)
        .bind(&click.ip)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn stats_for_link(&self, link_id: i64) -> Result<ClickStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT COUNT(*) AS click_count, MAX(clicked_at) AS last_click
            FROM url_clicks
            WHERE url_id = $1
            "#,
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(ClickStats {
            click_count: row.click_count,
            last_click: row.last_click,
        })
    }
}
