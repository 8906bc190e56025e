//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const URL_COLUMNS: &str =
    "id, original_url, short_code, custom_alias, created_at, expires_at, creator_ip";

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    custom_alias: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    creator_ip: Option<String>,
}

impl From<UrlRow> for ShortLink {
    fn from(row: UrlRow) -> Self {
        ShortLink {
            id: row.id,
            original_url: row.original_url,
            short_code: row.short_code,
            custom_alias: row.custom_alias,
            created_at: row.created_at,
            expires_at: row.expires_at,
            creator_ip: row.creator_ip,
        }
    }
}

/// PostgreSQL repository for short links.
///
/// Deletion sets `deleted_at`; the row keeps its `short_code` and
/// `custom_alias`, so the unique constraints continue to reserve them.
/// Codes replaced by an update stay reserved through `url_codes`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_live_by(&self, column: &str, value: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {URL_COLUMNS} FROM urls WHERE {column} = $1 AND deleted_at IS NULL"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortLink::from))
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            r#"
            INSERT INTO urls (original_url, short_code, custom_alias, expires_at, creator_ip)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {URL_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&new_link.original_url)
            .bind(&new_link.short_code)
            .bind(&new_link.custom_alias)
            .bind(new_link.expires_at)
            .bind(&new_link.creator_ip)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO url_codes (code, url_id) VALUES ($1, $2)")
            .bind(&row.short_code)
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        self.find_live_by("short_code", code).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {URL_COLUMNS} FROM urls WHERE id = $1 AND deleted_at IS NULL");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        self.find_live_by("custom_alias", alias).await
    }

    async fn update(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            r#"
            UPDATE urls
            SET original_url = $2, short_code = $3, custom_alias = $4, expires_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {URL_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;

        let Some(row) = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(link.id)
            .bind(&link.original_url)
            .bind(&link.short_code)
            .bind(&link.custom_alias)
            .bind(link.expires_at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Err(AppError::NotFound);
        };

        // A link may return to one of its own earlier codes, never to another link's.
        sqlx::query(
            "INSERT INTO url_codes (code, url_id) VALUES ($1, $2) ON CONFLICT (code) DO NOTHING",
        )
        .bind(&row.short_code)
        .bind(row.id)
        .execute(&mut *tx)
        .await?;

        let owner: i64 = sqlx::query_scalar("SELECT url_id FROM url_codes WHERE code = $1")
            .bind(&row.short_code)
            .fetch_one(&mut *tx)
            .await?;

        if owner != row.id {
            tx.rollback().await?;
            return Err(AppError::DuplicateCode);
        }

        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE urls SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
