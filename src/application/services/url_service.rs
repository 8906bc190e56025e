//! Short URL allocation and resolution service.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{ClickStats, NewClick, NewShortLink, ShortLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{
    CodeGenerator, MAX_ALIAS_LENGTH, is_valid_alias, is_valid_code,
};
use crate::utils::url_validator::validate_url;

/// Generated-code attempts before giving up with [`AppError::CodeSpaceExhausted`].
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Settings the service reads from configuration.
#[derive(Debug, Clone)]
pub struct UrlServiceSettings {
    /// Public base URL short codes are appended to.
    pub base_url: String,
    /// Length of generated codes; out-of-range values fall back to 6.
    pub code_length: i64,
    /// Expiry applied when a request sets none. `0` means links never expire.
    pub default_expiry_days: i64,
}

/// A request to shorten a URL.
#[derive(Debug, Clone, Default)]
pub struct CreateUrl {
    pub original_url: String,
    /// Empty or `None` means "generate a code".
    pub custom_alias: Option<String>,
    /// Days until expiry. Non-positive values fall back to the default.
    pub expires_in_days: Option<i64>,
}

/// A partial update of an existing link. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UrlUpdate {
    /// New destination; an empty string is ignored.
    pub original_url: Option<String>,
    /// `Some("")` clears the alias; a non-empty alias also becomes the code.
    pub custom_alias: Option<String>,
    /// `0` clears the expiry, a negative value expires the link now,
    /// a positive value expires it that many days from now.
    pub expires_in_days: Option<i64>,
}

/// A freshly created link together with its public short URL.
#[derive(Debug, Clone)]
pub struct CreatedUrl {
    pub short_url: String,
    pub link: ShortLink,
}

/// A link with its click analytics.
#[derive(Debug, Clone)]
pub struct UrlDetails {
    pub link: ShortLink,
    pub stats: ClickStats,
}

/// Service for creating, resolving and maintaining short links.
///
/// Owns the allocation rules: URL validation, alias vs. generated code,
/// collision retries and expiry. Persistence is delegated to the repositories,
/// whose uniqueness constraints are authoritative under concurrent creation;
/// the lookups done here only short-circuit the common case.
pub struct UrlService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    links: Arc<L>,
    clicks: Arc<C>,
    generator: CodeGenerator,
    settings: UrlServiceSettings,
}

impl<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> UrlService<L, C> {
    /// Creates a new URL service.
    pub fn new(
        links: Arc<L>,
        clicks: Arc<C>,
        generator: CodeGenerator,
        settings: UrlServiceSettings,
    ) -> Self {
        Self {
            links,
            clicks,
            generator,
            settings,
        }
    }

    /// Creates a short link.
    ///
    /// # Code Resolution
    ///
    /// - A non-empty `custom_alias` is validated and used as the code
    /// - Otherwise a random code is generated, retrying on collision up to
    ///   [`MAX_CODE_ATTEMPTS`] times
    ///
    /// # Expiry
    ///
    /// A positive `expires_in_days` wins, then the configured default; with
    /// neither the link never expires.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL is not absolute HTTP(S)
    /// - [`AppError::InvalidAlias`] / [`AppError::AliasTooLong`] for bad aliases
    /// - [`AppError::DuplicateAlias`] if the alias is taken
    /// - [`AppError::CodeSpaceExhausted`] if every generated code collided
    /// - [`AppError::RandomnessFailure`] if the generator fails
    pub async fn create_short_url(
        &self,
        request: CreateUrl,
        creator_ip: &str,
    ) -> Result<CreatedUrl, AppError> {
        validate_url(&request.original_url).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        let alias = request.custom_alias.filter(|a| !a.is_empty());
        if let Some(alias) = &alias {
            check_alias(alias)?;

            if self.links.find_by_alias(alias).await?.is_some() {
                return Err(AppError::DuplicateAlias);
            }
        }

        let expires_at = self.creation_expiry(request.expires_in_days, Utc::now())?;
        let creator_ip = (!creator_ip.is_empty()).then(|| creator_ip.to_string());

        let link = match alias {
            Some(alias) => {
                let new_link = NewShortLink {
                    original_url: request.original_url,
                    short_code: alias.clone(),
                    custom_alias: Some(alias),
                    expires_at,
                    creator_ip,
                };

                self.links
                    .insert(new_link)
                    .await
                    .map_err(alias_conflict)?
            }
            None => {
                self.insert_with_generated_code(request.original_url, expires_at, creator_ip)
                    .await?
            }
        };

        tracing::info!(id = link.id, code = %link.short_code, "Short link created");

        Ok(CreatedUrl {
            short_url: self.short_url(&link.short_code),
            link,
        })
    }

    /// Resolves a short code to its link.
    ///
    /// Expiry is checked against the current time on every call.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidShortCode`] if `code` has characters outside the alphabet
    /// - [`AppError::NotFound`] if no live link has this code
    /// - [`AppError::Expired`] if the link's expiry has passed
    pub async fn get_url(&self, code: &str) -> Result<ShortLink, AppError> {
        if !is_valid_code(code) {
            return Err(AppError::InvalidShortCode);
        }

        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or(AppError::NotFound)?;

        if link.is_expired_at(Utc::now()) {
            return Err(AppError::Expired);
        }

        Ok(link)
    }

    /// Retrieves a link and its click statistics by id.
    ///
    /// Statistics are best-effort: if they cannot be loaded the call still
    /// succeeds with zeroed stats.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link has this id.
    pub async fn get_url_by_id(&self, id: i64) -> Result<UrlDetails, AppError> {
        let link = self
            .links
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        let stats = match self.clicks.stats_for_link(id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to load click stats, returning zero stats");
                ClickStats::default()
            }
        };

        Ok(UrlDetails { link, stats })
    }

    /// Partially updates a link and writes back the merged record.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no live link has this id
    /// - [`AppError::InvalidUrl`] for a bad replacement URL
    /// - [`AppError::InvalidAlias`] / [`AppError::AliasTooLong`] for bad aliases
    /// - [`AppError::DuplicateAlias`] if another link owns the alias
    pub async fn update_url(&self, id: i64, update: UrlUpdate) -> Result<ShortLink, AppError> {
        let mut link = self
            .links
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(url) = update.original_url.filter(|u| !u.is_empty()) {
            validate_url(&url).map_err(|e| AppError::InvalidUrl(e.to_string()))?;
            link.original_url = url;
        }

        match update.custom_alias {
            Some(alias) if alias.is_empty() => link.custom_alias = None,
            Some(alias) => {
                check_alias(&alias)?;
                self.ensure_alias_free_for(&alias, link.id).await?;
                link.short_code = alias.clone();
                link.custom_alias = Some(alias);
            }
            None => {}
        }

        if let Some(days) = update.expires_in_days {
            let now = Utc::now();
            link.expires_at = match days.cmp(&0) {
                Ordering::Equal => None,
                Ordering::Less => Some(now),
                Ordering::Greater => Some(add_days(now, days)?),
            };
        }

        let link = self.links.update(link).await.map_err(alias_conflict)?;
        tracing::info!(id, code = %link.short_code, "Short link updated");

        Ok(link)
    }

    /// Deletes a link by id.
    ///
    /// The code and alias stay reserved and click history is kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link has this id.
    pub async fn delete_url(&self, id: i64) -> Result<(), AppError> {
        if !self.links.delete(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(id, "Short link deleted");
        Ok(())
    }

    /// Appends a click for `link_id`, timestamped now.
    ///
    /// Empty strings are stored as absent values.
    pub async fn record_click(
        &self,
        link_id: i64,
        referer: &str,
        user_agent: &str,
        ip: &str,
    ) -> Result<(), AppError> {
        let click = NewClick::new(link_id, Utc::now(), referer, user_agent, ip);
        self.clicks.record_click(click).await
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    /// Checks that the backing store is reachable.
    pub async fn storage_health(&self) -> Result<(), AppError> {
        self.links.health_check().await
    }

    async fn insert_with_generated_code(
        &self,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
        creator_ip: Option<String>,
    ) -> Result<ShortLink, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.generator.generate(self.settings.code_length)?;

            if self.links.find_by_code(&code).await?.is_some() {
                tracing::debug!(attempt, "Generated code already in use");
                continue;
            }

            let new_link = NewShortLink {
                original_url: original_url.clone(),
                short_code: code,
                custom_alias: None,
                expires_at,
                creator_ip: creator_ip.clone(),
            };

            match self.links.insert(new_link).await {
                Err(AppError::DuplicateCode) => {
                    tracing::debug!(attempt, "Generated code taken concurrently");
                }
                result => return result,
            }
        }

        tracing::warn!(
            attempts = MAX_CODE_ATTEMPTS,
            "Could not find a free short code"
        );
        Err(AppError::CodeSpaceExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Fails with [`AppError::DuplicateAlias`] if a link other than `id`
    /// owns `alias` as its alias or its code.
    async fn ensure_alias_free_for(&self, alias: &str, id: i64) -> Result<(), AppError> {
        let by_alias = self.links.find_by_alias(alias).await?;
        if by_alias.is_some_and(|other| other.id != id) {
            return Err(AppError::DuplicateAlias);
        }

        let by_code = self.links.find_by_code(alias).await?;
        if by_code.is_some_and(|other| other.id != id) {
            return Err(AppError::DuplicateAlias);
        }

        Ok(())
    }

    fn creation_expiry(
        &self,
        requested_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        let days = match requested_days {
            Some(days) if days > 0 => days,
            _ if self.settings.default_expiry_days > 0 => self.settings.default_expiry_days,
            _ => return Ok(None),
        };

        add_days(now, days).map(Some)
    }
}

/// Validates an alias against the single storage-driven rule.
fn check_alias(alias: &str) -> Result<(), AppError> {
    if is_valid_alias(alias) {
        return Ok(());
    }

    if alias.len() > MAX_ALIAS_LENGTH && alias.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AppError::AliasTooLong {
            max: MAX_ALIAS_LENGTH,
        });
    }

    Err(AppError::InvalidAlias)
}

/// An alias that collides with an existing code is reported as an alias conflict.
fn alias_conflict(e: AppError) -> AppError {
    match e {
        AppError::DuplicateCode => AppError::DuplicateAlias,
        other => other,
    }
}

fn add_days(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, AppError> {
    Duration::try_days(days)
        .and_then(|d| now.checked_add_signed(d))
        .ok_or(AppError::InvalidExpiry { days })
}
