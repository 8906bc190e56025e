//! In-process storage backend.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{ClickStats, NewClick, NewShortLink, ShortLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

struct StoredLink {
    link: ShortLink,
    deleted: bool,
}

#[derive(Default)]
struct StoreState {
    last_id: i64,
    links: BTreeMap<i64, StoredLink>,
    // Every code a link has ever had, including codes of deleted links and
    // codes replaced by an update. Entries are never removed.
    codes: HashMap<String, i64>,
    // Current aliases, including those of deleted links.
    aliases: HashMap<String, i64>,
    clicks: Vec<NewClick>,
}

impl StoreState {
    fn live(&self, id: i64) -> Option<&ShortLink> {
        self.links
            .get(&id)
            .filter(|stored| !stored.deleted)
            .map(|stored| &stored.link)
    }

    fn check_unique(
        &self,
        code: &str,
        alias: Option<&str>,
        owner: Option<i64>,
    ) -> Result<(), AppError> {
        let taken_by_other = |id: &i64| Some(*id) != owner;

        if self.codes.get(code).is_some_and(taken_by_other) {
            return Err(AppError::DuplicateCode);
        }

        if let Some(alias) = alias
            && self.aliases.get(alias).is_some_and(taken_by_other)
        {
            return Err(AppError::DuplicateAlias);
        }

        Ok(())
    }
}

/// Link and click storage held in process memory.
///
/// Implements both repository traits with the same uniqueness rules as the
/// PostgreSQL schema. Contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut state = self.state.write().await;
        state.check_unique(&new_link.short_code, new_link.custom_alias.as_deref(), None)?;

        state.last_id += 1;
        let id = state.last_id;
        let link = new_link.into_link(id, Utc::now());

        state.codes.insert(link.short_code.clone(), id);
        if let Some(alias) = &link.custom_alias {
            state.aliases.insert(alias.clone(), id);
        }
        state.links.insert(
            id,
            StoredLink {
                link: link.clone(),
                deleted: false,
            },
        );

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .codes
            .get(code)
            .and_then(|id| state.live(*id))
            .filter(|link| link.short_code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let state = self.state.read().await;
        Ok(state.live(id).cloned())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .aliases
            .get(alias)
            .and_then(|id| state.live(*id))
            .cloned())
    }

    async fn update(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        let mut state = self.state.write().await;

        let previous = state.live(link.id).cloned().ok_or(AppError::NotFound)?;
        state.check_unique(&link.short_code, link.custom_alias.as_deref(), Some(link.id))?;

        if let Some(alias) = &previous.custom_alias {
            state.aliases.remove(alias);
        }
        state.codes.insert(link.short_code.clone(), link.id);
        if let Some(alias) = &link.custom_alias {
            state.aliases.insert(alias.clone(), link.id);
        }

        // Identity and provenance are not updatable.
        let updated = ShortLink {
            created_at: previous.created_at,
            creator_ip: previous.creator_ip,
            ..link
        };
        if let Some(stored) = state.links.get_mut(&updated.id) {
            stored.link = updated.clone();
        }

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;

        match state.links.get_mut(&id) {
            Some(stored) if !stored.deleted => {
                stored.deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record_click(&self, click: NewClick) -> Result<(), AppError> {
        self.state.write().await.clicks.push(click);
        Ok(())
    }

    async fn stats_for_link(&self, link_id: i64) -> Result<ClickStats, AppError> {
        let state = self.state.read().await;

        Ok(state
            .clicks
            .iter()
            .filter(|click| click.link_id == link_id)
            .fold(ClickStats::default(), |stats, click| ClickStats {
                click_count: stats.click_count + 1,
                last_click: stats.last_click.max(Some(click.clicked_at)),
            }))
    }
}
