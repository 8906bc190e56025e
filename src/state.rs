//! Shared application state injected into handlers.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::application::services::UrlService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// The URL service over whichever storage backend was selected at startup.
pub type DynUrlService = UrlService<dyn LinkRepository, dyn ClickRepository>;

/// State cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<DynUrlService>,
    /// Producer side of the click queue consumed by the click worker.
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when resolving the client IP.
    pub behind_proxy: bool,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        url_service: Arc<DynUrlService>,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            url_service,
            click_sender,
            behind_proxy,
            started_at: Instant::now(),
        }
    }
}
