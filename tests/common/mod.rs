#![allow(dead_code)]

use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use serde_json::{Value, json};
use snipurl::application::services::{UrlService, UrlServiceSettings};
use snipurl::domain::click_event::ClickEvent;
use snipurl::domain::repositories::{ClickRepository, LinkRepository};
use snipurl::infrastructure::persistence::InMemoryStore;
use snipurl::routes::router;
use snipurl::state::{AppState, DynUrlService};
use snipurl::utils::code_generator::{CodeGenerator, SeededRandom};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://sho.rt";
pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// A router over in-memory storage with the click queue exposed.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub service: Arc<DynUrlService>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

#[derive(Clone, Copy)]
pub struct TestOptions {
    pub default_expiry_days: i64,
    pub behind_proxy: bool,
    pub queue_capacity: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            default_expiry_days: 0,
            behind_proxy: false,
            queue_capacity: 100,
        }
    }
}

pub fn test_app() -> TestApp {
    test_app_with(TestOptions::default())
}

pub fn test_app_with(options: TestOptions) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let links: Arc<dyn LinkRepository> = store.clone();
    let click_repo: Arc<dyn ClickRepository> = store.clone();

    let service: Arc<DynUrlService> = Arc::new(UrlService::new(
        links,
        click_repo,
        CodeGenerator::new(Arc::new(SeededRandom::new(42))),
        UrlServiceSettings {
            base_url: BASE_URL.to_string(),
            code_length: 6,
            default_expiry_days: options.default_expiry_days,
        },
    ));

    let (tx, rx) = mpsc::channel(options.queue_capacity);
    let state = AppState::new(service.clone(), tx, options.behind_proxy);

    let peer: SocketAddr = PEER_ADDR.parse().unwrap();
    let app = router(state).layer(MockConnectInfo(peer));

    TestApp {
        server: TestServer::new(app).unwrap(),
        store,
        service,
        clicks: rx,
    }
}

/// Creates a link through the API and returns the response body.
pub async fn create_link(server: &TestServer, body: Value) -> Value {
    let response = server.post("/api/v1/urls").json(&body).await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()
}

pub async fn create_alias(server: &TestServer, url: &str, alias: &str) -> Value {
    create_link(server, json!({ "original_url": url, "custom_alias": alias })).await
}
