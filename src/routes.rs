//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`            - Home page with the shorten form
//! - `GET  /static/*`    - Front-end assets from `static/`
//! - `GET  /{code}`      - Short link redirect
//! - `GET  /health`      - Health check: storage, click queue
//! - `/api/v1/*`         - Link management API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Recovery** - Handler panics become 500 responses
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{recovery, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Directory holding the front-end, relative to the working directory.
pub const STATIC_DIR: &str = "static";

/// Builds the routes and middleware without path normalization.
///
/// Handlers that need the peer address require the service to be served
/// with connect info (or a `MockConnectInfo` layer in tests).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(format!("{STATIC_DIR}/index.html")))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api/v1", api::routes::routes())
        .with_state(state)
        .layer(recovery::layer())
        .layer(tracing::layer())
}

/// Constructs the application router served by the binary.
///
/// Trailing slashes are trimmed before routing, so `/api/v1/urls/` and
/// `/api/v1/urls` are the same endpoint.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
