//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, get_url_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, nested under `/api/v1`.
///
/// # Endpoints
///
/// - `POST   /urls`        - Create a short link
/// - `GET    /urls/{id}`   - Link details with click statistics
/// - `PUT    /urls/{id}`   - Partially update a link
/// - `DELETE /urls/{id}`   - Delete a link
pub fn routes() -> Router<AppState> {
    Router::new().route("/urls", post(create_url_handler)).route(
        "/urls/{id}",
        get(get_url_handler)
            .put(update_url_handler)
            .delete(delete_url_handler),
    )
}
