//! Handlers for link management endpoints (create, get, update, delete).

use axum::{
    Json,
    extract::{ConnectInfo, Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::urls::{
    CreateUrlRequest, CreateUrlResponse, UpdateUrlRequest, UrlDetailResponse, UrlView,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/page",
///   "custom_alias": "mylink",   // optional
///   "expires_in": 7             // optional, days
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "short_url": "http://localhost:8080/mylink",
///   "short_code": "mylink",
///   "original_url": "https://example.com/page",
///   "custom_alias": "mylink",
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": "2025-01-08T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed payloads, URLs or aliases.
/// Returns 409 Conflict if the alias is taken.
pub async fn create_url_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let creator_ip = client_ip(&headers, addr, state.behind_proxy);
    let created = state
        .url_service
        .create_short_url(payload.into(), &creator_ip)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Returns a link with its click statistics.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{id}`
///
/// # Response
///
/// ```json
/// {
///   "url": { "id": 1, "short_code": "abc123", ... },
///   "stats": { "click_count": 42, "last_click": "2025-01-02T10:00:00Z" }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not an integer.
/// Returns 404 Not Found if no live link has this id.
pub async fn get_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlDetailResponse>, AppError> {
    let id = parse_id(&id)?;
    let details = state.url_service.get_url_by_id(id).await?;

    let short_url = state.url_service.short_url(&details.link.short_code);

    Ok(Json(UrlDetailResponse {
        url: UrlView::new(details.link, short_url),
        stats: details.stats,
    }))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PUT /api/v1/urls/{id}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// {
///   "original_url": "https://new-destination.com",
///   "custom_alias": "newname",  // "" removes the alias
///   "expires_in": 30            // 0 clears, negative expires now
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed ids, payloads, URLs or aliases.
/// Returns 404 Not Found if no live link has this id.
/// Returns 409 Conflict if the alias belongs to another link.
pub async fn update_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUrlRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;

    state.url_service.update_url(id, payload.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/v1/urls/{id}`
///
/// The code stays reserved and click history is kept.
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not an integer.
/// Returns 404 Not Found if no live link has this id.
pub async fn delete_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.url_service.delete_url(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request("Invalid URL id", json!({ "id": raw })))
}
