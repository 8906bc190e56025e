//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_ip, header_str};

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (validity, existence, expiry)
/// 2. Queue a click event for the background worker
/// 3. Return 302 Found with `Location`
///
/// # Click Tracking
///
/// The click is handed to a bounded channel with `try_send`, so the redirect
/// never waits for the analytics write and a client disconnect cannot cancel
/// it. If the queue is full the click is dropped and counted.
///
/// # Errors
///
/// Returns 400 Bad Request if the code has characters outside `[A-Za-z0-9]`.
/// Returns 404 Not Found if no live link has this code.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let link = state.url_service.get_url(&code).await?;

    let click_event = ClickEvent::new(
        link.id,
        header_str(&headers, header::REFERER.as_str()),
        header_str(&headers, header::USER_AGENT.as_str()),
        client_ip(&headers, addr, state.behind_proxy),
    );
    enqueue_click(&state, click_event);

    Ok((StatusCode::FOUND, [(header::LOCATION, link.original_url)]).into_response())
}

fn enqueue_click(state: &AppState, event: ClickEvent) {
    match state.click_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            tracing::warn!(link_id = event.link_id, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            tracing::warn!(link_id = event.link_id, "Click queue closed, dropping click");
        }
    }
}
