//! DTOs for the `/api/v1/urls` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateUrl, CreatedUrl, UrlUpdate};
use crate::domain::entities::{ClickStats, ShortLink};

/// Request body for `POST /api/v1/urls`.
///
/// The URL itself and the alias are checked by the service, which reports
/// the specific error kind (`invalid_url`, `invalid_alias`, ...).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, message = "original_url is required"))]
    pub original_url: String,

    /// Requested code; empty or absent means "generate one".
    pub custom_alias: Option<String>,

    /// Days until the link expires. Non-positive values use the server default.
    #[serde(alias = "expires_in_days")]
    pub expires_in: Option<i64>,
}

impl From<CreateUrlRequest> for CreateUrl {
    fn from(request: CreateUrlRequest) -> Self {
        CreateUrl {
            original_url: request.original_url,
            custom_alias: request.custom_alias,
            expires_in_days: request.expires_in,
        }
    }
}

/// Request body for `PUT /api/v1/urls/{id}`.
///
/// Every field is optional; absent fields are left unchanged.
///
/// # `expires_in` semantics
///
/// - **Absent** → leave existing expiry unchanged
/// - **`0`** → clear expiry (link never expires)
/// - **Negative** → expire immediately
/// - **Positive** → expire that many days from now
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUrlRequest {
    /// New destination; an empty string is ignored.
    pub original_url: Option<String>,

    /// New alias, which also becomes the code. `""` removes the alias.
    pub custom_alias: Option<String>,

    #[serde(alias = "expires_in_days")]
    pub expires_in: Option<i64>,
}

impl From<UpdateUrlRequest> for UrlUpdate {
    fn from(request: UpdateUrlRequest) -> Self {
        UrlUpdate {
            original_url: request.original_url,
            custom_alias: request.custom_alias,
            expires_in_days: request.expires_in,
        }
    }
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub id: i64,
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CreatedUrl> for CreateUrlResponse {
    fn from(created: CreatedUrl) -> Self {
        let link = created.link;

        CreateUrlResponse {
            id: link.id,
            short_url: created.short_url,
            short_code: link.short_code,
            original_url: link.original_url,
            custom_alias: link.custom_alias,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

/// A stored link as exposed by the API.
#[derive(Debug, Serialize)]
pub struct UrlView {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlView {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        UrlView {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            custom_alias: link.custom_alias,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

/// Response for `GET /api/v1/urls/{id}`.
#[derive(Debug, Serialize)]
pub struct UrlDetailResponse {
    pub url: UrlView,
    pub stats: ClickStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_both_expiry_names() {
        let request: CreateUrlRequest = serde_json::from_str(
            r#"{"original_url": "https://example.com", "expires_in": 7}"#,
        )
        .unwrap();
        assert_eq!(request.expires_in, Some(7));

        let request: CreateUrlRequest = serde_json::from_str(
            r#"{"original_url": "https://example.com", "expires_in_days": 3}"#,
        )
        .unwrap();
        assert_eq!(request.expires_in, Some(3));
    }

    #[test]
    fn test_create_request_requires_url() {
        let request: CreateUrlRequest =
            serde_json::from_str(r#"{"original_url": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_fields_are_optional() {
        let request: UpdateUrlRequest = serde_json::from_str("{}").unwrap();
        let update = UrlUpdate::from(request);

        assert!(update.original_url.is_none());
        assert!(update.custom_alias.is_none());
        assert!(update.expires_in_days.is_none());
    }

    #[test]
    fn test_create_response_omits_absent_fields() {
        let created = CreatedUrl {
            short_url: "http://localhost:8080/abc123".to_string(),
            link: ShortLink {
                id: 1,
                original_url: "https://example.com".to_string(),
                short_code: "abc123".to_string(),
                custom_alias: None,
                created_at: Utc::now(),
                expires_at: None,
                creator_ip: None,
            },
        };

        let json = serde_json::to_value(CreateUrlResponse::from(created)).unwrap();
        assert_eq!(json["short_code"], "abc123");
        assert_eq!(json["short_url"], "http://localhost:8080/abc123");
        assert!(json.get("custom_alias").is_none());
        assert!(json.get("expires_at").is_none());
    }
}
