//! Application error kinds and their HTTP representation.
//!
//! Services return [`AppError`]; handlers let axum render it through
//! [`IntoResponse`]. Callers match on variants, never on message text.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::code_generator::RandomnessError;

/// PostgreSQL constraint guarding `urls.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";

/// PostgreSQL constraint guarding `url_codes.code`, the history of every
/// code ever assigned.
pub const CODE_HISTORY_CONSTRAINT: &str = "url_codes_code_key";

/// PostgreSQL constraint guarding `urls.custom_alias`.
pub const CUSTOM_ALIAS_CONSTRAINT: &str = "urls_custom_alias_key";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serialized error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("invalid custom alias: must be 3-10 alphanumeric characters")]
    InvalidAlias,

    #[error("custom alias too long: must be {max} characters or less")]
    AliasTooLong { max: usize },

    #[error("custom alias already exists")]
    DuplicateAlias,

    #[error("short code already exists")]
    DuplicateCode,

    #[error("invalid short code")]
    InvalidShortCode,

    #[error("invalid expiry: {days} days is out of range")]
    InvalidExpiry { days: i64 },

    #[error("url not found")]
    NotFound,

    #[error("url has expired")]
    Expired,

    #[error("no free short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("storage failure: {0}")]
    StorageFailure(#[source] sqlx::Error),

    #[error(transparent)]
    RandomnessFailure(#[from] RandomnessError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_)
            | AppError::InvalidAlias
            | AppError::AliasTooLong { .. }
            | AppError::InvalidShortCode
            | AppError::InvalidExpiry { .. }
            | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateAlias | AppError::DuplicateCode => StatusCode::CONFLICT,
            AppError::Expired => StatusCode::GONE,
            AppError::CodeSpaceExhausted { .. }
            | AppError::StorageFailure(_)
            | AppError::RandomnessFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its client-facing payload.
    ///
    /// Storage and randomness failures get a generic message so internal
    /// error text never reaches the client.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::InvalidUrl(reason) => (
                "invalid_url",
                "Invalid URL format".to_string(),
                json!({ "reason": reason }),
            ),
            AppError::InvalidAlias => ("invalid_alias", self.to_string(), json!({})),
            AppError::AliasTooLong { max } => {
                ("alias_too_long", self.to_string(), json!({ "max": max }))
            }
            AppError::DuplicateAlias => ("duplicate_alias", self.to_string(), json!({})),
            AppError::DuplicateCode => ("duplicate_code", self.to_string(), json!({})),
            AppError::InvalidShortCode => ("invalid_short_code", self.to_string(), json!({})),
            AppError::InvalidExpiry { days } => {
                ("invalid_expiry", self.to_string(), json!({ "days": days }))
            }
            AppError::NotFound => ("not_found", "URL not found".to_string(), json!({})),
            AppError::Expired => ("expired", "URL has expired".to_string(), json!({})),
            AppError::Validation { message, details } => {
                ("validation_error", message.clone(), details.clone())
            }
            AppError::CodeSpaceExhausted { .. } => (
                "internal_error",
                "Failed to generate unique code".to_string(),
                json!({}),
            ),
            AppError::StorageFailure(_) | AppError::RandomnessFailure(_) => (
                "internal_error",
                "Internal server error".to_string(),
                json!({}),
            ),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            match db.constraint() {
                Some(SHORT_CODE_CONSTRAINT | CODE_HISTORY_CONSTRAINT) => {
                    return AppError::DuplicateCode;
                }
                Some(CUSTOM_ALIAS_CONSTRAINT) => return AppError::DuplicateAlias,
                _ => {}
            }
        }

        AppError::StorageFailure(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request payload", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request payload",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
