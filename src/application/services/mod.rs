//! Business logic services for the application layer.

pub mod url_service;

pub use url_service::{
    CreateUrl, CreatedUrl, MAX_CODE_ATTEMPTS, UrlDetails, UrlService, UrlServiceSettings,
    UrlUpdate,
};
