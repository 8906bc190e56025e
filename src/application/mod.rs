//! Application layer implementing the link lifecycle.
//!
//! Services consume the repository traits from [`crate::domain`] and expose
//! the operations HTTP handlers and the admin CLI call.
//!
//! - [`services::url_service::UrlService`] - Creation, resolution, update and deletion of links
//! - [`click_worker::run_click_worker`] - Asynchronous click recording

pub mod click_worker;
pub mod services;
