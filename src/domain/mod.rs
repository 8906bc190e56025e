//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business rules live in [`crate::application::services`].
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a code and answers with 302
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`crate::application::click_worker::run_click_worker`] persists it
//!    through [`repositories::ClickRepository`], independent of the request

pub mod click_event;
pub mod entities;
pub mod repositories;
