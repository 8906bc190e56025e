//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A shortened URL mapping
//! - [`NewClick`] - A click on a shortened link, ready to append
//! - [`ClickStats`] - Aggregated clicks for one link
//!
//! Creation inputs live in separate structs (`NewShortLink`, `NewClick`) since
//! storage assigns ids and creation timestamps.

pub mod click;
pub mod short_link;

pub use click::{ClickStats, NewClick};
pub use short_link::{NewShortLink, ShortLink};
