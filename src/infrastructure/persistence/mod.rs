//! Storage backends implementing the domain repository traits.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage on PostgreSQL
//! - [`PgClickRepository`] - Click events and aggregates on PostgreSQL
//! - [`InMemoryStore`] - Both traits in process memory, for local runs and tests

pub mod in_memory;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use in_memory::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
