//! Repository trait definitions for the domain layer.
//!
//! These traits are the storage collaborator consumed by the application
//! services. Implementations live in `crate::infrastructure::persistence`;
//! mock implementations are generated via `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Short link storage keyed by id, code and alias
//! - [`ClickRepository`] - Click events and aggregated statistics

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
