//! HTTP middleware for request processing.
//!
//! Provides observability and panic recovery.

pub mod recovery;
pub mod tracing;
