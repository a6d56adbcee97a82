//! tf-core: shared error type and configuration.
//!
//! This crate is the foundational dependency for the other tf-* crates,
//! providing a unified error type that maps onto HTTP status codes and the
//! application configuration loaded from JSON and the environment.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
