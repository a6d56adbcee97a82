//! Route handlers for the HTTP API.

pub mod greet;
pub mod health;
pub mod metrics;
pub mod resize;
pub mod thumbnail;
