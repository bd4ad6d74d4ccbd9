//! service-core: Shared infrastructure for the auth stack.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
