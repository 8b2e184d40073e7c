//! # Upvotes API
//! HTTP surface of the board's upvote toggle: configuration, identity
//! resolution, the toggle service with conflict handling and the axum server.
pub mod config;
pub mod dependencies;
pub mod errors;
pub mod identity;
pub mod server;
pub mod service;

pub use dependencies::Dependencies;
pub use errors::{ApiError, ConfigError, ServerError};
