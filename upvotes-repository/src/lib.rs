//! # Upvotes Repository
//! This crate provides the trait and implementations for the transactional
//! store behind the toggle-upvote endpoint. It includes definitions for errors,
//! the repository interface, a PostgreSQL implementation and an in-memory
//! implementation with the same semantics.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::UpvotesRepositoryError;
pub use interfaces::UpvotesRepository;
pub use memory::InMemoryUpvotesRepository;
pub use postgres::PostgresUpvotesRepository;
