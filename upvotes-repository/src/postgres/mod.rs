//! PostgreSQL backend for the upvotes repository.
mod upvotes_repository;

pub use upvotes_repository::PostgresUpvotesRepository;
