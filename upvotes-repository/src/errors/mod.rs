//! Error types for the upvotes repository.
//! Consolidates and re-exports error types related to upvote persistence.
mod upvotes;

pub use upvotes::UpvotesRepositoryError;
