//! This module defines and re-exports the interfaces for the upvotes repository.
mod upvotes;

pub use upvotes::UpvotesRepository;
