//! # Upvotes Shared
//! This crate defines the data structures shared by the toggle endpoint and the
//! optimistic vote coordinator.
//! It includes resource addressing, vote states, actors, API envelopes and the
//! post/comment projections the board caches on the client.
pub mod types;
