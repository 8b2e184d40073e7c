//! This module defines the `UpvotesRepository` trait, the interface to the
//! transactional store holding vote membership records and point totals.
use crate::errors::UpvotesRepositoryError;
use upvotes_shared::types::{ActorId, ResourceRef, VoteState};

/// A trait that defines the interface for interacting with the upvotes store.
///
/// Implementors must run `toggle_upvote` atomically: the membership flip and
/// the recomputed point total are committed together or not at all.
#[async_trait::async_trait]
pub trait UpvotesRepository: Send + Sync {
    /// Flips the actor's upvote on a resource and returns the committed state.
    ///
    /// `points` in the returned state is derived from the membership records
    /// of the resource, never from a blind increment.
    ///
    /// # Arguments
    ///
    /// * `resource` - The post or comment being voted on.
    /// * `actor` - The authenticated caller.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteState)` - The authoritative state after the toggle
    /// * `Err(UpvotesRepositoryError::NotFound)` - The resource does not exist
    /// * `Err(UpvotesRepositoryError::Conflict)` - A concurrent insert of the same
    ///   membership record won the race; nothing was committed
    async fn toggle_upvote(
        &self,
        resource: ResourceRef,
        actor: &ActorId,
    ) -> Result<VoteState, UpvotesRepositoryError>;

    /// Reads the current state of a resource relative to an optional actor.
    ///
    /// Anonymous readers always see `is_upvoted = false`.
    async fn get_vote_state(
        &self,
        resource: ResourceRef,
        actor: Option<&ActorId>,
    ) -> Result<VoteState, UpvotesRepositoryError>;

    /// Checks whether the tables used by the repository exist.
    async fn check_tables_created(&self) -> Result<bool, UpvotesRepositoryError>;
}
