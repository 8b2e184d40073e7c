//! The toggle use case sitting between the HTTP handlers and the repository.
use std::sync::Arc;

use tracing::{info, warn};
use upvotes_repository::{UpvotesRepository, UpvotesRepositoryError};
use upvotes_shared::types::{Actor, ResourceRef, VoteState};

use crate::errors::ApiError;

/// Toggles upvotes on behalf of authenticated actors.
///
/// A `Conflict` from the repository means a concurrent toggle by the same
/// actor committed first. The toggle is retried once in a fresh transaction;
/// if that conflicts too, the committed state is read and returned. Callers
/// never see `Conflict`.
pub struct UpvoteService {
    repository: Arc<dyn UpvotesRepository>,
}

impl UpvoteService {
    pub fn new(repository: Arc<dyn UpvotesRepository>) -> Self {
        Self { repository }
    }

    pub async fn toggle(&self, resource: ResourceRef, actor: &Actor) -> Result<VoteState, ApiError> {
        let Some(actor_id) = actor.id() else {
            return Err(ApiError::Unauthorized);
        };

        let state = match self.repository.toggle_upvote(resource, actor_id).await {
            Err(UpvotesRepositoryError::Conflict(_)) => {
                warn!(resource = %resource, actor = %actor_id, "Upvote conflict, retrying toggle");
                match self.repository.toggle_upvote(resource, actor_id).await {
                    Err(UpvotesRepositoryError::Conflict(_)) => {
                        warn!(
                            resource = %resource,
                            actor = %actor_id,
                            "Upvote conflict on retry, returning committed state"
                        );
                        self.repository
                            .get_vote_state(resource, Some(actor_id))
                            .await?
                    }
                    other => other?,
                }
            }
            other => other?,
        };

        info!(
            resource = %resource,
            actor = %actor_id,
            is_upvoted = state.is_upvoted,
            points = state.points,
            "Upvote toggled"
        );
        Ok(state)
    }

    /// Whether the backing store has its tables in place.
    pub async fn is_ready(&self) -> Result<bool, ApiError> {
        Ok(self.repository.check_tables_created().await?)
    }
}
