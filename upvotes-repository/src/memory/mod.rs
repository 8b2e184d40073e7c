//! In-memory upvotes repository for tests and local development.
//!
//! One async mutex guards the whole store and is held for the entire toggle,
//! which gives every toggle the isolation of a serialized transaction.
//! Points are recomputed from the membership set on every toggle, exactly
//! like the PostgreSQL implementation.
//!
//! # Example
//!
//! ```ignore
//! use upvotes_repository::{InMemoryUpvotesRepository, UpvotesRepository};
//! use upvotes_shared::types::ActorId;
//!
//! let repository = InMemoryUpvotesRepository::new();
//! let post = repository.insert_post().await;
//! let state = repository.toggle_upvote(post, &ActorId::new("u1")).await?;
//! assert!(state.is_upvoted);
//! ```

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use upvotes_shared::types::{ActorId, ResourceId, ResourceKind, ResourceRef, VoteState};

use crate::{UpvotesRepository, UpvotesRepositoryError};

#[derive(Default)]
struct Store {
    /// Resource -> persisted point total
    points: HashMap<ResourceRef, i32>,
    /// Membership records, one per (resource, actor)
    votes: HashSet<(ResourceRef, ActorId)>,
    last_post_id: Option<ResourceId>,
    last_comment_id: Option<ResourceId>,
}

impl Store {
    fn count_votes(&self, resource: ResourceRef) -> i32 {
        let count = self.votes.iter().filter(|(r, _)| *r == resource).count();
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    fn next_id(&mut self, kind: ResourceKind) -> ResourceId {
        let last = match kind {
            ResourceKind::Post => &mut self.last_post_id,
            ResourceKind::Comment => &mut self.last_comment_id,
        };
        let id = last.map_or(ResourceId::FIRST, ResourceId::next);
        *last = Some(id);
        id
    }
}

/// In-memory repository with the same semantics as the PostgreSQL one.
#[derive(Default)]
pub struct InMemoryUpvotesRepository {
    store: Mutex<Store>,
}

impl InMemoryUpvotesRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a post with zero points and returns its reference.
    pub async fn insert_post(&self) -> ResourceRef {
        self.insert(ResourceKind::Post).await
    }

    /// Adds a comment with zero points and returns its reference.
    pub async fn insert_comment(&self) -> ResourceRef {
        self.insert(ResourceKind::Comment).await
    }

    async fn insert(&self, kind: ResourceKind) -> ResourceRef {
        let mut store = self.store.lock().await;
        let id = store.next_id(kind);
        let resource = ResourceRef::new(kind, id);
        store.points.insert(resource, 0);
        resource
    }
}

#[async_trait]
impl UpvotesRepository for InMemoryUpvotesRepository {
    async fn toggle_upvote(
        &self,
        resource: ResourceRef,
        actor: &ActorId,
    ) -> Result<VoteState, UpvotesRepositoryError> {
        let mut store = self.store.lock().await;
        if !store.points.contains_key(&resource) {
            return Err(UpvotesRepositoryError::NotFound(resource));
        }

        let key = (resource, actor.clone());
        let is_upvoted = if store.votes.remove(&key) {
            false
        } else {
            store.votes.insert(key);
            true
        };

        let points = store.count_votes(resource);
        store.points.insert(resource, points);

        debug!(
            resource = %resource,
            actor = %actor,
            is_upvoted,
            points,
            "Committed upvote toggle"
        );
        Ok(VoteState { is_upvoted, points })
    }

    async fn get_vote_state(
        &self,
        resource: ResourceRef,
        actor: Option<&ActorId>,
    ) -> Result<VoteState, UpvotesRepositoryError> {
        let store = self.store.lock().await;
        let points = *store
            .points
            .get(&resource)
            .ok_or(UpvotesRepositoryError::NotFound(resource))?;
        let is_upvoted =
            actor.is_some_and(|actor| store.votes.contains(&(resource, actor.clone())));
        Ok(VoteState { is_upvoted, points })
    }

    async fn check_tables_created(&self) -> Result<bool, UpvotesRepositoryError> {
        Ok(true)
    }
}
