//! Client-side cache of list queries holding votable resources.
mod query_cache;
mod votable;

pub use query_cache::{FetchTicket, ListPage, QueryCache, QueryKey};
pub use votable::Votable;

use upvotes_shared::types::{Comment, Post, ResourceKind, ResourceRef, VoteState};

/// The cache operations the vote coordinator relies on.
pub trait VoteCache {
    /// Current value of any projection of `resource`. All projections of a
    /// resource hold the same value once writes have settled.
    fn read_projection(&self, resource: ResourceRef) -> Option<VoteState>;

    /// Writes `state` into every projection of `resource` and returns how
    /// many were written.
    fn write_projections(&mut self, resource: ResourceRef, state: VoteState) -> usize;

    /// Cancels in-flight refreshes of every query that may carry a copy of
    /// `resource`: the queries tagged with its kind and any other query
    /// already holding it. Returns the number cancelled.
    fn cancel_queries(&mut self, resource: ResourceRef) -> usize;

    /// Marks the same set of queries stale without refetching them.
    fn invalidate(&mut self, resource: ResourceRef);
}

/// The board's two caches: post lists and comment threads.
#[derive(Debug, Clone, Default)]
pub struct BoardCache {
    pub posts: QueryCache<Post>,
    pub comments: QueryCache<Comment>,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteCache for BoardCache {
    fn read_projection(&self, resource: ResourceRef) -> Option<VoteState> {
        match resource.kind {
            ResourceKind::Post => self.posts.read_projection(resource),
            ResourceKind::Comment => self.comments.read_projection(resource),
        }
    }

    fn write_projections(&mut self, resource: ResourceRef, state: VoteState) -> usize {
        match resource.kind {
            ResourceKind::Post => self.posts.write_projections(resource, state),
            ResourceKind::Comment => self.comments.write_projections(resource, state),
        }
    }

    fn cancel_queries(&mut self, resource: ResourceRef) -> usize {
        self.posts.cancel_queries(resource) + self.comments.cancel_queries(resource)
    }

    fn invalidate(&mut self, resource: ResourceRef) {
        self.posts.invalidate(resource);
        self.comments.invalidate(resource);
    }
}
