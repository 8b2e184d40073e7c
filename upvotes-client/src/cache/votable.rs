use upvotes_shared::types::{Comment, Post, ResourceRef, VoteState};

/// An item of a cached list that carries a vote state.
///
/// Items may nest (comment threads); `children` and `children_mut` expose
/// the nested items so that every projection of a resource can be reached.
pub trait Votable: Clone + Send {
    fn resource(&self) -> ResourceRef;

    fn vote_state(&self) -> VoteState;

    fn apply_vote_state(&mut self, state: VoteState);

    fn children(&self) -> &[Self] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Self] {
        &mut []
    }
}

impl Votable for Post {
    fn resource(&self) -> ResourceRef {
        Post::resource(self)
    }

    fn vote_state(&self) -> VoteState {
        Post::vote_state(self)
    }

    fn apply_vote_state(&mut self, state: VoteState) {
        self.set_vote_state(state);
    }
}

impl Votable for Comment {
    fn resource(&self) -> ResourceRef {
        Comment::resource(self)
    }

    fn vote_state(&self) -> VoteState {
        Comment::vote_state(self)
    }

    fn apply_vote_state(&mut self, state: VoteState) {
        self.set_vote_state(state);
    }

    fn children(&self) -> &[Self] {
        &self.child_comments
    }

    fn children_mut(&mut self) -> &mut [Self] {
        &mut self.child_comments
    }
}

/// Depth-first search for the first projection of `resource`.
pub(crate) fn find_state<T: Votable>(items: &[T], resource: ResourceRef) -> Option<VoteState> {
    items.iter().find_map(|item| {
        if item.resource() == resource {
            Some(item.vote_state())
        } else {
            find_state(item.children(), resource)
        }
    })
}

/// Writes `state` into every projection of `resource`, returning how many
/// were written.
pub(crate) fn write_state<T: Votable>(
    items: &mut [T],
    resource: ResourceRef,
    state: VoteState,
) -> usize {
    let mut written = 0;
    for item in items {
        if item.resource() == resource {
            item.apply_vote_state(state);
            written += 1;
        }
        written += write_state(item.children_mut(), resource, state);
    }
    written
}
