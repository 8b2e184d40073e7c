use serde::{Deserialize, Serialize};

/// The caller-relative vote state of a resource.
///
/// `points` is the aggregate upvote count and never goes below zero;
/// `is_upvoted` tells whether the requesting actor is part of that count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct VoteState {
    pub is_upvoted: bool,
    pub points: i32,
}

impl VoteState {
    pub fn new(is_upvoted: bool, points: i32) -> Self {
        Self { is_upvoted, points }
    }

    /// Returns the state one toggle away from `self`.
    ///
    /// Used for optimistic updates before the server answers. The count is
    /// clamped at zero so a stale projection can never display negative points.
    pub fn flipped(&self) -> Self {
        if self.is_upvoted {
            Self {
                is_upvoted: false,
                points: self.points.saturating_sub(1).max(0),
            }
        } else {
            Self {
                is_upvoted: true,
                points: self.points.saturating_add(1),
            }
        }
    }
}
