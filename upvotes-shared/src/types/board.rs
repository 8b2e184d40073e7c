//! List projections of the board's votable resources.
//!
//! These are the items held in the client's list queries. Only the vote
//! fields (`points`, `is_upvoted`) are ever patched by the vote coordinator.
use serde::{Deserialize, Serialize};

use crate::types::{ResourceId, ResourceRef, VoteState};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostAuthor {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: ResourceId,
    pub title: String,
    pub url: Option<String>,
    pub content: Option<String>,
    pub points: i32,
    pub comments_count: i32,
    pub created_at: String,
    pub author: PostAuthor,
    pub is_upvoted: bool,
}

impl Post {
    pub fn resource(&self) -> ResourceRef {
        ResourceRef::post(self.id)
    }

    pub fn vote_state(&self) -> VoteState {
        VoteState::new(self.is_upvoted, self.points)
    }

    pub fn set_vote_state(&mut self, state: VoteState) {
        self.is_upvoted = state.is_upvoted;
        self.points = state.points;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentAuthor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: ResourceId,
    pub user_id: String,
    pub post_id: ResourceId,
    pub parent_comment_id: Option<ResourceId>,
    pub content: String,
    pub points: i32,
    pub depth: i32,
    pub comment_count: i32,
    pub created_at: String,
    pub author: CommentAuthor,
    pub is_upvoted: bool,
    #[serde(default)]
    pub child_comments: Vec<Comment>,
}

impl Comment {
    pub fn resource(&self) -> ResourceRef {
        ResourceRef::comment(self.id)
    }

    pub fn vote_state(&self) -> VoteState {
        VoteState::new(self.is_upvoted, self.points)
    }

    pub fn set_vote_state(&mut self, state: VoteState) {
        self.is_upvoted = state.is_upvoted;
        self.points = state.points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserializes_from_listing_json() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Show HN: a board",
            "url": "https://example.com",
            "content": null,
            "points": 5,
            "commentsCount": 2,
            "createdAt": "2025-01-01T00:00:00Z",
            "author": { "id": "u1", "username": "ada" },
            "isUpvoted": false
        }))
        .unwrap();

        assert_eq!(post.resource(), ResourceRef::post(ResourceId::new(42).unwrap()));
        assert_eq!(post.vote_state(), VoteState::new(false, 5));
    }

    #[test]
    fn test_comment_children_default_to_empty() {
        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": 3,
            "userId": "u2",
            "postId": 42,
            "parentCommentId": null,
            "content": "first",
            "points": 1,
            "depth": 0,
            "commentCount": 0,
            "createdAt": "2025-01-01T00:00:00Z",
            "author": { "id": "u2", "name": "bob" },
            "isUpvoted": true
        }))
        .unwrap();

        assert!(comment.child_comments.is_empty());
        assert_eq!(comment.vote_state(), VoteState::new(true, 1));
    }
}
