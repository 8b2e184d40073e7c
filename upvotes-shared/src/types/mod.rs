mod actor;
mod api;
mod board;
mod resource;
mod vote_state;

pub use actor::{Actor, ActorId};
pub use api::{ApiErrorBody, ApiResponse, PaginatedResponse, Pagination};
pub use board::{Comment, CommentAuthor, Post, PostAuthor};
pub use resource::{ParseResourceIdError, ResourceId, ResourceKind, ResourceRef};
pub use vote_state::VoteState;
