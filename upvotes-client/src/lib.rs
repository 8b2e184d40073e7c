//! # Upvotes Client
//! Client side of the board's upvote toggle. It holds the keyed cache of list
//! queries, the optimistic coordinator that flips votes before the server
//! answers and reconciles the answers, the HTTP transport and the notifier
//! used for error toasts.
pub mod cache;
pub mod coordinator;
pub mod errors;
pub mod notifier;
pub mod transport;

pub use cache::{BoardCache, QueryCache, QueryKey, VoteCache};
pub use coordinator::{Settlement, UpvoteCoordinator};
pub use errors::ToggleFailure;
pub use notifier::{Notification, Notifier, TracingNotifier};
pub use transport::{HttpToggleClient, ToggleTransport};
