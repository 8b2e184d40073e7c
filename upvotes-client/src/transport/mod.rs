//! The network side of a toggle.
mod http;

pub use http::{HttpToggleClient, decode_toggle_response};

use async_trait::async_trait;
use upvotes_shared::types::{ResourceRef, VoteState};

use crate::errors::ToggleFailure;

/// Sends one toggle request and returns the committed state.
#[async_trait]
pub trait ToggleTransport: Send + Sync {
    async fn toggle(&self, resource: ResourceRef) -> Result<VoteState, ToggleFailure>;
}
