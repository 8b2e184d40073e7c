//! Error types for the upvotes client.
use thiserror::Error;
use upvotes_shared::types::ResourceRef;

/// Why a toggle call did not produce an authoritative state.
///
/// Returned by every `ToggleTransport` and by `UpvoteCoordinator::toggle`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToggleFailure {
    #[error("{0} not found")]
    NotFound(ResourceRef),

    #[error("Unauthorized")]
    Unauthorized,

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl From<reqwest::Error> for ToggleFailure {
    fn from(err: reqwest::Error) -> Self {
        ToggleFailure::Network(err.to_string())
    }
}
