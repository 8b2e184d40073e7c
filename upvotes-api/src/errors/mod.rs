//! Error types for the upvotes API.
//!
//! `ApiError` is what request handlers return and is rendered as the board's
//! failure envelope. `ConfigError` and `ServerError` cover start-up.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use upvotes_repository::UpvotesRepositoryError;
use upvotes_shared::types::{ApiErrorBody, ParseResourceIdError, ResourceRef};

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidId(#[from] ParseResourceIdError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{} not found", .0.kind.title())]
    NotFound(ResourceRef),

    /// Store failure. The detail is logged, never sent to the caller.
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpvotesRepositoryError> for ApiError {
    fn from(err: UpvotesRepositoryError) -> Self {
        match err {
            UpvotesRepositoryError::NotFound(resource) => ApiError::NotFound(resource),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "Request failed with an internal error");
        }
        (self.status(), Json(ApiErrorBody::new(self.to_string()))).into_response()
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.into(),
        }
    }
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] UpvotesRepositoryError),

    #[error("Required tables are missing; run migrations first")]
    MissingTables,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
