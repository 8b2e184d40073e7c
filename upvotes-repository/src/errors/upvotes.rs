//! Error types for the upvotes repository.
//! Defines specific errors that can occur while toggling or reading votes.
use thiserror::Error;
use upvotes_shared::types::ResourceRef;

/// Represents errors that can occur within the upvotes repository.
#[derive(Debug, Error)]
pub enum UpvotesRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// The post or comment does not exist.
    #[error("{0} not found")]
    NotFound(ResourceRef),

    /// A concurrent toggle inserted the same membership record first.
    ///
    /// The transaction has been rolled back; re-running the toggle observes
    /// the committed record.
    #[error("Concurrent upvote conflict on {0}")]
    Conflict(ResourceRef),
}

impl UpvotesRepositoryError {
    /// Maps a unique-constraint violation on the membership table to `Conflict`.
    pub(crate) fn from_insert(error: sqlx::Error, resource: ResourceRef) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                UpvotesRepositoryError::Conflict(resource)
            }
            _ => UpvotesRepositoryError::DatabaseError(error),
        }
    }
}
