//! PostgreSQL implementation of the upvotes repository.
//!
//! Every toggle runs in one transaction that:
//!
//! 1. locks the post/comment row (`SELECT ... FOR UPDATE`), failing with
//!    `NotFound` when it is missing,
//! 2. deletes the caller's membership record, or inserts it when none existed,
//! 3. recomputes `points` from the membership table and writes it back.
//!
//! The row lock serializes toggles on the same resource, so under
//! read-committed each statement after the lock sees every previously
//! committed membership record and the recomputed count cannot lose updates.
//! The unique index on (user_id, resource id) backs this up: a double insert
//! is reported as `Conflict` instead of corrupting the count.
//!
//! ## Database Tables
//!
//! - `posts`, `comments`: votable resources with a `points` column
//! - `post_upvotes`, `comment_upvotes`: membership records
use async_trait::async_trait;
use tracing::debug;
use upvotes_shared::types::{ActorId, ResourceKind, ResourceRef, VoteState};

use crate::{UpvotesRepository, UpvotesRepositoryError};

/// SQL statements for one kind of votable resource.
struct VoteQueries {
    lock_resource: &'static str,
    delete_membership: &'static str,
    insert_membership: &'static str,
    recompute_points: &'static str,
    read_state: &'static str,
}

const POST_QUERIES: VoteQueries = VoteQueries {
    lock_resource: "SELECT id FROM posts WHERE id = $1 FOR UPDATE",
    delete_membership: "DELETE FROM post_upvotes WHERE post_id = $1 AND user_id = $2",
    insert_membership: r#"
        INSERT INTO post_upvotes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, post_id) DO NOTHING
    "#,
    recompute_points: r#"
        UPDATE posts
        SET points = (SELECT COUNT(*)::int FROM post_upvotes WHERE post_id = $1)
        WHERE id = $1
        RETURNING points
    "#,
    read_state: r#"
        SELECT p.points,
               EXISTS(SELECT 1 FROM post_upvotes u WHERE u.post_id = p.id AND u.user_id = $2) AS is_upvoted
        FROM posts p
        WHERE p.id = $1
    "#,
};

const COMMENT_QUERIES: VoteQueries = VoteQueries {
    lock_resource: "SELECT id FROM comments WHERE id = $1 FOR UPDATE",
    delete_membership: "DELETE FROM comment_upvotes WHERE comment_id = $1 AND user_id = $2",
    insert_membership: r#"
        INSERT INTO comment_upvotes (comment_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, comment_id) DO NOTHING
    "#,
    recompute_points: r#"
        UPDATE comments
        SET points = (SELECT COUNT(*)::int FROM comment_upvotes WHERE comment_id = $1)
        WHERE id = $1
        RETURNING points
    "#,
    read_state: r#"
        SELECT c.points,
               EXISTS(SELECT 1 FROM comment_upvotes u WHERE u.comment_id = c.id AND u.user_id = $2) AS is_upvoted
        FROM comments c
        WHERE c.id = $1
    "#,
};

const REQUIRED_TABLES: [&str; 4] = ["posts", "comments", "post_upvotes", "comment_upvotes"];

fn queries_for(kind: ResourceKind) -> &'static VoteQueries {
    match kind {
        ResourceKind::Post => &POST_QUERIES,
        ResourceKind::Comment => &COMMENT_QUERIES,
    }
}

/// PostgreSQL implementation of the upvotes repository.
pub struct PostgresUpvotesRepository {
    pool: sqlx::PgPool,
}

impl PostgresUpvotesRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresUpvotesRepository)` - Ready-to-use repository instance
    /// * `Err(UpvotesRepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, UpvotesRepositoryError> {
        Ok(Self { pool })
    }

    /// Applies the bundled migrations (board and membership tables).
    pub async fn migrate(&self) -> Result<(), UpvotesRepositoryError> {
        sqlx::migrate!("src/postgres/migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Toggles the membership record within an active transaction.
    ///
    /// # Arguments
    ///
    /// * `resource` - The post or comment being toggled
    /// * `actor` - The caller whose membership is flipped
    /// * `tx` - Active transaction context
    ///
    /// # Returns
    ///
    /// * `Ok(VoteState)` - State to be committed with the transaction
    /// * `Err(UpvotesRepositoryError)` - Missing resource, insert race or database error
    async fn toggle_upvote_tx(
        &self,
        resource: ResourceRef,
        actor: &ActorId,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<VoteState, UpvotesRepositoryError> {
        let queries = queries_for(resource.kind);
        let id = resource.id.get();

        let locked: Option<i64> = sqlx::query_scalar(queries.lock_resource)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        if locked.is_none() {
            return Err(UpvotesRepositoryError::NotFound(resource));
        }

        let removed = sqlx::query(queries.delete_membership)
            .bind(id)
            .bind(actor.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        let is_upvoted = if removed > 0 {
            false
        } else {
            let inserted = sqlx::query(queries.insert_membership)
                .bind(id)
                .bind(actor.as_str())
                .execute(&mut **tx)
                .await
                .map_err(|e| UpvotesRepositoryError::from_insert(e, resource))?
                .rows_affected();
            if inserted == 0 {
                return Err(UpvotesRepositoryError::Conflict(resource));
            }
            true
        };

        let points: i32 = sqlx::query_scalar(queries.recompute_points)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(VoteState { is_upvoted, points })
    }
}

#[async_trait]
impl UpvotesRepository for PostgresUpvotesRepository {
    /// Toggles the caller's upvote in a new transaction.
    ///
    /// Any error drops the transaction, which rolls it back.
    async fn toggle_upvote(
        &self,
        resource: ResourceRef,
        actor: &ActorId,
    ) -> Result<VoteState, UpvotesRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let state = self.toggle_upvote_tx(resource, actor, &mut tx).await?;
        tx.commit().await?;

        debug!(
            resource = %resource,
            actor = %actor,
            is_upvoted = state.is_upvoted,
            points = state.points,
            "Committed upvote toggle"
        );
        Ok(state)
    }

    async fn get_vote_state(
        &self,
        resource: ResourceRef,
        actor: Option<&ActorId>,
    ) -> Result<VoteState, UpvotesRepositoryError> {
        let row: Option<(i32, bool)> = sqlx::query_as(queries_for(resource.kind).read_state)
            .bind(resource.id.get())
            .bind(actor.map(ActorId::as_str))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(points, is_upvoted)| VoteState { is_upvoted, points })
            .ok_or(UpvotesRepositoryError::NotFound(resource))
    }

    /// Checks if the tables are created in the database.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If every table the repository uses exists
    async fn check_tables_created(&self) -> Result<bool, UpvotesRepositoryError> {
        for table in REQUIRED_TABLES {
            let table_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
            if !table_exists {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
