use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use upvotes_repository::{InMemoryUpvotesRepository, PostgresUpvotesRepository, UpvotesRepository};

use crate::config::{ServerConfig, StoreKind, create_cors_layer};
use crate::errors::{ConfigError, ServerError};
use crate::identity::TrustedHeaderIdentity;
use crate::server::state::AppState;
use crate::service::UpvoteService;

/// Number of posts and comments seeded into the in-memory store.
const MEMORY_SEED_SIZE: usize = 10;

/// `Dependencies` holds the wired components of the upvotes API.
pub struct Dependencies {
    pub state: AppState,
    pub cors: CorsLayer,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance.
    ///
    /// Connects to the configured store, applies migrations when enabled and
    /// checks that the tables exist before wiring the service and identity
    /// provider.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `ServerError` if any dependency fails to initialize.
    pub async fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        info!(
            store = ?config.store,
            addr = %config.socket_addr(),
            client_url = %config.client_url,
            identity_header = %config.identity_header,
            "Initializing dependencies"
        );

        let repository: Arc<dyn UpvotesRepository> = match config.store {
            StoreKind::Postgres => Arc::new(Self::connect_postgres(config).await?),
            StoreKind::Memory => Arc::new(Self::seeded_memory_store().await),
        };

        let identity = TrustedHeaderIdentity::new(&config.identity_header)?;
        let cors = create_cors_layer(&config.client_url)?;

        Ok(Self {
            state: AppState {
                service: Arc::new(UpvoteService::new(repository)),
                identity: Arc::new(identity),
            },
            cors,
        })
    }

    async fn connect_postgres(
        config: &ServerConfig,
    ) -> Result<PostgresUpvotesRepository, ServerError> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(database_url)
            .await?;
        let repository = PostgresUpvotesRepository::new(pool).await?;

        if config.run_migrations {
            repository.migrate().await?;
            info!("Migrations applied");
        }
        if !repository.check_tables_created().await? {
            return Err(ServerError::MissingTables);
        }

        info!("PostgreSQL connection established");
        Ok(repository)
    }

    async fn seeded_memory_store() -> InMemoryUpvotesRepository {
        let repository = InMemoryUpvotesRepository::new();
        for _ in 0..MEMORY_SEED_SIZE {
            repository.insert_post().await;
            repository.insert_comment().await;
        }
        warn!(
            seeded = MEMORY_SEED_SIZE,
            "Using the in-memory store; votes are lost on restart"
        );
        repository
    }
}
