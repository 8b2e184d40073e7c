// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use self::state::AppState;
use crate::errors::ServerError;

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/posts/:id/upvote", post(handlers::toggle_post_upvote))
        .route(
            "/api/comments/:id/upvote",
            post(handlers::toggle_comment_upvote),
        )
        .route("/health", get(handlers::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!(%addr, "Server listening");
    info!("- Post upvotes: POST http://{}/api/posts/:id/upvote", addr);
    info!("- Comment upvotes: POST http://{}/api/comments/:id/upvote", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
