// HTTP request handlers
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::warn;
use upvotes_shared::types::{ApiResponse, ResourceId, ResourceKind, ResourceRef, VoteState};

use crate::errors::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tables_ready: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.is_ready().await {
        Ok(true) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                tables_ready: true,
            }),
        ),
        Ok(false) | Err(_) => {
            warn!("Health check failed: store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    tables_ready: false,
                }),
            )
        }
    }
}

/// `POST /api/posts/:id/upvote`
pub async fn toggle_post_upvote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<VoteState>>, ApiError> {
    toggle(&state, ResourceKind::Post, &id, &headers).await
}

/// `POST /api/comments/:id/upvote`
pub async fn toggle_comment_upvote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<VoteState>>, ApiError> {
    toggle(&state, ResourceKind::Comment, &id, &headers).await
}

async fn toggle(
    state: &AppState,
    kind: ResourceKind,
    id: &str,
    headers: &HeaderMap,
) -> Result<Json<ApiResponse<VoteState>>, ApiError> {
    // Identity first so anonymous callers get 401 even with a bad id.
    let actor = state.identity.resolve(headers);
    if !actor.is_authenticated() {
        return Err(ApiError::Unauthorized);
    }

    let id: ResourceId = id.parse()?;
    let vote_state = state
        .service
        .toggle(ResourceRef::new(kind, id), &actor)
        .await?;

    Ok(Json(ApiResponse::ok(
        format!("{} updated successfully", kind.title()),
        vote_state,
    )))
}
