//! Sync and conflict review routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use quotesync_engine::Conflict;
use serde::Serialize;

use crate::error::Result;
use crate::session::{SyncReport, SyncStatus};
use crate::AppState;

/// Response for conflict resolution.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub resolved: usize,
}

/// Response for a local push.
#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub pushed: usize,
}

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync_now))
        .route("/sync/status", get(sync_status))
        .route("/sync/push", post(push_local))
        .route("/conflicts", get(list_conflicts))
        .route("/conflicts/accept", post(accept_remote))
        .route("/conflicts/keep-local", post(keep_local))
}

/// POST /sync - Run a sync pass now.
async fn sync_now(State(state): State<AppState>) -> Result<Json<SyncReport>> {
    Ok(Json(state.session.sync_now().await?))
}

/// GET /sync/status - Status of the last pass.
async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.session.status().await)
}

/// POST /sync/push - Push local-only quotes to the remote.
async fn push_local(State(state): State<AppState>) -> Result<Json<PushResponse>> {
    let pushed = state.session.push_local().await?;
    Ok(Json(PushResponse { pushed }))
}

/// GET /conflicts - Conflicts awaiting review.
async fn list_conflicts(State(state): State<AppState>) -> Json<Vec<Conflict>> {
    Json(state.session.pending_conflicts().await)
}

/// POST /conflicts/accept - Keep the remote versions.
async fn accept_remote(State(state): State<AppState>) -> Json<ResolveResponse> {
    let resolved = state.session.accept_remote().await;
    Json(ResolveResponse { resolved })
}

/// POST /conflicts/keep-local - Restore the local versions on both sides.
async fn keep_local(State(state): State<AppState>) -> Result<Json<ResolveResponse>> {
    let resolved = state.session.keep_local().await?;
    Ok(Json(ResolveResponse { resolved }))
}
