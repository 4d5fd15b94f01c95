//! Quotesync Server - a local quote collection with periodic remote sync.
//!
//! The service keeps the quote list in durable slots, merges a remote copy
//! into it on a timer using the quotesync-engine reconciliation logic, and
//! exposes the page controls (add, filter, show, import/export, sync and
//! conflict review) over HTTP.

pub mod config;
pub mod error;
pub mod remote;
pub mod routes;
pub mod scheduler;
pub mod session;
pub mod slots;

use crate::config::{Config, RemoteMode};
use crate::remote::{HttpRemote, RemoteError, RemoteSource, SimulatedRemote};
use crate::session::QuoteSession;
use crate::slots::SlotStore;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<QuoteSession>,
    pub config: Arc<Config>,
}

/// Build the configured remote collaborator.
pub fn build_remote(
    config: &Config,
    durable: Arc<dyn SlotStore>,
) -> Result<Arc<dyn RemoteSource>, RemoteError> {
    let remote: Arc<dyn RemoteSource> = match config.remote_mode {
        RemoteMode::Http => Arc::new(HttpRemote::new(&config.remote_url, config.remote_limit)?),
        RemoteMode::Simulated => Arc::new(SimulatedRemote::new(durable, config.simulated_latency)),
    };
    Ok(remote)
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
