//! Quotesync Server binary.

use quotesync_server::config::Config;
use quotesync_server::scheduler::SyncScheduler;
use quotesync_server::session::QuoteSession;
use quotesync_server::slots::{MemorySlots, SqliteSlots};
use quotesync_server::{app, build_remote, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotesync_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Quotesync Server on {}:{}", config.host, config.port);

    // Open durable slots
    let durable = Arc::new(SqliteSlots::connect(&config.database_url).await?);
    let remote = build_remote(&config, durable.clone())?;
    tracing::info!(remote = remote.name(), "Remote configured");

    // Start the session and its periodic sync
    let session = Arc::new(QuoteSession::start(durable, Arc::new(MemorySlots::new()), remote).await);
    let scheduler = SyncScheduler::spawn(session.clone(), config.sync_interval);

    let state = AppState {
        session: session.clone(),
        config: Arc::new(config.clone()),
    };

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop().await;
    session.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
