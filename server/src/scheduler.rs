//! Periodic sync.
//!
//! Runs one pass immediately and then one per period until stopped. Failed
//! passes are logged and retried on the next tick.

use crate::session::{QuoteSession, SessionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawns the periodic sync task.
pub struct SyncScheduler;

impl SyncScheduler {
    /// Start syncing `session` every `period`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(session: Arc<QuoteSession>, period: Duration) -> SyncHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(period_secs = period.as_secs(), "Sync scheduler started");

            loop {
                tokio::select! {
                    _ = interval.tick() => run_tick(&session).await,
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Sync scheduler stopped");
        });

        SyncHandle {
            stop_tx,
            task: Some(task),
        }
    }
}

async fn run_tick(session: &QuoteSession) {
    match session.sync_now().await {
        Ok(report) => {
            tracing::debug!(
                added = report.added,
                conflicts = report.conflicts.len(),
                "Scheduled sync finished"
            );
        }
        Err(SessionError::SyncInProgress) => {
            tracing::debug!("Skipping scheduled sync, a pass is already running");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Scheduled sync failed");
        }
    }
}

/// Stop handle for the periodic sync task.
///
/// Dropping the handle also stops the task, without waiting for it.
pub struct SyncHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Stop the task and wait for it to finish its current pass.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Sync scheduler task failed");
            }
        }
    }

    /// Check whether the task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}
