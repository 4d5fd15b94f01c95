//! The quote session.
//!
//! A [`QuoteSession`] owns the local quote list for the lifetime of the
//! service, mirrors it into the durable `quotes` slot after every mutation,
//! and runs sync passes against a [`RemoteSource`].

use crate::remote::{RemoteError, RemoteSource};
use crate::slots::{
    SlotError, SlotStore, LAST_CATEGORY_FILTER_KEY, LAST_QUOTE_INDEX_KEY, QUOTES_KEY,
    SELECTED_CATEGORY_KEY,
};
use chrono::{DateTime, Utc};
use quotesync_engine::{
    category_options, select_random, CategoryFilter, Conflict, QuoteList, QuoteRecord,
    Reconciler, Selection,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Engine error: {0}")]
    Engine(#[from] quotesync_engine::Error),

    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("Sync failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("A sync pass is already in progress")]
    SyncInProgress,
}

/// Phase of the most recent sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
    Synced,
    Failed,
}

/// User-visible sync status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub state: SyncState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Completion time of the last successful pass
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            state: SyncState::Idle,
            message: None,
            last_synced_at: None,
        }
    }
}

/// Summary of a successful sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Remote quotes new to the local list
    pub added: usize,
    /// Conflicts detected in this pass (already resolved remote-wins)
    pub conflicts: Vec<Conflict>,
    /// Local list length after the pass
    pub total: usize,
    pub finished_at: DateTime<Utc>,
}

/// Mutable session state, guarded by one lock.
#[derive(Debug)]
struct SessionState {
    quotes: QuoteList,
    selected: CategoryFilter,
    conflicts: Vec<Conflict>,
    status: SyncStatus,
}

/// Releases the sync slot when dropped.
struct SyncGuard<'a>(&'a AtomicBool);

impl<'a> SyncGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A running quote session.
pub struct QuoteSession {
    durable: Arc<dyn SlotStore>,
    session_slots: Arc<dyn SlotStore>,
    remote: Arc<dyn RemoteSource>,
    state: Mutex<SessionState>,
    /// Set while a pass that touches the remote list is in flight
    syncing: AtomicBool,
}

impl QuoteSession {
    /// Start a session, loading persisted state.
    ///
    /// Loading never fails: unreadable or malformed slots fall back to the
    /// default quotes and the `all` filter.
    pub async fn start(
        durable: Arc<dyn SlotStore>,
        session_slots: Arc<dyn SlotStore>,
        remote: Arc<dyn RemoteSource>,
    ) -> Self {
        let raw = durable.get(QUOTES_KEY).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read stored quotes, using defaults");
            None
        });

        let loaded = QuoteList::load_or_default(raw.as_deref());
        if loaded.restored {
            tracing::info!(count = loaded.list.len(), "Loaded stored quotes");
        } else {
            tracing::info!("No usable stored quotes, writing defaults");
            if let Err(e) = write_quotes(durable.as_ref(), &loaded.list).await {
                tracing::warn!(error = %e, "Failed to write default quotes");
            }
        }

        let selected = load_selected_category(durable.as_ref()).await;

        Self {
            durable,
            session_slots,
            remote,
            state: Mutex::new(SessionState {
                quotes: loaded.list,
                selected,
                conflicts: Vec::new(),
                status: SyncStatus::default(),
            }),
            syncing: AtomicBool::new(false),
        }
    }

    /// Release storage resources.
    pub async fn shutdown(&self) {
        tracing::info!("Closing quote session");
        self.durable.close().await;
    }

    /// Name of the remote collaborator.
    pub fn remote_name(&self) -> &'static str {
        self.remote.name()
    }

    /// Snapshot of the local list.
    pub async fn quotes(&self) -> QuoteList {
        self.state.lock().await.quotes.clone()
    }

    /// Add a quote and persist the list.
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<QuoteRecord, SessionError> {
        let mut state = self.state.lock().await;

        let mut next = state.quotes.clone();
        let record = next.add(text, category)?.clone();
        write_quotes(self.durable.as_ref(), &next).await?;
        state.quotes = next;

        tracing::info!(category = %record.category, total = state.quotes.len(), "Quote added");
        Ok(record)
    }

    /// Import quotes from a JSON document and persist the list.
    ///
    /// Returns the number of quotes imported. A rejected document leaves the
    /// list untouched.
    pub async fn import_json(&self, json: &str) -> Result<usize, SessionError> {
        let mut state = self.state.lock().await;

        let mut next = state.quotes.clone();
        let count = next.import_json(json)?;
        write_quotes(self.durable.as_ref(), &next).await?;
        state.quotes = next;

        tracing::info!(count, total = state.quotes.len(), "Quotes imported");
        Ok(count)
    }

    /// Export the full list as a JSON document.
    pub async fn export_json(&self) -> Result<String, SessionError> {
        Ok(self.state.lock().await.quotes.to_json_pretty()?)
    }

    /// Category selector options, `all` first.
    pub async fn categories(&self) -> Vec<String> {
        category_options(&self.state.lock().await.quotes)
    }

    /// The current category filter.
    pub async fn selected_category(&self) -> CategoryFilter {
        self.state.lock().await.selected.clone()
    }

    /// Change the category filter and persist it.
    pub async fn set_category(&self, filter: CategoryFilter) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        self.durable
            .set(SELECTED_CATEGORY_KEY, filter.as_str())
            .await?;
        tracing::debug!(category = %filter, "Category filter changed");
        state.selected = filter;
        Ok(())
    }

    /// Draw a random quote under the current filter.
    ///
    /// A drawn quote's position is recorded in the session slot.
    pub async fn show_random(&self) -> Result<Selection, SessionError> {
        let selection = {
            let state = self.state.lock().await;
            let mut rng = rand::rng();
            select_random(&state.quotes, &state.selected, &mut rng)
        };

        if let Selection::Quote { index, .. } = &selection {
            self.session_slots
                .set(LAST_QUOTE_INDEX_KEY, &index.to_string())
                .await?;
        }

        Ok(selection)
    }

    /// The quote last drawn in this session, if it is still in the list.
    pub async fn last_viewed(&self) -> Result<Option<QuoteRecord>, SessionError> {
        let index = self
            .session_slots
            .get(LAST_QUOTE_INDEX_KEY)
            .await?
            .and_then(|raw| raw.parse::<usize>().ok());

        let Some(index) = index else {
            return Ok(None);
        };
        Ok(self.state.lock().await.quotes.get(index).cloned())
    }

    /// Run one sync pass.
    ///
    /// Fetches the remote snapshot, merges it into the local list (remote
    /// wins on conflicts) and persists the result. Fails fast with
    /// [`SessionError::SyncInProgress`] if another pass is running. A remote
    /// failure leaves the local list unchanged.
    pub async fn sync_now(&self) -> Result<SyncReport, SessionError> {
        let _guard = SyncGuard::acquire(&self.syncing).ok_or(SessionError::SyncInProgress)?;
        let pass_id = Uuid::new_v4();

        self.set_status(SyncState::Syncing, None).await;
        tracing::debug!(%pass_id, remote = self.remote.name(), "Sync pass started");

        let snapshot = match self.remote.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(%pass_id, error = %e, "Sync pass failed");
                self.set_status(SyncState::Failed, Some(format!("Sync failed: {e}")))
                    .await;
                return Err(e.into());
            }
        };

        let mut state = self.state.lock().await;
        let outcome = Reconciler::merge(&state.quotes, &snapshot);

        if !outcome.is_noop() {
            if let Err(e) = write_quotes(self.durable.as_ref(), &outcome.merged).await {
                state.status = SyncStatus {
                    state: SyncState::Failed,
                    message: Some(format!("Sync failed: {e}")),
                    last_synced_at: state.status.last_synced_at,
                };
                return Err(e);
            }
        }

        let finished_at = Utc::now();
        state.quotes = outcome.merged;
        for conflict in &outcome.conflicts {
            state
                .conflicts
                .retain(|pending| pending.local.text != conflict.local.text);
            state.conflicts.push(conflict.clone());
        }
        state.status = SyncStatus {
            state: SyncState::Synced,
            message: Some("Quotes synced with server!".to_string()),
            last_synced_at: Some(finished_at),
        };

        tracing::info!(
            %pass_id,
            remote = snapshot.len(),
            added = outcome.added,
            conflicts = outcome.conflicts.len(),
            total = state.quotes.len(),
            "Sync pass finished"
        );

        Ok(SyncReport {
            added: outcome.added,
            conflicts: outcome.conflicts,
            total: state.quotes.len(),
            finished_at,
        })
    }

    /// Conflicts awaiting review.
    pub async fn pending_conflicts(&self) -> Vec<Conflict> {
        self.state.lock().await.conflicts.clone()
    }

    /// Keep the automatic remote-wins resolution.
    ///
    /// Returns the number of conflicts dismissed.
    pub async fn accept_remote(&self) -> usize {
        let mut state = self.state.lock().await;
        let count = state.conflicts.len();
        state.conflicts.clear();
        tracing::info!(count, "Accepted remote versions");
        count
    }

    /// Restore the local category of every pending conflict on both the
    /// local and the remote list.
    ///
    /// The local list is persisted before the remote list is stored.
    /// Conflicts stay pending until both writes succeed; a retry reapplies
    /// the same categories.
    ///
    /// Returns the number of conflicts resolved.
    pub async fn keep_local(&self) -> Result<usize, SessionError> {
        let _guard = SyncGuard::acquire(&self.syncing).ok_or(SessionError::SyncInProgress)?;

        let pending = self.pending_conflicts().await;
        if pending.is_empty() {
            return Ok(0);
        }

        let mut remote = QuoteList::from_records(self.remote.fetch().await?);

        let mut state = self.state.lock().await;
        let mut local = state.quotes.clone();
        let resolved = Reconciler::keep_local(&mut local, &mut remote, &state.conflicts);

        write_quotes(self.durable.as_ref(), &local).await?;
        state.quotes = local;
        self.remote.store(remote.records()).await?;
        state.conflicts.clear();

        tracing::info!(resolved, "Kept local versions");
        Ok(resolved)
    }

    /// Push local quotes the remote list lacks.
    ///
    /// Returns the number of quotes pushed.
    pub async fn push_local(&self) -> Result<usize, SessionError> {
        let _guard = SyncGuard::acquire(&self.syncing).ok_or(SessionError::SyncInProgress)?;

        let mut remote = QuoteList::from_records(self.remote.fetch().await?);
        let local = self.quotes().await;

        let pushed = Reconciler::push_local(&local, &mut remote);
        if pushed > 0 {
            self.remote.store(remote.records()).await?;
        }

        tracing::info!(pushed, remote = self.remote.name(), "Pushed local quotes");
        Ok(pushed)
    }

    /// Status of the most recent sync pass.
    pub async fn status(&self) -> SyncStatus {
        self.state.lock().await.status.clone()
    }

    async fn set_status(&self, sync_state: SyncState, message: Option<String>) {
        let mut state = self.state.lock().await;
        state.status.state = sync_state;
        state.status.message = message;
    }
}

/// Persist a quote list to the `quotes` slot.
async fn write_quotes(slots: &dyn SlotStore, quotes: &QuoteList) -> Result<(), SessionError> {
    let json = quotes.to_json()?;
    slots.set(QUOTES_KEY, &json).await?;
    Ok(())
}

async fn load_selected_category(slots: &dyn SlotStore) -> CategoryFilter {
    for key in [SELECTED_CATEGORY_KEY, LAST_CATEGORY_FILTER_KEY] {
        match slots.get(key).await {
            Ok(Some(value)) => return CategoryFilter::parse(&value),
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read category filter");
                break;
            }
        }
    }
    CategoryFilter::All
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::SimulatedRemote;
    use crate::slots::{MemorySlots, SERVER_QUOTES_KEY};
    use std::time::Duration;

    struct Harness {
        durable: Arc<MemorySlots>,
        session: QuoteSession,
    }

    async fn harness() -> Harness {
        let durable = Arc::new(MemorySlots::new());
        let remote = Arc::new(SimulatedRemote::new(durable.clone(), Duration::ZERO));
        let session = QuoteSession::start(durable.clone(), Arc::new(MemorySlots::new()), remote).await;
        Harness { durable, session }
    }

    async fn stored_quotes(slots: &MemorySlots, key: &str) -> QuoteList {
        QuoteList::from_json(&slots.get(key).await.unwrap().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn start_writes_defaults() {
        let h = harness().await;

        assert_eq!(h.session.quotes().await, QuoteList::defaults());
        assert_eq!(stored_quotes(&h.durable, QUOTES_KEY).await, QuoteList::defaults());
        assert_eq!(h.session.selected_category().await, CategoryFilter::All);
    }

    #[tokio::test]
    async fn start_reads_legacy_filter_slot() {
        let durable = Arc::new(MemorySlots::new());
        durable.set(LAST_CATEGORY_FILTER_KEY, "Life").await.unwrap();
        let remote = Arc::new(SimulatedRemote::new(durable.clone(), Duration::ZERO));

        let session = QuoteSession::start(durable, Arc::new(MemorySlots::new()), remote).await;

        assert_eq!(
            session.selected_category().await,
            CategoryFilter::Category("Life".into())
        );
    }

    #[tokio::test]
    async fn add_persists_and_rejects_empty() {
        let h = harness().await;

        h.session.add_quote("New", "Fun").await.unwrap();
        assert!(h.session.add_quote("", "x").await.is_err());
        assert!(h.session.add_quote("x", "").await.is_err());

        assert_eq!(h.session.quotes().await.len(), 4);
        assert_eq!(stored_quotes(&h.durable, QUOTES_KEY).await.len(), 4);
    }

    #[tokio::test]
    async fn sync_records_conflict_and_keep_local_restores() {
        let h = harness().await;
        h.durable
            .set(
                SERVER_QUOTES_KEY,
                r#"[{"text":"Life is what happens when you're busy making other plans.","category":"Work"}]"#,
            )
            .await
            .unwrap();

        let report = h.session.sync_now().await.unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(h.session.quotes().await.get(1).unwrap().category, "Work");
        assert_eq!(h.session.pending_conflicts().await.len(), 1);

        let resolved = h.session.keep_local().await.unwrap();
        assert_eq!(resolved, 1);
        assert_eq!(h.session.quotes().await.get(1).unwrap().category, "Life");
        assert_eq!(
            stored_quotes(&h.durable, SERVER_QUOTES_KEY).await.get(0).unwrap().category,
            "Life"
        );
        assert!(h.session.pending_conflicts().await.is_empty());

        // Both sides agree now.
        let report = h.session.sync_now().await.unwrap();
        assert!(report.conflicts.is_empty());
        assert_eq!(report.added, 0);
    }

    #[tokio::test]
    async fn sync_ignores_server_slot_with_empty_record() {
        let h = harness().await;
        h.durable
            .set(SERVER_QUOTES_KEY, r#"[{"text":"","category":""}]"#)
            .await
            .unwrap();

        let report = h.session.sync_now().await.unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(h.session.quotes().await, QuoteList::defaults());
        assert!(stored_quotes(&h.durable, QUOTES_KEY)
            .await
            .iter()
            .all(QuoteRecord::is_valid));
    }

    #[tokio::test]
    async fn start_replaces_stored_empty_record_with_defaults() {
        let durable = Arc::new(MemorySlots::new());
        durable
            .set(QUOTES_KEY, r#"[{"text":"","category":""}]"#)
            .await
            .unwrap();
        let remote = Arc::new(SimulatedRemote::new(durable.clone(), Duration::ZERO));

        let session = QuoteSession::start(durable.clone(), Arc::new(MemorySlots::new()), remote).await;

        assert_eq!(session.quotes().await, QuoteList::defaults());
        assert_eq!(stored_quotes(&durable, QUOTES_KEY).await, QuoteList::defaults());
    }

    #[tokio::test]
    async fn busy_flag_rejects_overlapping_pass() {
        let h = harness().await;
        let guard = SyncGuard::acquire(&h.session.syncing).unwrap();

        assert!(matches!(
            h.session.sync_now().await,
            Err(SessionError::SyncInProgress)
        ));

        drop(guard);
        assert!(h.session.sync_now().await.is_ok());
    }

    #[tokio::test]
    async fn last_viewed_follows_show_random() {
        let h = harness().await;
        assert_eq!(h.session.last_viewed().await.unwrap(), None);

        let selection = h.session.show_random().await.unwrap();
        let shown = selection.quote().cloned();

        assert!(shown.is_some());
        assert_eq!(h.session.last_viewed().await.unwrap(), shown);
    }
}
