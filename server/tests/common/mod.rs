//! Shared test fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use quotesync_engine::QuoteRecord;
use quotesync_server::remote::{RemoteError, RemoteSource};
use quotesync_server::session::QuoteSession;
use quotesync_server::slots::MemorySlots;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A remote whose snapshot, failures and timing are driven by the test.
#[derive(Default)]
pub struct ScriptedRemote {
    snapshot: Mutex<Vec<QuoteRecord>>,
    fail: AtomicBool,
    fail_store: AtomicBool,
    fetches: AtomicUsize,
    stores: AtomicUsize,
    /// When set, `fetch` signals `entered` and waits for `release`
    hold: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl ScriptedRemote {
    pub fn new(snapshot: Vec<QuoteRecord>) -> Arc<Self> {
        let remote = Self::default();
        *remote.snapshot.lock().unwrap() = snapshot;
        Arc::new(remote)
    }

    pub fn set_snapshot(&self, snapshot: Vec<QuoteRecord>) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    pub fn snapshot(&self) -> Vec<QuoteRecord> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_store_failing(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub fn set_hold(&self, hold: bool) {
        self.hold.store(hold, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for ScriptedRemote {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch(&self) -> Result<Vec<QuoteRecord>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.hold.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(RemoteError::Status(503));
        }
        Ok(self.snapshot())
    }

    async fn store(&self, quotes: &[QuoteRecord]) -> Result<(), RemoteError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(RemoteError::Status(503));
        }
        self.set_snapshot(quotes.to_vec());
        Ok(())
    }
}

pub fn q(text: &str, category: &str) -> QuoteRecord {
    QuoteRecord::new(text, category).unwrap()
}

/// Start a session over in-memory slots seeded with `local`.
pub async fn session_with(
    local: &[QuoteRecord],
    remote: Arc<ScriptedRemote>,
) -> (Arc<QuoteSession>, Arc<MemorySlots>) {
    use quotesync_server::slots::{SlotStore, QUOTES_KEY};

    let durable = Arc::new(MemorySlots::new());
    durable
        .set(QUOTES_KEY, &serde_json::to_string(local).unwrap())
        .await
        .unwrap();

    let session =
        QuoteSession::start(durable.clone(), Arc::new(MemorySlots::new()), remote).await;
    (Arc::new(session), durable)
}
