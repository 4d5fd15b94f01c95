//! Simulated server backed by a durable slot.

use super::{RemoteError, RemoteSource};
use crate::slots::{SlotStore, SERVER_QUOTES_KEY};
use async_trait::async_trait;
use quotesync_engine::{QuoteList, QuoteRecord};
use std::sync::Arc;
use std::time::Duration;

/// Artificial latency used when none is configured.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(200);

/// Remote source that keeps the "server" copy in the `serverQuotes` slot.
pub struct SimulatedRemote {
    slots: Arc<dyn SlotStore>,
    latency: Duration,
}

impl SimulatedRemote {
    /// Create a simulated remote over the given slot storage.
    pub fn new(slots: Arc<dyn SlotStore>, latency: Duration) -> Self {
        Self { slots, latency }
    }
}

#[async_trait]
impl RemoteSource for SimulatedRemote {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn fetch(&self) -> Result<Vec<QuoteRecord>, RemoteError> {
        tokio::time::sleep(self.latency).await;

        let Some(raw) = self.slots.get(SERVER_QUOTES_KEY).await? else {
            return Ok(Vec::new());
        };

        match QuoteList::from_json(&raw) {
            Ok(list) => Ok(list.into_records()),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable server quotes");
                Ok(Vec::new())
            }
        }
    }

    async fn store(&self, quotes: &[QuoteRecord]) -> Result<(), RemoteError> {
        tokio::time::sleep(self.latency).await;

        let json = serde_json::to_string(quotes).map_err(|e| RemoteError::Encode(e.to_string()))?;
        self.slots.set(SERVER_QUOTES_KEY, &json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::MemorySlots;

    #[tokio::test]
    async fn missing_slot_is_empty_remote() {
        let remote = SimulatedRemote::new(Arc::new(MemorySlots::new()), Duration::ZERO);
        assert!(remote.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_slot_is_empty_remote() {
        let slots = Arc::new(MemorySlots::new());
        slots.set(SERVER_QUOTES_KEY, "{oops").await.unwrap();

        let remote = SimulatedRemote::new(slots, Duration::ZERO);
        assert!(remote.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn slot_with_empty_record_is_empty_remote() {
        let slots = Arc::new(MemorySlots::new());
        slots
            .set(
                SERVER_QUOTES_KEY,
                r#"[{"text":"A","category":"Work"},{"text":"","category":""}]"#,
            )
            .await
            .unwrap();

        let remote = SimulatedRemote::new(slots, Duration::ZERO);
        assert!(remote.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_then_fetch() {
        let slots = Arc::new(MemorySlots::new());
        let remote = SimulatedRemote::new(slots.clone(), Duration::ZERO);
        let quotes = vec![QuoteRecord::new("A", "Work").unwrap()];

        remote.store(&quotes).await.unwrap();

        assert_eq!(remote.fetch().await.unwrap(), quotes);
        assert_eq!(
            slots.get(SERVER_QUOTES_KEY).await.unwrap().as_deref(),
            Some(r#"[{"text":"A","category":"Work"}]"#)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_waits_for_latency() {
        let remote = SimulatedRemote::new(Arc::new(MemorySlots::new()), Duration::from_millis(150));
        let started = tokio::time::Instant::now();

        remote.fetch().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}
