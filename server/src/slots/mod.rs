//! Named key-value slots.
//!
//! Durable slots survive restarts and back the quote list, the simulated
//! remote copy and the selected category. Session slots live only as long as
//! the process.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

/// Slot holding the local quote list.
pub const QUOTES_KEY: &str = "quotes";
/// Slot holding the simulated remote quote list.
pub const SERVER_QUOTES_KEY: &str = "serverQuotes";
/// Slot holding the selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Older name of the selected category slot, read as a fallback.
pub const LAST_CATEGORY_FILTER_KEY: &str = "lastCategoryFilter";
/// Session slot holding the position of the last displayed quote.
pub const LAST_QUOTE_INDEX_KEY: &str = "lastQuoteIndex";

/// Slot storage errors.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// String-keyed storage of JSON-serialized values.
///
/// Writers do not coordinate: the last write to a key wins.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read a slot.
    async fn get(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Write a slot, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), SlotError>;

    /// Remove a slot.
    async fn remove(&self, key: &str) -> Result<(), SlotError>;

    /// Release underlying resources.
    async fn close(&self) {}
}
