//! Remote quote sources.
//!
//! The remote list is the external source of truth that sync passes merge
//! from. It is either a placeholder HTTP endpoint or a durable slot standing
//! in for a server.

mod http;
mod simulated;

pub use http::*;
pub use simulated::*;

use crate::slots::SlotError;
use async_trait::async_trait;
use quotesync_engine::QuoteRecord;

/// Category given to quotes mapped from remote posts.
pub const SERVER_CATEGORY: &str = "Server";

/// Remote access errors.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("Encode error: {0}")]
    Encode(String),
}

/// A remote copy of the quote list.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the current remote snapshot, in remote order.
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, RemoteError>;

    /// Replace the remote list.
    async fn store(&self, quotes: &[QuoteRecord]) -> Result<(), RemoteError>;
}
