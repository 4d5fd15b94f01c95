//! # Quotesync Engine
//!
//! Quote list storage and deterministic reconciliation for a local-first
//! quote collection.
//!
//! This crate holds the pure logic: the quote list and its validation, the
//! merge of a remote snapshot into the local list, category filtering and
//! random selection. Persistence, remote access and scheduling live in the
//! service crate.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or platform
//! - **Deterministic**: Same inputs always produce same outputs (randomness
//!   is injected by the caller)
//! - **Testable**: Pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`QuoteRecord`] is a `text`/`category` pair. Two records are the same
//! quote when their text matches, whatever their category.
//!
//! ### Reconciliation
//!
//! The [`Reconciler`] merges a remote snapshot into the local list. Unknown
//! remote quotes are appended; a text match with a different category is a
//! [`Conflict`], resolved in favour of the remote record. Conflicts can be
//! reversed afterwards with [`Reconciler::keep_local`].
//!
//! ## Quick Start
//!
//! ```rust
//! use quotesync_engine::{QuoteList, QuoteRecord, Reconciler};
//!
//! let mut local = QuoteList::new();
//! local.add("A", "Life").unwrap();
//!
//! let remote = vec![QuoteRecord::new("A", "Work").unwrap()];
//! let outcome = Reconciler::merge(&local, &remote);
//!
//! assert_eq!(outcome.merged.get(0).unwrap().category, "Work");
//! assert_eq!(outcome.conflicts.len(), 1);
//! ```
//!
//! ## Persistence
//!
//! Use [`QuoteList::to_json`] and [`QuoteList::load_or_default`] to move the
//! list in and out of a durable slot.

pub mod error;
pub mod filter;
pub mod reconcile;
pub mod record;
pub mod select;
pub mod snapshot;
pub mod store;

// Re-export main types at crate root
pub use error::Error;
pub use filter::{category_options, filter_indices, CategoryFilter};
pub use reconcile::{Conflict, MergeOutcome, Reconciler};
pub use record::QuoteRecord;
pub use select::{select_random, Selection};
pub use snapshot::Loaded;
pub use store::QuoteList;

/// Type aliases for clarity
pub type Category = String;

/// Selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";
