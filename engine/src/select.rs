//! Random quote selection.

use crate::{filter::filter_indices, CategoryFilter, QuoteList, QuoteRecord};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome of a display request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Selection {
    /// A record was drawn
    Quote {
        /// Position in the full local list
        index: usize,
        /// The drawn record
        quote: QuoteRecord,
    },
    /// The store has records but none match the filter
    NoQuotesInCategory,
    /// The store has no records at all
    Empty,
}

impl Selection {
    /// The drawn record, if any.
    pub fn quote(&self) -> Option<&QuoteRecord> {
        match self {
            Self::Quote { quote, .. } => Some(quote),
            _ => None,
        }
    }
}

/// Draw a record uniformly from those passing the filter.
pub fn select_random<R: Rng + ?Sized>(
    list: &QuoteList,
    filter: &CategoryFilter,
    rng: &mut R,
) -> Selection {
    if list.is_empty() {
        return Selection::Empty;
    }

    let eligible = filter_indices(list, filter);
    if eligible.is_empty() {
        return Selection::NoQuotesInCategory;
    }

    let index = eligible[rng.random_range(0..eligible.len())];
    match list.get(index) {
        Some(quote) => Selection::Quote {
            index,
            quote: quote.clone(),
        },
        None => Selection::Empty,
    }
}
