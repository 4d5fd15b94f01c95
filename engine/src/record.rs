//! Quote records, the unit of data.

use crate::{error::Result, Category, Error};
use serde::{Deserialize, Serialize};

/// A quote and the category it is filed under.
///
/// Merge identity is the `text` alone: two records with equal text are the
/// same quote even when their categories differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// The quote itself
    pub text: String,
    /// Category label used for filtering
    pub category: Category,
}

impl QuoteRecord {
    /// Create a validated record.
    ///
    /// Both fields are trimmed; an empty field after trimming is rejected.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(Error::EmptyField("text"));
        }
        if category.is_empty() {
            return Err(Error::EmptyField("category"));
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Check whether two records are the same quote (text equality).
    pub fn same_quote(&self, other: &QuoteRecord) -> bool {
        self.text == other.text
    }

    /// Check that both fields are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}
