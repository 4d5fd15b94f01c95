//! Store - the in-memory quote list.
//!
//! The list is ordered by insertion and owned by a single session. It has no
//! knowledge of where it is persisted; callers write it out after every
//! mutation.

use crate::{error::Result, Error, QuoteRecord};
use serde::{Deserialize, Serialize};

/// Quotes a fresh store starts with.
const DEFAULT_QUOTES: [(&str, &str); 3] = [
    (
        "The best way to get started is to quit talking and begin doing.",
        "Motivation",
    ),
    (
        "Life is what happens when you're busy making other plans.",
        "Life",
    ),
    (
        "Success is not in what you have, but who you are.",
        "Success",
    ),
];

/// Ordered sequence of quote records.
///
/// Duplicate texts may coexist; only the reconciler collapses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteList {
    records: Vec<QuoteRecord>,
}

impl QuoteList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// The fixed default sequence used when nothing usable is persisted.
    pub fn defaults() -> Self {
        let records = DEFAULT_QUOTES
            .iter()
            .map(|(text, category)| QuoteRecord {
                text: (*text).to_string(),
                category: (*category).to_string(),
            })
            .collect();
        Self { records }
    }

    /// Wrap existing records without validation.
    pub fn from_records(records: Vec<QuoteRecord>) -> Self {
        Self { records }
    }

    /// Add a quote.
    ///
    /// Rejects the call when either field is empty after trimming; the list
    /// is left unchanged in that case.
    pub fn add(&mut self, text: &str, category: &str) -> Result<&QuoteRecord> {
        let record = QuoteRecord::new(text, category)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Import records from a JSON document.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidImport(e.to_string()))?;
        self.import_value(value)
    }

    /// Import records from an already-parsed JSON value.
    ///
    /// The value must be an array of `{text, category}` objects with
    /// non-empty strings. Fields are trimmed the same way [`QuoteList::add`]
    /// trims them. Any invalid element rejects the whole import.
    pub fn import_value(&mut self, value: serde_json::Value) -> Result<usize> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(Error::InvalidImport(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut incoming = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let raw: QuoteRecord =
                serde_json::from_value(item).map_err(|e| Error::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })?;
            let record =
                QuoteRecord::new(&raw.text, &raw.category).map_err(|e| Error::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })?;
            incoming.push(record);
        }

        let count = incoming.len();
        self.records.extend(incoming);
        Ok(count)
    }

    /// Replace the whole sequence.
    pub fn replace(&mut self, other: QuoteList) {
        self.records = other.records;
    }

    /// Get a record by position.
    pub fn get(&self, index: usize) -> Option<&QuoteRecord> {
        self.records.get(index)
    }

    /// Get a mutable record by position.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut QuoteRecord> {
        self.records.get_mut(index)
    }

    /// Position of the first record with the given text.
    pub fn position_of(&self, text: &str) -> Option<usize> {
        self.records.iter().position(|r| r.text == text)
    }

    /// Check whether any record carries the given text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.position_of(text).is_some()
    }

    /// Append a record without validation.
    pub fn push(&mut self, record: QuoteRecord) {
        self.records.push(record);
    }

    /// All records in order.
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Iterate records in order.
    pub fn iter(&self) -> impl Iterator<Item = &QuoteRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the list has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume into the underlying records.
    pub fn into_records(self) -> Vec<QuoteRecord> {
        self.records
    }
}

impl From<Vec<QuoteRecord>> for QuoteList {
    fn from(records: Vec<QuoteRecord>) -> Self {
        Self::from_records(records)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
