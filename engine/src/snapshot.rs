//! Serialized form of the quote list.
//!
//! The durable slot holds a compact JSON array of `{text, category}`
//! objects. Export documents use the same shape, pretty-printed.

use crate::{error::Result, Error, QuoteList};

/// Result of a soft load from a durable slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// The loaded (or default) list
    pub list: QuoteList,
    /// Whether the list came from the slot; `false` means defaults were
    /// substituted and should be written back
    pub restored: bool,
}

impl QuoteList {
    /// Serialize to compact JSON for the durable slot.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON for export documents.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// A record with an empty field makes the whole snapshot invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let list: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        if let Some(index) = list.iter().position(|r| !r.is_valid()) {
            return Err(Error::InvalidSnapshot(format!(
                "record {index} has an empty field"
            )));
        }
        Ok(list)
    }

    /// Load from raw slot contents, falling back to the defaults.
    ///
    /// Never fails: an absent slot, an unparseable one and one holding a
    /// record with an empty field are treated alike.
    pub fn load_or_default(raw: Option<&str>) -> Loaded {
        match raw.map(Self::from_json) {
            Some(Ok(list)) => Loaded {
                list,
                restored: true,
            },
            _ => Loaded {
                list: Self::defaults(),
                restored: false,
            },
        }
    }
}
