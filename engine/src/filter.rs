//! Category filtering.

use crate::{QuoteList, ALL_CATEGORIES};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which categories are eligible for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every record is eligible
    #[default]
    All,
    /// Only records with exactly this category
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied value; blank and `"all"` mean all.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Check whether a category passes this filter.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(selected) => selected == category,
        }
    }

    /// The value as stored in the durable slot.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

/// Options for a category selector: `"all"` first, then each distinct
/// category in order of first occurrence.
pub fn category_options(list: &QuoteList) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for record in list.iter() {
        if !options.iter().any(|c| c == &record.category) {
            options.push(record.category.clone());
        }
    }
    options
}

/// Positions of the records that pass the filter.
pub fn filter_indices(list: &QuoteList, filter: &CategoryFilter) -> Vec<usize> {
    list.iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(&record.category))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuoteRecord;

    fn sample() -> QuoteList {
        QuoteList::from_records(vec![
            QuoteRecord::new("A", "Life").unwrap(),
            QuoteRecord::new("B", "Work").unwrap(),
            QuoteRecord::new("C", "Life").unwrap(),
        ])
    }

    #[test]
    fn options_start_with_all_in_first_seen_order() {
        assert_eq!(category_options(&sample()), vec!["all", "Life", "Work"]);
        assert_eq!(category_options(&QuoteList::new()), vec!["all"]);
    }

    #[test]
    fn filter_all_keeps_everything() {
        assert_eq!(filter_indices(&sample(), &CategoryFilter::All), vec![0, 1, 2]);
    }

    #[test]
    fn filter_by_category() {
        let filter = CategoryFilter::parse("Life");
        assert_eq!(filter_indices(&sample(), &filter), vec![0, 2]);
    }

    #[test]
    fn filter_is_case_sensitive() {
        let filter = CategoryFilter::parse("life");
        assert!(filter_indices(&sample(), &filter).is_empty());
    }

    #[test]
    fn parse_sentinel() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Work "),
            CategoryFilter::Category("Work".into())
        );
    }

    #[test]
    fn serde_as_plain_string() {
        let filter = CategoryFilter::Category("Work".into());
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#""Work""#);
        let parsed: CategoryFilter = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(parsed, CategoryFilter::All);
    }
}
