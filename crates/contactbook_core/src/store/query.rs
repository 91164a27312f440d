//! Query predicates and name orderings over contacts.

use crate::model::contact::Contact;
use std::cmp::Ordering;

/// Textual predicate applied to contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactQuery {
    /// Matches when the term occurs in name, phone or category.
    Substring(String),
    /// Matches when the category equals the value exactly.
    Category(String),
}

impl ContactQuery {
    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            Self::Substring(term) => contact.contains(term),
            Self::Category(category) => contact.category == *category,
        }
    }
}

/// Comparison used by sorted name projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrdering {
    /// Byte-wise comparison: every uppercase ASCII letter sorts before
    /// every lowercase one (`"Amy" < "Bob" < "alice"`).
    #[default]
    Lexicographic,
    /// Compares lowercased names, falling back to byte order on ties so the
    /// result stays deterministic.
    CaseInsensitive,
}

impl NameOrdering {
    pub fn compare(self, left: &str, right: &str) -> Ordering {
        match self {
            Self::Lexicographic => left.cmp(right),
            Self::CaseInsensitive => left
                .to_lowercase()
                .cmp(&right.to_lowercase())
                .then_with(|| left.cmp(right)),
        }
    }
}
