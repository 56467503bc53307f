//! The dictionary record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dictionary record. Unique by `word`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    /// The key. Immutable once stored.
    pub word: String,
    /// The definition. May be replaced in place.
    pub definition: String,
}

impl WordEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
        }
    }
}

impl fmt::Display for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.word, self.definition)
    }
}
