//! Input normalization and length limits.
//!
//! The store coordinator only rejects empty input. The HTTP and console
//! layers additionally apply [`EntryLimits`] before calling into the store.

use thiserror::Error;

/// Rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The word is empty after trimming.
    #[error("word must not be empty")]
    EmptyWord,

    /// The definition is empty after trimming.
    #[error("definition must not be empty")]
    EmptyDefinition,

    /// The word is outside the configured length range.
    #[error("word length must be between {min} and {max} characters (got {actual})")]
    WordLength { min: usize, max: usize, actual: usize },

    /// The definition is outside the configured length range.
    #[error("definition length must be between {min} and {max} characters (got {actual})")]
    DefinitionLength { min: usize, max: usize, actual: usize },
}

/// Trims a word or definition. Returns `None` if nothing is left.
pub fn normalize(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Inclusive length bounds, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLimits {
    pub min_word: usize,
    pub max_word: usize,
    pub min_definition: usize,
    pub max_definition: usize,
}

impl Default for EntryLimits {
    fn default() -> Self {
        Self {
            min_word: 2,
            max_word: 30,
            min_definition: 5,
            max_definition: 255,
        }
    }
}

impl EntryLimits {
    /// Checks a word on its own (remove/get paths have no definition).
    pub fn validate_word(&self, word: &str) -> Result<(), ValidationError> {
        let word = normalize(word).ok_or(ValidationError::EmptyWord)?;
        let len = word.chars().count();
        if len < self.min_word || len > self.max_word {
            return Err(ValidationError::WordLength {
                min: self.min_word,
                max: self.max_word,
                actual: len,
            });
        }
        Ok(())
    }

    /// Checks a definition on its own.
    pub fn validate_definition(&self, definition: &str) -> Result<(), ValidationError> {
        let definition = normalize(definition).ok_or(ValidationError::EmptyDefinition)?;
        let len = definition.chars().count();
        if len < self.min_definition || len > self.max_definition {
            return Err(ValidationError::DefinitionLength {
                min: self.min_definition,
                max: self.max_definition,
                actual: len,
            });
        }
        Ok(())
    }

    /// Checks a full entry. The word is checked first.
    pub fn validate(&self, word: &str, definition: &str) -> Result<(), ValidationError> {
        self.validate_word(word)?;
        self.validate_definition(definition)
    }
}
