//! Core type definitions for Lexicon.
//!
//! This crate defines the backend-agnostic types shared by every layer:
//! - [`WordEntry`], the `(word, definition)` pair stored in the dictionary
//! - Input normalization and the length limits enforced at the edges
//!
//! Storage adapters and the store coordinator depend on this crate; it has
//! no knowledge of either.

mod entry;
mod validation;

pub use entry::WordEntry;
pub use validation::{normalize, EntryLimits, ValidationError};
