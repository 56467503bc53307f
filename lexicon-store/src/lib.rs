//! Store coordinator for Lexicon.
//!
//! [`WordStore`] is the single authority for reading and mutating the
//! dictionary. It owns the [`lexicon_storage::WordRepository`] it persists
//! through and keeps an in-memory snapshot that always matches the last
//! successful repository write.
//!
//! # Concurrency
//!
//! - Mutations (`add`, `edit`, `remove`) hold an exclusive lock for their
//!   whole check-then-write sequence, so they are linearized.
//! - Reads (`get`, `list`) share the lock and see the snapshot either fully
//!   before or fully after any mutation.
//!
//! # Completion notifications
//!
//! After each durable mutation a [`MutationEvent`] is handed to a single
//! background task over a bounded channel. That task refreshes an optional
//! [`SnapshotSink`] (for example a [`CsvMirror`]). Sink failures are logged
//! and never reach the caller of the mutation.

mod error;
mod notify;
mod store;

pub use error::{StoreError, StoreResult};
pub use notify::{CsvMirror, MutationEvent, MutationKind, SnapshotSink};
pub use store::WordStore;
