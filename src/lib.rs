//! logstore -- in-process append-only structured log store.
//!
//! Entries (an opaque header plus fixed-length tokens) are appended to a
//! log and receive sequential ids. Each token is indexed in a bounded-depth
//! prefix trie, so entries can be found by token prefix across several
//! indexes with DNF filter queries. Standing predicates ("streams") are
//! evaluated once per entry at insert time and keep an ordered list of
//! the entries they accepted.
//!
//! See [`LogStore`] for the entry point.

pub mod config;
pub mod entry_log;
pub mod error;
pub mod filter;
pub mod index;
pub mod stats;
pub mod store;
pub mod stream;
pub mod types;

pub use config::StoreConfig;
pub use error::{ErrorKind, LogStoreError, Result};
pub use filter::{BasicFilter, Conjunction, FilterQuery};
pub use stats::{IndexStats, StoreStats, StreamStats};
pub use store::{LogStore, StreamView};
pub use stream::StreamPredicate;
pub use types::{Entry, EntryId, EntryRecord, IndexId, StreamId, Token, MAX_INDEXES};
