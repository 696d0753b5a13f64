//! LogStore -- the thread-safe facade over entry log, indexes and streams.
//!
//! # Architecture
//!
//! - One `RwLock<StoreState>` guards every component
//! - Writers (`add_index`, `add_stream`, `insert`) hold the write lock for
//!   the whole operation, so id assignment, indexing and stream matching
//!   of one insert are a single atomic unit
//! - Readers (`get`, `lookup`, `filter`, `get_stream`, `stats`) share the
//!   read lock only for the duration of the call and only ever see fully
//!   committed inserts; nothing they return borrows the lock
//!
//! # Insert pipeline
//!
//! 1. validate header and token set -- nothing is written on failure
//! 2. evaluate every stream predicate against the staged entry
//! 3. commit: append to the log, index each token, record stream hits
//!
//! Step 3 cannot fail, so a rejected insert (or a panicking predicate)
//! leaves the store exactly as it was.
//!
//! # Usage
//!
//! ```
//! use logstore::{BasicFilter, FilterQuery, LogStore, Token};
//!
//! let store = LogStore::new();
//! let method = store.add_index(4, 2).unwrap();
//! let errors = store.add_stream(|e: &logstore::Entry<'_>| e.header.starts_with(b"5"));
//!
//! let id = store.insert(b"500 upstream timeout", &[Token::new(method, *b"POST")]).unwrap();
//! store.insert(b"200 ok", &[Token::new(method, *b"GET ")]).unwrap();
//!
//! let hits = store.filter(&FilterQuery::single(BasicFilter::prefix(method, *b"PO"))).unwrap();
//! assert_eq!(hits, vec![id]);
//! assert_eq!(&*store.get_stream(errors).unwrap(), &[id]);
//! ```

use std::ops::Deref;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StoreConfig;
use crate::entry_log::EntryLog;
use crate::error::Result;
use crate::filter::{self, FilterQuery};
use crate::index::IndexManager;
use crate::stats::StoreStats;
use crate::stream::{StreamPredicate, StreamRegistry};
use crate::types::{Entry, EntryId, EntryRecord, IndexId, StreamId, Token};

#[derive(Debug)]
struct StoreState {
    log: EntryLog,
    indexes: IndexManager,
    streams: StreamRegistry,
}

/// In-process append-only log store.
///
/// `Send + Sync`; share it across threads with `Arc<LogStore>`.
#[derive(Debug)]
pub struct LogStore {
    config: StoreConfig,
    state: RwLock<StoreState>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore {
    /// Store with [`StoreConfig::default`].
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Store with a validated custom configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        let state = StoreState {
            log: EntryLog::with_capacity(config.expected_entries),
            indexes: IndexManager::new(),
            streams: StreamRegistry::new(),
        };
        Self {
            config,
            state: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // A poisoned lock only means a predicate panicked before commit;
    // the state itself is untouched, so the flag is cleared on recovery.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering poisoned store lock (read)");
            let guard = PoisonError::into_inner(poisoned);
            self.state.clear_poison();
            guard
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering poisoned store lock (write)");
            let guard = PoisonError::into_inner(poisoned);
            self.state.clear_poison();
            guard
        })
    }

    // -- Configuration --------------------------------------------------------

    /// Create an index over `token_len`-byte tokens whose first
    /// `max_prefix_depth` bytes become trie levels.
    ///
    /// Ids are `1024, 2048, 4096, ...` in call order; at most 22 indexes.
    pub fn add_index(&self, token_len: usize, max_prefix_depth: usize) -> Result<IndexId> {
        let mut state = self.write();
        match state.indexes.add_index(token_len, max_prefix_depth) {
            Ok(index_id) => {
                tracing::debug!(index_id, token_len, max_prefix_depth, "index added");
                Ok(index_id)
            }
            Err(e) => {
                tracing::debug!("add_index rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Register a standing predicate. Ids are sequential from 0.
    ///
    /// The stream sees every entry inserted after this call returns.
    pub fn add_stream<P>(&self, predicate: P) -> StreamId
    where
        P: StreamPredicate + 'static,
    {
        let mut state = self.write();
        let stream_id = state.streams.add_stream(Box::new(predicate));
        tracing::debug!(stream_id, from_entry = state.log.next_id(), "stream added");
        stream_id
    }

    // -- Write ----------------------------------------------------------------

    /// Append an entry, returning its id.
    ///
    /// All-or-nothing: on error no id is consumed and no index or stream
    /// changes.
    pub fn insert(&self, header: &[u8], tokens: &[Token]) -> Result<EntryId> {
        let mut state = self.write();

        if let Err(e) = self.validate_insert(&state, header, tokens) {
            tracing::debug!("insert rejected: {}", e);
            return Err(e);
        }

        let staged = Entry {
            id: state.log.next_id(),
            header,
            tokens,
        };
        let hits = state.streams.evaluate(&staged);

        let id = state.log.append(header, tokens);
        state.indexes.index_entry(id, tokens);
        state.streams.record(id, &hits);

        tracing::trace!(entry_id = id, stream_hits = hits.len(), "entry committed");
        Ok(id)
    }

    fn validate_insert(&self, state: &StoreState, header: &[u8], tokens: &[Token]) -> Result<()> {
        self.config.check_header(header)?;
        state
            .indexes
            .validate_tokens(tokens, self.config.require_all_indexes)
    }

    // -- Read -----------------------------------------------------------------

    /// Copy the header of `id` into `out`. False when `id >= count()`.
    pub fn get(&self, id: EntryId, out: &mut Vec<u8>) -> bool {
        self.read().log.copy_header(id, out)
    }

    /// Owned copy of the header of `id`.
    pub fn header(&self, id: EntryId) -> Option<Vec<u8>> {
        self.read().log.header(id).map(<[u8]>::to_vec)
    }

    /// Owned copy of the header and tokens of `id`.
    pub fn get_entry(&self, id: EntryId) -> Option<EntryRecord> {
        self.read().log.record(id)
    }

    /// Number of committed entries.
    pub fn count(&self) -> u64 {
        self.read().log.count()
    }

    /// Entries whose token under `index_id` starts with the first
    /// `prefix_len` bytes of `prefix`, ascending.
    pub fn lookup(&self, index_id: IndexId, prefix: &[u8], prefix_len: usize) -> Result<Vec<EntryId>> {
        self.read().indexes.lookup(index_id, prefix, prefix_len)
    }

    /// Evaluate a DNF query. Result is ascending and deduplicated.
    pub fn filter(&self, query: &FilterQuery) -> Result<Vec<EntryId>> {
        let state = self.read();
        filter::evaluate(&state.indexes, query).map_err(|e| {
            tracing::debug!("filter rejected: {}", e);
            e
        })
    }

    /// Matches of stream `id`, in insertion order.
    ///
    /// The view is a snapshot copied under the read lock; later inserts
    /// do not show up in it.
    pub fn get_stream(&self, id: StreamId) -> Result<StreamView> {
        let matches = self.read().streams.matches(id)?.to_vec();
        Ok(StreamView { id, matches })
    }

    /// Allocated index ids in creation order.
    pub fn index_ids(&self) -> Vec<IndexId> {
        self.read().indexes.index_ids().collect()
    }

    pub fn index_count(&self) -> usize {
        self.read().indexes.len()
    }

    pub fn stream_count(&self) -> usize {
        self.read().streams.len()
    }

    pub fn stats(&self) -> StoreStats {
        let state = self.read();
        StoreStats::collect(&state.log, &state.indexes, &state.streams)
    }
}

/// Owned, read-only snapshot of one stream's matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamView {
    id: StreamId,
    matches: Vec<EntryId>,
}

impl StreamView {
    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn into_vec(self) -> Vec<EntryId> {
        self.matches
    }
}

impl Deref for StreamView {
    type Target = [EntryId];

    fn deref(&self) -> &[EntryId] {
        &self.matches
    }
}
