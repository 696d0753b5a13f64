//! Point-in-time size statistics for a store.

use serde::{Deserialize, Serialize};

use crate::entry_log::EntryLog;
use crate::index::IndexManager;
use crate::stream::StreamRegistry;
use crate::types::{IndexId, StreamId};

/// Shape and fill of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub index_id: IndexId,
    pub token_len: usize,
    pub max_prefix_depth: usize,
    /// Trie nodes including the root.
    pub node_count: usize,
    /// Distinct leaf suffix buckets.
    pub bucket_count: usize,
    /// Total posting-list elements (one per indexed token).
    pub posting_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    pub stream_id: StreamId,
    pub match_count: usize,
}

/// Snapshot returned by [`LogStore::stats`](crate::LogStore::stats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub entry_count: u64,
    pub header_bytes: usize,
    pub token_bytes: usize,
    pub indexes: Vec<IndexStats>,
    pub streams: Vec<StreamStats>,
}

impl StoreStats {
    pub(crate) fn collect(log: &EntryLog, indexes: &IndexManager, streams: &StreamRegistry) -> Self {
        Self {
            entry_count: log.count(),
            header_bytes: log.header_bytes(),
            token_bytes: log.token_bytes(),
            indexes: indexes
                .iter()
                .map(|(index_id, trie)| IndexStats {
                    index_id,
                    token_len: trie.token_len(),
                    max_prefix_depth: trie.max_prefix_depth(),
                    node_count: trie.node_count(),
                    bucket_count: trie.bucket_count(),
                    posting_count: trie.posting_count(),
                })
                .collect(),
            streams: streams
                .match_counts()
                .enumerate()
                .map(|(id, match_count)| StreamStats {
                    stream_id: id as StreamId,
                    match_count,
                })
                .collect(),
        }
    }

    /// Stats of one index, if present.
    pub fn index(&self, index_id: IndexId) -> Option<&IndexStats> {
        self.indexes.iter().find(|s| s.index_id == index_id)
    }
}
