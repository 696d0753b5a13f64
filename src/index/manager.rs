//! Index manager -- owns every prefix trie of a store.
//!
//! Index ids are single-bit masks (`1 << (10 + ordinal)`), so a set of
//! indexes fits in one `u32` and token-set validation is a few bit ops.

use crate::error::{LogStoreError, Result};
use crate::index::trie::PrefixTrie;
use crate::types::{index_id_for, index_ordinal, EntryId, IndexId, Token, MAX_INDEXES};

#[derive(Debug, Default)]
pub struct IndexManager {
    /// Trie of the index with ordinal `i` at position `i`.
    indexes: Vec<PrefixTrie>,
    /// OR of every allocated index id.
    id_mask: u32,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index for tokens of `token_len` bytes, materializing the
    /// first `max_prefix_depth` bytes as trie levels.
    pub fn add_index(&mut self, token_len: usize, max_prefix_depth: usize) -> Result<IndexId> {
        if token_len == 0 {
            return Err(LogStoreError::ZeroTokenLength);
        }
        if max_prefix_depth == 0 || max_prefix_depth > token_len {
            return Err(LogStoreError::InvalidPrefixDepth { token_len, max_prefix_depth });
        }
        let index_id = index_id_for(self.indexes.len())
            .ok_or(LogStoreError::IndexBudgetExhausted(MAX_INDEXES))?;

        self.indexes.push(PrefixTrie::new(token_len, max_prefix_depth));
        self.id_mask |= index_id;
        Ok(index_id)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Allocated ids in creation order.
    pub fn index_ids(&self) -> impl Iterator<Item = IndexId> + '_ {
        (0..self.indexes.len()).filter_map(index_id_for)
    }

    /// `(index_id, trie)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (IndexId, &PrefixTrie)> + '_ {
        self.index_ids().zip(self.indexes.iter())
    }

    pub fn get(&self, index_id: IndexId) -> Result<&PrefixTrie> {
        index_ordinal(index_id)
            .and_then(|ordinal| self.indexes.get(ordinal))
            .ok_or(LogStoreError::UnknownIndex(index_id))
    }

    // -- Insert path ----------------------------------------------------------

    /// Check a token set before anything is written.
    ///
    /// Every token must name a known index and match its length; no index
    /// may appear twice. With `require_all`, every index must appear.
    pub fn validate_tokens(&self, tokens: &[Token], require_all: bool) -> Result<()> {
        let mut seen = 0u32;
        for token in tokens {
            let trie = self.get(token.index_id)?;
            if token.len() != trie.token_len() {
                return Err(LogStoreError::TokenLengthMismatch {
                    index_id: token.index_id,
                    expected: trie.token_len(),
                    actual: token.len(),
                });
            }
            if seen & token.index_id != 0 {
                return Err(LogStoreError::DuplicateToken(token.index_id));
            }
            seen |= token.index_id;
        }

        let missing = self.id_mask & !seen;
        if require_all && missing != 0 {
            // lowest missing index first
            return Err(LogStoreError::MissingToken(1 << missing.trailing_zeros()));
        }
        Ok(())
    }

    /// Index every token of `entry_id`. Tokens must already be validated.
    pub fn index_entry(&mut self, entry_id: EntryId, tokens: &[Token]) {
        for token in tokens {
            if let Some(trie) = index_ordinal(token.index_id).and_then(|o| self.indexes.get_mut(o)) {
                trie.insert(entry_id, &token.data);
            }
        }
    }

    // -- Query path -----------------------------------------------------------

    /// Entries whose token under `index_id` starts with the first
    /// `prefix_len` bytes of `prefix`. Ascending, no duplicates.
    pub fn lookup(&self, index_id: IndexId, prefix: &[u8], prefix_len: usize) -> Result<Vec<EntryId>> {
        let trie = self.get(index_id)?;
        if prefix_len == 0 || prefix_len > trie.token_len() {
            return Err(LogStoreError::InvalidPrefixLength {
                index_id,
                prefix_len,
                token_len: trie.token_len(),
            });
        }
        if prefix.len() < prefix_len {
            return Err(LogStoreError::PrefixTooShort {
                index_id,
                prefix_len,
                actual: prefix.len(),
            });
        }
        Ok(trie.lookup(&prefix[..prefix_len]))
    }
}
