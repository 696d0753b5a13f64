//! Core record types and id allocation constants.

use serde::{Deserialize, Serialize};

// ── Ids ────────────────────────────────────────────────────────────

/// Sequential entry id, contiguous from 0.
pub type EntryId = u64;

/// Index identifier: a power of two at or above `1 << FIRST_INDEX_SHIFT`.
pub type IndexId = u32;

/// Sequential stream id, contiguous from 0.
pub type StreamId = u32;

// ── Constants ──────────────────────────────────────────────────────

/// Bit position of the first index id. Bits below it are reserved.
pub const FIRST_INDEX_SHIFT: u32 = 10;

/// Maximum number of indexes per store (ids 2^10 ..= 2^31).
pub const MAX_INDEXES: usize = (u32::BITS - FIRST_INDEX_SHIFT) as usize;

/// Id assigned to the `ordinal`-th index created (0-based).
pub fn index_id_for(ordinal: usize) -> Option<IndexId> {
    if ordinal >= MAX_INDEXES {
        return None;
    }
    Some(1u32 << (FIRST_INDEX_SHIFT + ordinal as u32))
}

/// Inverse of [`index_id_for`]. `None` for ids outside the allocation scheme.
pub fn index_ordinal(index_id: IndexId) -> Option<usize> {
    if !index_id.is_power_of_two() || index_id.trailing_zeros() < FIRST_INDEX_SHIFT {
        return None;
    }
    Some((index_id.trailing_zeros() - FIRST_INDEX_SHIFT) as usize)
}

// ── Token ──────────────────────────────────────────────────────────

/// Fixed-length byte value attached to an entry under one index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub index_id: IndexId,
    pub data: Vec<u8>,
}

impl Token {
    pub fn new(index_id: IndexId, data: impl Into<Vec<u8>>) -> Self {
        Self {
            index_id,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ── Entry ──────────────────────────────────────────────────────────

/// Borrowed view of one entry, handed to stream predicates.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub id: EntryId,
    pub header: &'a [u8],
    pub tokens: &'a [Token],
}

impl<'a> Entry<'a> {
    /// Token bytes carried under `index_id`, if any.
    pub fn token(&self, index_id: IndexId) -> Option<&'a [u8]> {
        self.tokens
            .iter()
            .find(|t| t.index_id == index_id)
            .map(|t| t.data.as_slice())
    }
}

/// Owned copy of a committed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub header: Vec<u8>,
    pub tokens: Vec<Token>,
}

impl EntryRecord {
    pub fn as_entry(&self) -> Entry<'_> {
        Entry {
            id: self.id,
            header: &self.header,
            tokens: &self.tokens,
        }
    }
}
