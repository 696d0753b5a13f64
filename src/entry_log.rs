//! Append-only entry log.
//!
//! Headers and token bytes live in two contiguous byte arenas; per-entry
//! end offsets locate each entry's slice. Ids are positions in the offset
//! vectors, so they are contiguous from 0 and never reused.
//!
//! NOT Send+Sync-guarded on its own -- `LogStore` owns it behind its lock.

use crate::types::{EntryId, EntryRecord, IndexId, Token};

/// Location of one token inside the token arena.
#[derive(Debug, Clone, Copy)]
struct TokenSlot {
    index_id: IndexId,
    /// End offset (exclusive) in `token_bytes`.
    end: usize,
}

#[derive(Debug, Default)]
pub struct EntryLog {
    header_bytes: Vec<u8>,
    /// End offset (exclusive) of entry i's header in `header_bytes`.
    header_ends: Vec<usize>,

    token_bytes: Vec<u8>,
    token_slots: Vec<TokenSlot>,
    /// End index (exclusive) of entry i's tokens in `token_slots`.
    token_ends: Vec<usize>,
}

impl EntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the offset vectors for `entries` entries.
    pub fn with_capacity(entries: usize) -> Self {
        Self {
            header_ends: Vec::with_capacity(entries),
            token_ends: Vec::with_capacity(entries),
            ..Self::default()
        }
    }

    // -- Write ----------------------------------------------------------------

    /// Id the next `append` will assign.
    pub fn next_id(&self) -> EntryId {
        self.header_ends.len() as EntryId
    }

    /// Store a copy of `header` and `tokens`, returning the assigned id.
    ///
    /// Validation is the caller's job; this never fails.
    pub fn append(&mut self, header: &[u8], tokens: &[Token]) -> EntryId {
        let id = self.next_id();

        self.header_bytes.extend_from_slice(header);
        self.header_ends.push(self.header_bytes.len());

        for token in tokens {
            self.token_bytes.extend_from_slice(&token.data);
            self.token_slots.push(TokenSlot {
                index_id: token.index_id,
                end: self.token_bytes.len(),
            });
        }
        self.token_ends.push(self.token_slots.len());

        id
    }

    // -- Read -----------------------------------------------------------------

    /// Number of entries stored.
    pub fn count(&self) -> u64 {
        self.header_ends.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.header_ends.is_empty()
    }

    /// Stored header bytes for `id`.
    pub fn header(&self, id: EntryId) -> Option<&[u8]> {
        let idx = self.position(id)?;
        let start = if idx == 0 { 0 } else { self.header_ends[idx - 1] };
        Some(&self.header_bytes[start..self.header_ends[idx]])
    }

    /// Copy the header of `id` into `out` (replacing its contents).
    ///
    /// Returns false, leaving `out` untouched, when `id` is out of range.
    pub fn copy_header(&self, id: EntryId, out: &mut Vec<u8>) -> bool {
        match self.header(id) {
            Some(header) => {
                out.clear();
                out.extend_from_slice(header);
                true
            }
            None => false,
        }
    }

    /// Iterator over the tokens of `id` as `(index_id, bytes)`.
    pub fn tokens(&self, id: EntryId) -> Option<impl Iterator<Item = (IndexId, &[u8])> + '_> {
        let idx = self.position(id)?;
        let first = if idx == 0 { 0 } else { self.token_ends[idx - 1] };
        let slots = &self.token_slots[first..self.token_ends[idx]];
        let mut start = if first == 0 { 0 } else { self.token_slots[first - 1].end };
        Some(slots.iter().map(move |slot| {
            let bytes = &self.token_bytes[start..slot.end];
            start = slot.end;
            (slot.index_id, bytes)
        }))
    }

    /// Owned copy of entry `id`.
    pub fn record(&self, id: EntryId) -> Option<EntryRecord> {
        let header = self.header(id)?.to_vec();
        let tokens = self
            .tokens(id)?
            .map(|(index_id, bytes)| Token::new(index_id, bytes))
            .collect();
        Some(EntryRecord { id, header, tokens })
    }

    /// Total header bytes stored.
    pub fn header_bytes(&self) -> usize {
        self.header_bytes.len()
    }

    /// Total token bytes stored.
    pub fn token_bytes(&self) -> usize {
        self.token_bytes.len()
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        let idx = usize::try_from(id).ok()?;
        (idx < self.header_ends.len()).then_some(idx)
    }
}
