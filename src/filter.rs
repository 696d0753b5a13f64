//! Disjunctive-normal-form filter queries.
//!
//! A [`FilterQuery`] is an OR of [`Conjunction`]s; a conjunction is an AND
//! of [`BasicFilter`]s; a basic filter matches an entry when the entry's
//! token under `index_id` starts with the first `prefix_len` bytes of
//! `prefix`.
//!
//! ```
//! use logstore::{BasicFilter, Conjunction, FilterQuery};
//!
//! let query = FilterQuery::new()
//!     .or(Conjunction::new()
//!         .and(BasicFilter::prefix(1024, *b"GET "))
//!         .and(BasicFilter::prefix(2048, [10, 0])))
//!     .or(Conjunction::single(BasicFilter::prefix(1024, *b"POST")));
//! assert_eq!(query.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LogStoreError, Result};
use crate::index::{postings, IndexManager};
use crate::types::{EntryId, IndexId};

/// Prefix match against one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicFilter {
    pub index_id: IndexId,
    pub prefix: Vec<u8>,
    /// Number of leading bytes of `prefix` that must match.
    pub prefix_len: usize,
}

impl BasicFilter {
    pub fn new(index_id: IndexId, prefix: impl Into<Vec<u8>>, prefix_len: usize) -> Self {
        Self {
            index_id,
            prefix: prefix.into(),
            prefix_len,
        }
    }

    /// Match on the whole of `prefix`.
    pub fn prefix(index_id: IndexId, prefix: impl Into<Vec<u8>>) -> Self {
        let prefix = prefix.into();
        let prefix_len = prefix.len();
        Self {
            index_id,
            prefix,
            prefix_len,
        }
    }

    fn lookup(&self, indexes: &IndexManager) -> Result<Vec<EntryId>> {
        indexes.lookup(self.index_id, &self.prefix, self.prefix_len)
    }
}

/// AND of basic filters. Must be non-empty when evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conjunction {
    filters: Vec<BasicFilter>,
}

impl Conjunction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(filter: BasicFilter) -> Self {
        Self {
            filters: vec![filter],
        }
    }

    pub fn and(mut self, filter: BasicFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: BasicFilter) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[BasicFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl From<Vec<BasicFilter>> for Conjunction {
    fn from(filters: Vec<BasicFilter>) -> Self {
        Self { filters }
    }
}

/// OR of conjunctions. An empty query matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterQuery {
    conjunctions: Vec<Conjunction>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query with a single one-filter conjunction.
    pub fn single(filter: BasicFilter) -> Self {
        Self::new().or(Conjunction::single(filter))
    }

    pub fn or(mut self, conjunction: Conjunction) -> Self {
        self.conjunctions.push(conjunction);
        self
    }

    pub fn push(&mut self, conjunction: Conjunction) {
        self.conjunctions.push(conjunction);
    }

    pub fn conjunctions(&self) -> &[Conjunction] {
        &self.conjunctions
    }

    pub fn len(&self) -> usize {
        self.conjunctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conjunctions.is_empty()
    }

    /// Reject structurally invalid queries before touching any index.
    pub fn validate(&self) -> Result<()> {
        match self.conjunctions.iter().position(Conjunction::is_empty) {
            Some(pos) => Err(LogStoreError::EmptyConjunction(pos)),
            None => Ok(()),
        }
    }
}

impl From<Vec<Conjunction>> for FilterQuery {
    fn from(conjunctions: Vec<Conjunction>) -> Self {
        Self { conjunctions }
    }
}

/// Evaluate `query`, returning matching entry ids ascending and deduplicated.
///
/// Each conjunction intersects its filters' lookups (smallest list first);
/// the query unions the per-conjunction results. Any invalid filter fails
/// the whole query.
pub fn evaluate(indexes: &IndexManager, query: &FilterQuery) -> Result<Vec<EntryId>> {
    query.validate()?;

    let mut matches = Vec::with_capacity(query.len());
    for conjunction in query.conjunctions() {
        let lists = conjunction
            .filters()
            .iter()
            .map(|f| f.lookup(indexes))
            .collect::<Result<Vec<_>>>()?;
        matches.push(postings::intersect_all(lists));
    }

    Ok(postings::union_all(matches.iter().map(Vec::as_slice)))
}
