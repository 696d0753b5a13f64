//! Standing predicates evaluated at insert time.
//!
//! A stream pairs a [`StreamPredicate`] with the ordered list of entry ids
//! it accepted. Registration is append-only; a stream only sees entries
//! inserted after it was added.

use crate::error::{LogStoreError, Result};
use crate::types::{Entry, EntryId, StreamId};

/// Anything that can decide whether an entry belongs to a stream.
///
/// Implemented for every `Fn(&Entry) -> bool + Send + Sync`, so closures
/// work directly:
///
/// ```
/// use logstore::LogStore;
///
/// let store = LogStore::new();
/// let every_tenth = store.add_stream(|e: &logstore::Entry<'_>| e.id % 10 == 0);
/// assert_eq!(every_tenth, 0);
/// ```
///
/// Predicates run inside the store's writer critical section and must not
/// call back into the same store.
pub trait StreamPredicate: Send + Sync {
    fn matches(&self, entry: &Entry<'_>) -> bool;
}

impl<F> StreamPredicate for F
where
    F: Fn(&Entry<'_>) -> bool + Send + Sync,
{
    fn matches(&self, entry: &Entry<'_>) -> bool {
        self(entry)
    }
}

struct Stream {
    predicate: Box<dyn StreamPredicate>,
    /// Strictly ascending.
    matches: Vec<EntryId>,
}

#[derive(Default)]
pub struct StreamRegistry {
    streams: Vec<Stream>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `predicate`; ids are sequential from 0.
    pub fn add_stream(&mut self, predicate: Box<dyn StreamPredicate>) -> StreamId {
        let id = self.streams.len() as StreamId;
        self.streams.push(Stream {
            predicate,
            matches: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Ids of every stream whose predicate accepts `entry`. Read-only, so
    /// a panicking predicate leaves the registry untouched.
    pub fn evaluate(&self, entry: &Entry<'_>) -> Vec<StreamId> {
        self.streams
            .iter()
            .enumerate()
            .filter(|(_, s)| s.predicate.matches(entry))
            .map(|(id, _)| id as StreamId)
            .collect()
    }

    /// Append `entry_id` to the match list of every stream in `hits`.
    pub fn record(&mut self, entry_id: EntryId, hits: &[StreamId]) {
        for &id in hits {
            if let Some(stream) = self.streams.get_mut(id as usize) {
                debug_assert!(stream.matches.last().map_or(true, |&last| last < entry_id));
                stream.matches.push(entry_id);
            }
        }
    }

    /// Evaluate and record in one step.
    #[cfg(test)]
    pub(crate) fn on_append(&mut self, entry: &Entry<'_>) -> usize {
        let hits = self.evaluate(entry);
        self.record(entry.id, &hits);
        hits.len()
    }

    /// Matches of `id`, in insertion order.
    pub fn matches(&self, id: StreamId) -> Result<&[EntryId]> {
        self.streams
            .get(id as usize)
            .map(|s| s.matches.as_slice())
            .ok_or(LogStoreError::StreamNotFound(id))
    }

    /// Match count per stream, by id.
    pub fn match_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.streams.iter().map(|s| s.matches.len())
    }
}

impl std::fmt::Debug for StreamRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRegistry")
            .field("streams", &self.streams.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: EntryId) -> Entry<'static> {
        Entry { id, header: b"", tokens: &[] }
    }

    struct HeaderStartsWith(u8);

    impl StreamPredicate for HeaderStartsWith {
        fn matches(&self, entry: &Entry<'_>) -> bool {
            entry.header.first() == Some(&self.0)
        }
    }

    #[test]
    fn test_sequential_stream_ids() {
        let mut reg = StreamRegistry::new();
        assert_eq!(reg.add_stream(Box::new(|_: &Entry<'_>| true)), 0);
        assert_eq!(reg.add_stream(Box::new(|_: &Entry<'_>| false)), 1);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_on_append_records_matches_in_order() {
        let mut reg = StreamRegistry::new();
        let even = reg.add_stream(Box::new(|e: &Entry<'_>| e.id % 2 == 0));
        let small = reg.add_stream(Box::new(|e: &Entry<'_>| e.id < 3));

        for id in 0..6 {
            reg.on_append(&entry(id));
        }
        assert_eq!(reg.matches(even).unwrap(), &[0, 2, 4]);
        assert_eq!(reg.matches(small).unwrap(), &[0, 1, 2]);
        assert_eq!(reg.match_counts().collect::<Vec<_>>(), vec![3, 3]);
    }

    #[test]
    fn test_evaluate_does_not_record() {
        let mut reg = StreamRegistry::new();
        let all = reg.add_stream(Box::new(|_: &Entry<'_>| true));
        assert_eq!(reg.evaluate(&entry(0)), vec![all]);
        assert!(reg.matches(all).unwrap().is_empty());
    }

    #[test]
    fn test_trait_object_predicate() {
        let mut reg = StreamRegistry::new();
        let id = reg.add_stream(Box::new(HeaderStartsWith(b'E')));
        let tokens = [];
        let hits = reg.on_append(&Entry { id: 0, header: b"ERROR disk full", tokens: &tokens });
        assert_eq!(hits, 1);
        reg.on_append(&Entry { id: 1, header: b"INFO ok", tokens: &tokens });
        assert_eq!(reg.matches(id).unwrap(), &[0]);
    }

    #[test]
    fn test_unknown_stream() {
        let reg = StreamRegistry::new();
        assert!(matches!(reg.matches(0), Err(LogStoreError::StreamNotFound(0))));
    }
}
