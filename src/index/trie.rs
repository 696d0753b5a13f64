//! Bounded-depth prefix trie with leaf overflow buckets.
//!
//! Nodes live in a flat arena addressed by `NodeId`. The first
//! `max_prefix_depth` token bytes select a path of branch nodes, one byte
//! per level; the node at that depth is a leaf holding buckets keyed by the
//! remaining `token_len - max_prefix_depth` suffix bytes. Each bucket owns
//! the posting list of entries whose token is exactly `path ++ suffix`.
//!
//! ```text
//! depth 0      root (branch)
//!                 │ byte 0
//! depth 1      branch
//!                 │ byte 1
//!   ...
//! depth D      leaf ── [suffix "ab" → 3, 9, 14] [suffix "ac" → 4] ...
//! ```
//!
//! When `max_prefix_depth == token_len` every leaf has exactly one bucket
//! with an empty suffix.

use crate::index::postings;
use crate::types::EntryId;

/// Position of a node in the arena.
pub type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug)]
enum Node {
    /// Children sorted by byte.
    Branch(Vec<(u8, NodeId)>),
    Leaf(Vec<Bucket>),
}

#[derive(Debug)]
struct Bucket {
    suffix: Box<[u8]>,
    /// Strictly ascending.
    postings: Vec<EntryId>,
}

#[derive(Debug)]
pub struct PrefixTrie {
    token_len: usize,
    max_prefix_depth: usize,
    nodes: Vec<Node>,
    bucket_count: usize,
    posting_count: usize,
}

impl PrefixTrie {
    /// Caller guarantees `1 <= max_prefix_depth <= token_len`.
    pub fn new(token_len: usize, max_prefix_depth: usize) -> Self {
        debug_assert!(max_prefix_depth >= 1 && max_prefix_depth <= token_len);
        Self {
            token_len,
            max_prefix_depth,
            nodes: vec![Node::Branch(Vec::new())],
            bucket_count: 0,
            posting_count: 0,
        }
    }

    pub fn token_len(&self) -> usize {
        self.token_len
    }

    pub fn max_prefix_depth(&self) -> usize {
        self.max_prefix_depth
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    pub fn posting_count(&self) -> usize {
        self.posting_count
    }

    // -- Insert ---------------------------------------------------------------

    /// Record that `entry_id` carries `token`.
    ///
    /// `token.len()` must equal `token_len` and ids must arrive in
    /// ascending order.
    pub fn insert(&mut self, entry_id: EntryId, token: &[u8]) {
        debug_assert_eq!(token.len(), self.token_len);

        let depth = self.max_prefix_depth;
        let mut node = ROOT;
        for (level, &byte) in token[..depth].iter().enumerate() {
            node = self.child_or_insert(node, byte, level + 1 == depth);
        }

        let suffix = &token[depth..];
        let Node::Leaf(buckets) = &mut self.nodes[node as usize] else {
            unreachable!("node at max_prefix_depth is always a leaf");
        };
        match buckets.iter_mut().find(|b| &*b.suffix == suffix) {
            Some(bucket) => {
                debug_assert!(bucket.postings.last().map_or(true, |&last| last < entry_id));
                bucket.postings.push(entry_id);
            }
            None => {
                buckets.push(Bucket {
                    suffix: suffix.into(),
                    postings: vec![entry_id],
                });
                self.bucket_count += 1;
            }
        }
        self.posting_count += 1;
    }

    fn child_or_insert(&mut self, parent: NodeId, byte: u8, leaf: bool) -> NodeId {
        let pos = match &self.nodes[parent as usize] {
            Node::Branch(children) => match children.binary_search_by_key(&byte, |&(b, _)| b) {
                Ok(pos) => return children[pos].1,
                Err(pos) => pos,
            },
            Node::Leaf(_) => unreachable!("descent never passes a leaf"),
        };

        let child = self.nodes.len() as NodeId;
        self.nodes.push(if leaf {
            Node::Leaf(Vec::new())
        } else {
            Node::Branch(Vec::new())
        });
        if let Node::Branch(children) = &mut self.nodes[parent as usize] {
            children.insert(pos, (byte, child));
        }
        child
    }

    // -- Lookup ---------------------------------------------------------------

    /// Entries whose token starts with `prefix`, ascending.
    ///
    /// Caller guarantees `1 <= prefix.len() <= token_len`.
    pub fn lookup(&self, prefix: &[u8]) -> Vec<EntryId> {
        debug_assert!(!prefix.is_empty() && prefix.len() <= self.token_len);

        let depth = self.max_prefix_depth;
        let walk = prefix.len().min(depth);
        let mut node = ROOT;
        for &byte in &prefix[..walk] {
            match self.child(node, byte) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        if prefix.len() <= depth {
            return postings::union_all(self.subtree_postings(node));
        }

        // Prefix reaches into the suffix: scan the sibling buckets.
        let rest = &prefix[depth..];
        match &self.nodes[node as usize] {
            Node::Leaf(buckets) => postings::union_all(
                buckets
                    .iter()
                    .filter(|b| b.suffix.starts_with(rest))
                    .map(|b| b.postings.as_slice()),
            ),
            Node::Branch(_) => Vec::new(),
        }
    }

    fn child(&self, parent: NodeId, byte: u8) -> Option<NodeId> {
        match &self.nodes[parent as usize] {
            Node::Branch(children) => children
                .binary_search_by_key(&byte, |&(b, _)| b)
                .ok()
                .map(|pos| children[pos].1),
            Node::Leaf(_) => None,
        }
    }

    /// Every posting list reachable from `start`.
    fn subtree_postings(&self, start: NodeId) -> Vec<&[EntryId]> {
        let mut lists = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            match &self.nodes[node as usize] {
                Node::Branch(children) => stack.extend(children.iter().map(|&(_, c)| c)),
                Node::Leaf(buckets) => lists.extend(buckets.iter().map(|b| b.postings.as_slice())),
            }
        }
        lists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(token_len: usize, depth: usize, tokens: &[&[u8]]) -> PrefixTrie {
        let mut trie = PrefixTrie::new(token_len, depth);
        for (id, token) in tokens.iter().enumerate() {
            trie.insert(id as EntryId, token);
        }
        trie
    }

    #[test]
    fn test_empty_trie() {
        let trie = PrefixTrie::new(4, 2);
        assert_eq!(trie.node_count(), 1);
        assert!(trie.lookup(&[1]).is_empty());
        assert!(trie.lookup(&[1, 2, 3, 4]).is_empty());
    }

    #[test]
    fn test_exact_and_prefix_lookup_within_depth() {
        let trie = build(3, 2, &[b"abc", b"abd", b"axc", b"bbc", b"abc"]);
        assert_eq!(trie.lookup(b"a"), vec![0, 1, 2, 4]);
        assert_eq!(trie.lookup(b"ab"), vec![0, 1, 4]);
        assert_eq!(trie.lookup(b"b"), vec![3]);
        assert!(trie.lookup(b"c").is_empty());
    }

    #[test]
    fn test_lookup_past_depth_scans_buckets() {
        let trie = build(4, 1, &[b"aaaa", b"aaab", b"aabb", b"abbb", b"aaaa"]);
        assert_eq!(trie.lookup(b"aaaa"), vec![0, 4]);
        assert_eq!(trie.lookup(b"aaa"), vec![0, 1, 4]);
        assert_eq!(trie.lookup(b"aa"), vec![0, 1, 2, 4]);
        assert!(trie.lookup(b"aaac").is_empty());
        // one leaf under 'a', four distinct suffixes
        assert_eq!(trie.bucket_count(), 4);
        assert_eq!(trie.posting_count(), 5);
    }

    #[test]
    fn test_full_depth_uses_single_empty_suffix_bucket() {
        let trie = build(2, 2, &[b"xy", b"xy", b"xz"]);
        assert_eq!(trie.bucket_count(), 2);
        assert_eq!(trie.lookup(b"xy"), vec![0, 1]);
        assert_eq!(trie.lookup(b"x"), vec![0, 1, 2]);
        // root + 'x' branch + two leaves
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_single_byte_tokens() {
        let tokens: Vec<[u8; 1]> = (0..=255u8).map(|b| [b]).collect();
        let refs: Vec<&[u8]> = tokens.iter().map(|t| t.as_slice()).collect();
        let trie = build(1, 1, &refs);
        for b in 0..=255u8 {
            assert_eq!(trie.lookup(&[b]), vec![b as EntryId]);
        }
    }

    #[test]
    fn test_subtree_union_is_sorted_across_leaves() {
        // ids interleave across leaves, so the union has to merge
        let trie = build(2, 2, &[b"ab", b"aa", b"ab", b"ac", b"aa"]);
        assert_eq!(trie.lookup(b"a"), vec![0, 1, 2, 3, 4]);
    }
}
