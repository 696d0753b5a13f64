//! Secondary indexes over fixed-length tokens.
//!
//! Provides:
//! - `trie` -- arena-backed bounded-depth prefix trie with leaf buckets
//! - `manager` -- index id allocation, token validation, prefix lookup
//! - `postings` -- set algebra over sorted posting lists

pub mod manager;
pub mod postings;
pub mod trie;

pub use manager::IndexManager;
pub use trie::PrefixTrie;
