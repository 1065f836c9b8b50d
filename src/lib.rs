//! # trie-st
//!
//! A string-keyed symbol table built on a character-indexed trie.
//!
//! Beyond exact lookup, the table answers the queries a trie is good at:
//! every key under a prefix, the longest stored key that prefixes a string,
//! and every key matching a fixed-length wildcard pattern.
//!
//! Two interchangeable backings implement [`SymbolTable`]:
//!
//! - [`RwayTrie`]: one child slot per alphabet symbol. O(key length) access
//!   at the cost of R slots per node.
//! - [`TernaryTrie`]: three-way (lo/eq/hi) branching per symbol. Node size is
//!   independent of the alphabet, which suits large alphabets and sparse key
//!   sets.
//!
//! ## Example
//!
//! ```rust
//! use trie_st::RwayTrie;
//!
//! let mut st: RwayTrie<u32> = RwayTrie::new();
//! st.insert(b"she", 0).unwrap();
//! st.insert(b"shells", 3).unwrap();
//!
//! assert_eq!(st.get(b"she").unwrap(), Some(&0));
//! assert_eq!(st.longest_prefix_of(b"shellsort").unwrap(), b"shells");
//! assert_eq!(st.keys_that_match(b".he").unwrap(), vec![b"she".to_vec()]);
//! ```

#![warn(clippy::all)]

pub mod alphabet;
pub mod error;
pub mod rway;
pub mod tst;

pub use alphabet::Alphabet;
pub use error::{Error, Result};
pub use rway::RwayTrie;
pub use tst::TernaryTrie;

use tracing::debug;

/// Configuration shared by both backings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbols keys may contain. Fixes the width of R-way nodes.
    pub alphabet: Alphabet,
    /// Pattern symbol matching any single symbol in `keys_that_match`.
    pub wildcard: u8,
    /// Longest key, prefix or pattern accepted.
    ///
    /// `insert`, `get`, `longest_prefix_of`, `iter` and dropping a table walk
    /// iteratively. `remove`, `clone`, `keys_with_prefix` and
    /// `keys_that_match` recurse to key depth, so tables that may hold keys
    /// longer than a few thousand symbols should set a bound here.
    pub max_key_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::EXTENDED_ASCII,
            wildcard: b'.',
            max_key_len: None,
        }
    }
}

impl Config {
    fn check_len(&self, len: usize) -> Result<()> {
        match self.max_key_len {
            Some(max) if len > max => Err(Error::KeyTooLong { len, max }),
            _ => Ok(()),
        }
    }

    /// Validates a key or prefix before it reaches the tree.
    pub(crate) fn check_key(&self, key: &[u8]) -> Result<()> {
        let res = self
            .check_len(key.len())
            .and_then(|_| self.alphabet.check(key));
        if let Err(ref e) = res {
            debug!(error = %e, "rejected key");
        }
        res
    }

    /// Like `check_key`, but the wildcard is accepted at any position.
    pub(crate) fn check_pattern(&self, pattern: &[u8]) -> Result<()> {
        let res = self
            .check_len(pattern.len())
            .and_then(|_| self.alphabet.check_with(pattern, |b| b == self.wildcard));
        if let Err(ref e) = res {
            debug!(error = %e, "rejected pattern");
        }
        res
    }
}

/// The operation set shared by every symbol table backing.
///
/// Keys are byte strings over the table's [`Alphabet`]. Every method that
/// takes a key validates it first and fails with [`Error::SymbolOutOfRange`]
/// or [`Error::KeyTooLong`] without touching the table.
pub trait SymbolTable<V> {
    /// Inserts or overwrites. Returns the previous value, if any.
    fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>>;

    fn get(&self, key: &[u8]) -> Result<Option<&V>>;

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Removes `key` and prunes nodes left without a value or children.
    /// Removing an absent key is a no-op returning `Ok(None)`.
    fn remove(&mut self, key: &[u8]) -> Result<Option<V>>;

    /// Number of distinct keys present.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The longest stored key that is a prefix of `s`, as a sub-slice of `s`.
    /// Empty when no stored key prefixes `s`.
    fn longest_prefix_of<'k>(&self, s: &'k [u8]) -> Result<&'k [u8]>;

    /// Every stored key, in ascending byte order.
    fn keys(&self) -> Vec<Vec<u8>>;

    /// Every stored key starting with `prefix`, in ascending byte order.
    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>>;

    /// Every stored key of the pattern's length matching it symbol by
    /// symbol, where the configured wildcard matches any symbol.
    fn keys_that_match(&self, pattern: &[u8]) -> Result<Vec<Vec<u8>>>;
}


#[cfg(test)]
mod proptests;
