//! R-way trie symbol table.
//!
//! Every node has one child slot per alphabet symbol, so each step of a walk
//! is a direct index. Lookups cost O(key length) regardless of how many keys
//! are stored; the price is R slots per node.

mod debug;
mod node;

pub use node::Node;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{Alphabet, Config, Result, SymbolTable};

/// Key buffer used while walking the tree.
type Path = SmallVec<[u8; 64]>;

/// Child slot of a symbol from a key that has passed `Config::check_key`.
///
/// Every public entry point validates its key before walking, so `symbol` is
/// always in the alphabet here.
#[inline]
fn slot(alphabet: &Alphabet, symbol: u8) -> usize {
    let idx = alphabet.index_of(symbol);
    debug_assert!(
        idx.is_some(),
        "symbol {symbol:#04x} reached a walk without alphabet validation"
    );
    idx.unwrap_or_default()
}

/// A string symbol table backed by an R-way trie.
///
/// The root represents the empty prefix and is never pruned, so the empty
/// key is stored at the root.
#[derive(Clone)]
pub struct RwayTrie<V> {
    root: Box<Node<V>>,
    /// Number of keys present.
    size: usize,
    /// Number of live nodes, root included.
    nodes: usize,
    config: Config,
}

impl<V> RwayTrie<V> {
    /// Create an empty trie over the extended ASCII alphabet.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        debug!(
            radix = config.alphabet.radix(),
            wildcard = %(config.wildcard as char),
            max_key_len = ?config.max_key_len,
            "new r-way trie"
        );
        Self {
            root: Box::new(Node::new(config.alphabet.radix())),
            size: 0,
            nodes: 1,
            config,
        }
    }

    /// Create an empty trie over `alphabet`, other settings default.
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self::with_config(Config {
            alphabet,
            ..Config::default()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// The empty-prefix node.
    pub fn root(&self) -> &Node<V> {
        &self.root
    }

    /// Remove every key. The configuration is kept.
    pub fn clear(&mut self) {
        Self::free_subtrees(&mut self.root);
        self.root.value = None;
        self.size = 0;
        self.nodes = 1;
    }

    /// Free everything below `root` with an explicit stack. Dropping a
    /// `Box<Node>` directly recurses once per level.
    fn free_subtrees(root: &mut Node<V>) {
        let mut stack: Vec<Box<Node<V>>> = root.take_children().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.take_children());
        }
    }

    #[inline]
    fn index(&self, symbol: u8) -> usize {
        slot(&self.config.alphabet, symbol)
    }

    fn node(&self, key: &[u8]) -> Option<&Node<V>> {
        let mut node: &Node<V> = &self.root;
        for &c in key {
            node = node.child(self.index(c))?;
        }
        Some(node)
    }

    fn node_mut(&mut self, key: &[u8]) -> Option<&mut Node<V>> {
        let alphabet = self.config.alphabet;
        let mut node: &mut Node<V> = &mut self.root;
        for &c in key {
            node = node.child_mut(alphabet.index_of(c)?)?;
        }
        Some(node)
    }
}

impl<V> RwayTrie<V> {
    pub fn get(&self, key: &[u8]) -> Result<Option<&V>> {
        self.config.check_key(key)?;
        Ok(self.node(key).and_then(Node::value))
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Result<Option<&mut V>> {
        self.config.check_key(key)?;
        Ok(self.node_mut(key).and_then(|n| n.value.as_mut()))
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert or overwrite. Returns the previous value if the key existed;
    /// only a new key increases `len`.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        self.config.check_key(key)?;

        let alphabet = self.config.alphabet;
        let mut created = 0usize;
        let mut node: &mut Node<V> = &mut self.root;
        for &c in key {
            let idx = slot(&alphabet, c);
            let (child, new) = node.child_or_insert(idx);
            created += new as usize;
            node = child;
        }
        let old = node.value.replace(value);

        self.nodes += created;
        if old.is_none() {
            self.size += 1;
        }
        Ok(old)
    }

    /// Remove a key, pruning every node the removal leaves without a value
    /// or children. The root always stays.
    pub fn remove(&mut self, key: &[u8]) -> Result<Option<V>> {
        self.config.check_key(key)?;

        let alphabet = self.config.alphabet;
        let mut pruned = 0usize;
        let old = match key.split_first() {
            None => self.root.value.take(),
            Some((&c, _)) => {
                let idx = slot(&alphabet, c);
                match self.root.take_child(idx) {
                    None => None,
                    Some(child) => {
                        let (child, old) =
                            Self::remove_recursive(child, key, 1, &alphabet, &mut pruned);
                        if let Some(child) = child {
                            self.root.set_child(idx, child);
                        }
                        old
                    }
                }
            }
        };

        self.nodes -= pruned;
        if old.is_some() {
            self.size -= 1;
        }
        Ok(old)
    }

    /// Remove `key` from the subtree rooted at `node` (which sits at `depth`).
    /// Returns the subtree to put back in the parent's slot, or `None` if it
    /// became a dead end.
    fn remove_recursive(
        mut node: Box<Node<V>>,
        key: &[u8],
        depth: usize,
        alphabet: &Alphabet,
        pruned: &mut usize,
    ) -> (Option<Box<Node<V>>>, Option<V>) {
        let old = if depth == key.len() {
            node.value.take()
        } else {
            let idx = slot(alphabet, key[depth]);
            match node.take_child(idx) {
                None => None,
                Some(child) => {
                    let (child, old) =
                        Self::remove_recursive(child, key, depth + 1, alphabet, pruned);
                    if let Some(child) = child {
                        node.set_child(idx, child);
                    }
                    old
                }
            }
        };

        if node.is_dead_end() {
            trace!(depth, "pruned dead-end node");
            *pruned += 1;
            return (None, old);
        }
        (Some(node), old)
    }

    /// The longest stored key that is a prefix of `s`, as a sub-slice of `s`.
    pub fn longest_prefix_of<'k>(&self, s: &'k [u8]) -> Result<&'k [u8]> {
        self.config.alphabet.check(s)?;

        let mut node: &Node<V> = &self.root;
        let mut best = 0usize;
        for (i, &c) in s.iter().enumerate() {
            match node.child(self.index(c)) {
                Some(child) => node = child,
                None => break,
            };
            if node.value.is_some() {
                best = i + 1;
            }
        }
        Ok(&s[..best])
    }

    /// Every stored key, in ascending byte order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Every stored key that starts with `prefix`, in ascending byte order.
    pub fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.config.check_key(prefix)?;

        let mut out = Vec::new();
        if let Some(node) = self.node(prefix) {
            let mut path = Path::from_slice(prefix);
            self.collect(node, &mut path, &mut out);
        }
        Ok(out)
    }

    fn collect(&self, node: &Node<V>, path: &mut Path, out: &mut Vec<Vec<u8>>) {
        if node.value.is_some() {
            out.push(path.to_vec());
        }
        for (idx, child) in node.children() {
            path.push(self.config.alphabet.symbol_at(idx));
            self.collect(child, path, out);
            path.pop();
        }
    }

    /// Every stored key with the same length as `pattern` that matches it
    /// position by position. The configured wildcard matches any symbol.
    pub fn keys_that_match(&self, pattern: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.config.check_pattern(pattern)?;

        let mut out = Vec::new();
        let mut path = Path::new();
        self.collect_match(&self.root, &mut path, pattern, &mut out);
        Ok(out)
    }

    fn collect_match(
        &self,
        node: &Node<V>,
        path: &mut Path,
        pattern: &[u8],
        out: &mut Vec<Vec<u8>>,
    ) {
        let depth = path.len();
        if depth == pattern.len() {
            if node.value.is_some() {
                out.push(path.to_vec());
            }
            return;
        }

        let c = pattern[depth];
        if c == self.config.wildcard {
            for (idx, child) in node.children() {
                path.push(self.config.alphabet.symbol_at(idx));
                self.collect_match(child, path, pattern, out);
                path.pop();
            }
        } else if let Some(child) = node.child(self.index(c)) {
            path.push(c);
            self.collect_match(child, path, pattern, out);
            path.pop();
        }
    }

    /// Iterate `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            alphabet: self.config.alphabet,
            stack: vec![(&*self.root, Vec::new())],
        }
    }
}

impl<V> Drop for RwayTrie<V> {
    fn drop(&mut self) {
        Self::free_subtrees(&mut self.root);
    }
}

impl<V> Default for RwayTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for RwayTrie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)))
            .finish()
    }
}

impl<V> SymbolTable<V> for RwayTrie<V> {
    fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        RwayTrie::insert(self, key, value)
    }

    fn get(&self, key: &[u8]) -> Result<Option<&V>> {
        RwayTrie::get(self, key)
    }

    fn remove(&mut self, key: &[u8]) -> Result<Option<V>> {
        RwayTrie::remove(self, key)
    }

    fn len(&self) -> usize {
        self.size
    }

    fn longest_prefix_of<'k>(&self, s: &'k [u8]) -> Result<&'k [u8]> {
        RwayTrie::longest_prefix_of(self, s)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        RwayTrie::keys(self)
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        RwayTrie::keys_with_prefix(self, prefix)
    }

    fn keys_that_match(&self, pattern: &[u8]) -> Result<Vec<Vec<u8>>> {
        RwayTrie::keys_that_match(self, pattern)
    }
}

/// Depth-first iterator over an [`RwayTrie`].
pub struct Iter<'a, V> {
    alphabet: Alphabet,
    stack: Vec<(&'a Node<V>, Vec<u8>)>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key)) = self.stack.pop() {
            for (idx, child) in node.children().rev() {
                let mut child_key = Vec::with_capacity(key.len() + 1);
                child_key.extend_from_slice(&key);
                child_key.push(self.alphabet.symbol_at(idx));
                self.stack.push((child, child_key));
            }
            if let Some(ref value) = node.value {
                return Some((key, value));
            }
        }
        None
    }
}
