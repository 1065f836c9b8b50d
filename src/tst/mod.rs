//! Ternary search trie symbol table.
//!
//! Each node holds one symbol and three links: `lo` and `hi` lead to sibling
//! nodes with smaller and larger symbols at the same key position, `eq` leads
//! to the next key position. Node size does not depend on the alphabet.

use std::cmp::Ordering;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{Alphabet, Config, Result, SymbolTable};

type Path = SmallVec<[u8; 64]>;

type Link<V> = Option<Box<Node<V>>>;

#[derive(Clone)]
struct Node<V> {
    symbol: u8,
    value: Option<V>,
    lo: Link<V>,
    eq: Link<V>,
    hi: Link<V>,
}

impl<V> Node<V> {
    fn new(symbol: u8) -> Self {
        Self {
            symbol,
            value: None,
            lo: None,
            eq: None,
            hi: None,
        }
    }
}

/// A string symbol table backed by a ternary search trie.
///
/// Every node consumes one symbol, so the empty key is kept beside the tree.
#[derive(Clone)]
pub struct TernaryTrie<V> {
    root: Link<V>,
    empty: Option<V>,
    size: usize,
    nodes: usize,
    config: Config,
}

impl<V> TernaryTrie<V> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        debug!(
            radix = config.alphabet.radix(),
            wildcard = %(config.wildcard as char),
            max_key_len = ?config.max_key_len,
            "new ternary trie"
        );
        Self {
            root: None,
            empty: None,
            size: 0,
            nodes: 0,
            config,
        }
    }

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

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn clear(&mut self) {
        self.free_tree();
        self.empty = None;
        self.size = 0;
        self.nodes = 0;
    }

    /// Detach and free every node with an explicit stack. Dropping the root
    /// link directly recurses once per level.
    fn free_tree(&mut self) {
        let mut stack: Vec<Box<Node<V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(
                [node.lo.take(), node.eq.take(), node.hi.take()]
                    .into_iter()
                    .flatten(),
            );
        }
    }

    /// Node holding the last symbol of a non-empty `key`.
    fn node(&self, key: &[u8]) -> Option<&Node<V>> {
        let mut node = self.root.as_deref()?;
        let mut d = 0;
        loop {
            let c = *key.get(d)?;
            node = match c.cmp(&node.symbol) {
                Ordering::Less => node.lo.as_deref()?,
                Ordering::Greater => node.hi.as_deref()?,
                Ordering::Equal if d + 1 == key.len() => return Some(node),
                Ordering::Equal => {
                    d += 1;
                    node.eq.as_deref()?
                }
            };
        }
    }

    fn node_mut(&mut self, key: &[u8]) -> Option<&mut Node<V>> {
        let mut node = self.root.as_deref_mut()?;
        let mut d = 0;
        loop {
            let c = *key.get(d)?;
            node = match c.cmp(&node.symbol) {
                Ordering::Less => node.lo.as_deref_mut()?,
                Ordering::Greater => node.hi.as_deref_mut()?,
                Ordering::Equal if d + 1 == key.len() => return Some(node),
                Ordering::Equal => {
                    d += 1;
                    node.eq.as_deref_mut()?
                }
            };
        }
    }
}

impl<V> TernaryTrie<V> {
    pub fn get(&self, key: &[u8]) -> Result<Option<&V>> {
        self.config.check_key(key)?;
        if key.is_empty() {
            return Ok(self.empty.as_ref());
        }
        Ok(self.node(key).and_then(|n| n.value.as_ref()))
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Result<Option<&mut V>> {
        self.config.check_key(key)?;
        if key.is_empty() {
            return Ok(self.empty.as_mut());
        }
        Ok(self.node_mut(key).and_then(|n| n.value.as_mut()))
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert or overwrite. Returns the previous value if the key existed.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        self.config.check_key(key)?;

        let old = if key.is_empty() {
            self.empty.replace(value)
        } else {
            let mut created = 0usize;
            let mut link = &mut self.root;
            let mut d = 0;
            let old = loop {
                let c = key[d];
                let node = link.get_or_insert_with(|| {
                    created += 1;
                    Box::new(Node::new(c))
                });
                link = match c.cmp(&node.symbol) {
                    Ordering::Less => &mut node.lo,
                    Ordering::Greater => &mut node.hi,
                    Ordering::Equal if d + 1 == key.len() => break node.value.replace(value),
                    Ordering::Equal => {
                        d += 1;
                        &mut node.eq
                    }
                };
            };
            self.nodes += created;
            old
        };

        if old.is_none() {
            self.size += 1;
        }
        Ok(old)
    }

    /// Remove a key. A node left with no value and no `eq` child is spliced
    /// out and its `lo`/`hi` siblings merged in its place.
    pub fn remove(&mut self, key: &[u8]) -> Result<Option<V>> {
        self.config.check_key(key)?;

        let old = if key.is_empty() {
            self.empty.take()
        } else {
            let mut old = None;
            let mut pruned = 0usize;
            self.root = self
                .root
                .take()
                .and_then(|root| Self::remove_recursive(root, key, 0, &mut old, &mut pruned));
            self.nodes -= pruned;
            old
        };

        if old.is_some() {
            self.size -= 1;
        }
        Ok(old)
    }

    fn remove_recursive(
        mut node: Box<Node<V>>,
        key: &[u8],
        depth: usize,
        old: &mut Option<V>,
        pruned: &mut usize,
    ) -> Link<V> {
        match key[depth].cmp(&node.symbol) {
            Ordering::Less => {
                node.lo = node
                    .lo
                    .take()
                    .and_then(|n| Self::remove_recursive(n, key, depth, old, pruned));
            }
            Ordering::Greater => {
                node.hi = node
                    .hi
                    .take()
                    .and_then(|n| Self::remove_recursive(n, key, depth, old, pruned));
            }
            Ordering::Equal if depth + 1 == key.len() => {
                *old = node.value.take();
            }
            Ordering::Equal => {
                node.eq = node
                    .eq
                    .take()
                    .and_then(|n| Self::remove_recursive(n, key, depth + 1, old, pruned));
            }
        }

        if node.value.is_none() && node.eq.is_none() {
            trace!(depth, symbol = node.symbol, "pruned dead-end node");
            *pruned += 1;
            return Self::merge(node.lo.take(), node.hi.take());
        }
        Some(node)
    }

    /// Join two sibling subtrees where every symbol in `lo` sorts before
    /// every symbol in `hi`.
    fn merge(lo: Link<V>, hi: Link<V>) -> Link<V> {
        match (lo, hi) {
            (None, hi) => hi,
            (lo, None) => lo,
            (Some(mut lo), Some(hi)) => {
                Self::attach_max(&mut lo, hi);
                Some(lo)
            }
        }
    }

    fn attach_max(node: &mut Node<V>, hi: Box<Node<V>>) {
        match node.hi {
            Some(ref mut next) => Self::attach_max(next, hi),
            None => node.hi = Some(hi),
        }
    }

    pub fn longest_prefix_of<'k>(&self, s: &'k [u8]) -> Result<&'k [u8]> {
        self.config.alphabet.check(s)?;

        let mut best = 0usize;
        let mut link = &self.root;
        let mut d = 0;
        while let (Some(node), Some(&c)) = (link.as_deref(), s.get(d)) {
            link = match c.cmp(&node.symbol) {
                Ordering::Less => &node.lo,
                Ordering::Greater => &node.hi,
                Ordering::Equal => {
                    d += 1;
                    if node.value.is_some() {
                        best = d;
                    }
                    &node.eq
                }
            };
        }
        Ok(&s[..best])
    }

    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.config.check_key(prefix)?;
        if prefix.is_empty() {
            return Ok(self.keys());
        }

        let mut out = Vec::new();
        if let Some(node) = self.node(prefix) {
            if node.value.is_some() {
                out.push(prefix.to_vec());
            }
            let mut path = Path::from_slice(prefix);
            Self::collect(&node.eq, &mut path, &mut out);
        }
        Ok(out)
    }

    fn collect(link: &Link<V>, path: &mut Path, out: &mut Vec<Vec<u8>>) {
        let Some(node) = link.as_deref() else {
            return;
        };
        Self::collect(&node.lo, path, out);
        path.push(node.symbol);
        if node.value.is_some() {
            out.push(path.to_vec());
        }
        Self::collect(&node.eq, path, out);
        path.pop();
        Self::collect(&node.hi, path, out);
    }

    pub fn keys_that_match(&self, pattern: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.config.check_pattern(pattern)?;

        let mut out = Vec::new();
        if pattern.is_empty() {
            if self.empty.is_some() {
                out.push(Vec::new());
            }
            return Ok(out);
        }
        let mut path = Path::new();
        self.collect_match(&self.root, &mut path, pattern, &mut out);
        Ok(out)
    }

    fn collect_match(
        &self,
        link: &Link<V>,
        path: &mut Path,
        pattern: &[u8],
        out: &mut Vec<Vec<u8>>,
    ) {
        let Some(node) = link.as_deref() else {
            return;
        };
        let depth = path.len();
        let c = pattern[depth];
        let any = c == self.config.wildcard;

        if any || c < node.symbol {
            self.collect_match(&node.lo, path, pattern, out);
        }
        if any || c == node.symbol {
            path.push(node.symbol);
            if depth + 1 == pattern.len() {
                if node.value.is_some() {
                    out.push(path.to_vec());
                }
            } else {
                self.collect_match(&node.eq, path, pattern, out);
            }
            path.pop();
        }
        if any || c > node.symbol {
            self.collect_match(&node.hi, path, pattern, out);
        }
    }

    /// Iterate `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut stack = Vec::with_capacity(2);
        if let Some(ref root) = self.root {
            stack.push(Frame::Expand(root, Vec::new()));
        }
        if let Some(ref v) = self.empty {
            stack.push(Frame::Emit(Vec::new(), v));
        }
        Iter { stack }
    }
}

impl<V> TernaryTrie<V> {
    /// Verify tree integrity - returns list of issues found.
    ///
    /// Checks symbol order among siblings, that no dead end is reachable,
    /// and that `len` and `node_count` match the tree.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut nodes = 0usize;
        let mut values = self.empty.is_some() as usize;

        // (link, exclusive lower bound, exclusive upper bound, key so far)
        let mut stack: Vec<(&Link<V>, Option<u8>, Option<u8>, Vec<u8>)> =
            vec![(&self.root, None, None, Vec::new())];
        while let Some((link, lo, hi, prefix)) = stack.pop() {
            let Some(node) = link.as_deref() else {
                continue;
            };
            nodes += 1;
            let mut key = prefix.clone();
            key.push(node.symbol);

            if node.value.is_some() {
                values += 1;
            } else if node.eq.is_none() {
                issues.push(format!(
                    "dead-end node at {:?}",
                    String::from_utf8_lossy(&key)
                ));
            }
            if lo.map_or(false, |lo| node.symbol <= lo) || hi.map_or(false, |hi| node.symbol >= hi)
            {
                issues.push(format!(
                    "node at {:?} is out of sibling order",
                    String::from_utf8_lossy(&key)
                ));
            }
            if !self.config.alphabet.contains(node.symbol) {
                issues.push(format!(
                    "node at {:?} holds a symbol outside the alphabet",
                    String::from_utf8_lossy(&key)
                ));
            }

            stack.push((&node.lo, lo, Some(node.symbol), prefix.clone()));
            stack.push((&node.hi, Some(node.symbol), hi, prefix));
            stack.push((&node.eq, None, None, key));
        }

        if values != self.size {
            issues.push(format!("{} values stored but len={}", values, self.size));
        }
        if nodes != self.nodes {
            issues.push(format!(
                "{} nodes reachable but node_count={}",
                nodes, self.nodes
            ));
        }
        issues
    }
}

impl<V> Drop for TernaryTrie<V> {
    fn drop(&mut self) {
        self.free_tree();
    }
}

impl<V> Default for TernaryTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for TernaryTrie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)))
            .finish()
    }
}

impl<V> SymbolTable<V> for TernaryTrie<V> {
    fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        TernaryTrie::insert(self, key, value)
    }

    fn get(&self, key: &[u8]) -> Result<Option<&V>> {
        TernaryTrie::get(self, key)
    }

    fn remove(&mut self, key: &[u8]) -> Result<Option<V>> {
        TernaryTrie::remove(self, key)
    }

    fn len(&self) -> usize {
        self.size
    }

    fn longest_prefix_of<'k>(&self, s: &'k [u8]) -> Result<&'k [u8]> {
        TernaryTrie::longest_prefix_of(self, s)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        TernaryTrie::keys(self)
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        TernaryTrie::keys_with_prefix(self, prefix)
    }

    fn keys_that_match(&self, pattern: &[u8]) -> Result<Vec<Vec<u8>>> {
        TernaryTrie::keys_that_match(self, pattern)
    }
}

enum Frame<'a, V> {
    /// Subtree whose nodes all extend the given key prefix.
    Expand(&'a Node<V>, Vec<u8>),
    Emit(Vec<u8>, &'a V),
}

/// In-order iterator over a [`TernaryTrie`].
pub struct Iter<'a, V> {
    stack: Vec<Frame<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let (node, prefix) = match frame {
                Frame::Emit(key, value) => return Some((key, value)),
                Frame::Expand(node, prefix) => (node, prefix),
            };

            let mut key = Vec::with_capacity(prefix.len() + 1);
            key.extend_from_slice(&prefix);
            key.push(node.symbol);

            // Pushed in reverse: lo, this key, eq, hi.
            if let Some(ref hi) = node.hi {
                self.stack.push(Frame::Expand(hi, prefix.clone()));
            }
            if let Some(ref eq) = node.eq {
                self.stack.push(Frame::Expand(eq, key.clone()));
            }
            if let Some(ref v) = node.value {
                self.stack.push(Frame::Emit(key, v));
            }
            if let Some(ref lo) = node.lo {
                self.stack.push(Frame::Expand(lo, prefix));
            }
        }
        None
    }
}
