//! R-way trie node.
//!
//! Each node owns one child slot per alphabet symbol, indexed directly by the
//! symbol's position in the alphabet. A node holds a value iff a key ends at
//! it.

/// A node in the R-way trie.
#[derive(Clone)]
pub struct Node<V> {
    /// Present iff some key terminates here.
    pub(crate) value: Option<V>,
    /// Number of occupied slots in `children`.
    pub(crate) num_children: u16,
    /// Child nodes (direct indexing by alphabet position). Length is the radix.
    pub(crate) children: Box<[Option<Box<Node<V>>>]>,
}

impl<V> Node<V> {
    /// Create an empty node with `radix` child slots.
    pub fn new(radix: usize) -> Self {
        let mut children = Vec::with_capacity(radix);
        children.resize_with(radix, || None);
        Self {
            value: None,
            num_children: 0,
            children: children.into_boxed_slice(),
        }
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn num_children(&self) -> usize {
        self.num_children as usize
    }

    #[inline]
    pub fn child(&self, idx: usize) -> Option<&Node<V>> {
        self.children[idx].as_deref()
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, idx: usize) -> Option<&mut Node<V>> {
        self.children[idx].as_deref_mut()
    }

    /// Child at `idx`, creating an empty one first if the slot is vacant.
    /// Returns the child and whether it was created.
    pub(crate) fn child_or_insert(&mut self, idx: usize) -> (&mut Node<V>, bool) {
        let radix = self.children.len();
        let created = self.children[idx].is_none();
        if created {
            self.num_children += 1;
        }
        let child: &mut Node<V> =
            self.children[idx].get_or_insert_with(|| Box::new(Node::new(radix)));
        (child, created)
    }

    /// Detach the child at `idx`, leaving the slot vacant.
    pub(crate) fn take_child(&mut self, idx: usize) -> Option<Box<Node<V>>> {
        let child = self.children[idx].take();
        if child.is_some() {
            self.num_children -= 1;
        }
        child
    }

    /// Put `child` into the vacant slot at `idx`.
    pub(crate) fn set_child(&mut self, idx: usize, child: Box<Node<V>>) {
        debug_assert!(self.children[idx].is_none());
        self.children[idx] = Some(child);
        self.num_children += 1;
    }

    /// Occupied slots in ascending index order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (usize, &Node<V>)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| c.as_deref().map(|c| (idx, c)))
    }

    /// Detach every child, leaving all slots vacant.
    pub(crate) fn take_children(&mut self) -> impl Iterator<Item = Box<Node<V>>> + '_ {
        self.num_children = 0;
        self.children.iter_mut().filter_map(Option::take)
    }

    /// No value and no children: such a node must not stay in the tree.
    #[inline]
    pub fn is_dead_end(&self) -> bool {
        self.value.is_none() && self.num_children == 0
    }
}
