use std::vec::Vec;

use super::children::{ChildStore, HashChildren, SortedChildren};
use super::iter::{Cursor, Iter, Keys, Values};
use super::node::{Node, NodeArena, NodeId, NodeRef};
use crate::config::TrieConfig;
use crate::sequence::{NaturalOrder, Sequence};
use crate::trace::{debug_event, trace_event};

/// A prefix tree keyed by element sequences.
///
/// Nodes live in an arena owned by the trie; each node owns its children
/// through `NodeId` handles and keeps a non-owning handle to its parent.
/// Every node caches the number of keys in its subtree, so `len` is O(1).
///
/// `S` selects the child storage: [`HashChildren`] for hashed lookup in
/// arbitrary iteration order, [`SortedChildren`] for ascending order and the
/// navigation API. The edge layout (one element per edge or radix-compressed)
/// comes from the [`TrieConfig`].
///
/// Element comparison for child lookup and label matching must agree: two
/// elements the order calls `Equal` must also be `==`.
pub struct Trie<E, V, S = SortedChildren<E>>
where
    S: ChildStore<E>,
{
    pub(crate) arena: NodeArena<E, V, S>,
    pub(crate) root: Option<NodeId>,
    /// Bumped once per key insertion, key removal or clear.
    pub(crate) generation: u64,
    pub(crate) order: S::Order,
    pub(crate) config: TrieConfig,
}

/// Trie with hashed children: O(1) average child lookup, unordered iteration.
pub type HashTrie<E, V> = Trie<E, V, HashChildren<E>>;

/// Trie with sorted children: ascending iteration and ordered navigation.
/// Built with [`Trie::patricia`] it is the radix-compressed Patricia trie.
pub type SortedTrie<E, V, C = NaturalOrder> = Trie<E, V, SortedChildren<E, C>>;

impl<E, V, S> Trie<E, V, S>
where
    S: ChildStore<E>,
    S::Order: Default,
{
    /// Creates an empty trie with one element per edge.
    pub fn new() -> Self {
        Self::with_config(TrieConfig::plain())
    }

    /// Creates an empty radix-compressed (Patricia) trie.
    pub fn patricia() -> Self {
        Self::with_config(TrieConfig::radix())
    }

    /// Creates an empty trie from a config.
    pub fn with_config(config: TrieConfig) -> Self {
        Self::with_order(S::Order::default(), config)
    }
}

impl<E, V, S> Default for Trie<E, V, S>
where
    S: ChildStore<E>,
    S::Order: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, V, S: ChildStore<E>> Trie<E, V, S> {
    /// Creates an empty trie with an explicit element order, e.g. a
    /// [`CompareFn`](crate::sequence::CompareFn) for sorted storage.
    pub fn with_order(order: S::Order, config: TrieConfig) -> Self {
        Self {
            arena: NodeArena::with_capacity(config.capacity),
            root: None,
            generation: 0,
            order,
            config,
        }
    }

    /// Returns the number of keys in the trie.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.map_or(0, |root| self.arena[root].count)
    }

    /// Returns true if the trie holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The config the trie was built with.
    pub fn config(&self) -> TrieConfig {
        self.config
    }

    /// Returns true for the radix-compressed layout.
    pub fn is_radix(&self) -> bool {
        self.config.is_radix()
    }

    /// The structural generation: changes whenever a key is added or removed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live nodes, valueless branching nodes included.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Read-only access to the root of the node graph.
    pub fn root_node(&self) -> Option<NodeRef<'_, E, V, S>> {
        self.root.map(|root| NodeRef::new(&self.arena, root))
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        debug_event!(keys = self.len(), nodes = self.arena.live(), "clearing trie");
        self.arena.clear();
        self.root = None;
        self.generation += 1;
    }

    /// Iterates over all entries in storage order, yielding full keys.
    ///
    /// Ascending for sorted storage, unspecified for hashed storage.
    pub fn iter(&self) -> Iter<'_, E, V, S> {
        Iter::new(&self.arena, self.root, Vec::new(), false, self.len())
    }

    /// Iterates over all keys in storage order.
    pub fn keys(&self) -> Keys<'_, E, V, S> {
        Keys::new(self.iter())
    }

    /// Iterates over all values in storage order.
    pub fn values(&self) -> Values<'_, E, V, S> {
        Values::new(self.iter())
    }

    /// Starts a fail-fast cursor over this trie.
    ///
    /// The cursor does not borrow the trie; every step takes it again and
    /// reports `StructuralChange` if keys were added or removed by anything
    /// other than the cursor itself. The check is a best-effort guard for
    /// single-threaded misuse, not a synchronisation mechanism.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.root, self.generation)
    }
}

impl<E: Clone + Eq, V, S: ChildStore<E>> Trie<E, V, S> {
    /// Returns a reference to the value stored under `key`.
    pub fn get<K: AsRef<[E]>>(&self, key: K) -> Option<&V> {
        self.find_node(key.as_ref())
            .and_then(|id| self.arena[id].value.get())
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<K: AsRef<[E]>>(&mut self, key: K) -> Option<&mut V> {
        let id = self.find_node(key.as_ref())?;
        self.arena[id].value.get_mut()
    }

    /// Returns true if `key` is stored.
    pub fn contains_key<K: AsRef<[E]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if any key maps to `value`.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Inserts a key-value pair into the trie.
    /// Returns the old value if the key was already present.
    pub fn put<K: AsRef<[E]>>(&mut self, key: K, value: V) -> Option<V> {
        let id = self.insertion_point(key.as_ref());
        let previous = self.arena[id].value.replace(value);
        if previous.is_none() {
            self.arena.adjust_counts(Some(id), 1);
            self.generation += 1;
        }
        previous
    }

    /// Inserts every pair from `entries`.
    pub fn put_all<K, I>(&mut self, entries: I)
    where
        K: AsRef<[E]>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    /// Removes a key from the trie, returning its value if it was present.
    pub fn remove<K: AsRef<[E]>>(&mut self, key: K) -> Option<V> {
        let id = self.find_node(key.as_ref())?;
        self.remove_at(id)
    }

    /// Finds the node whose full key is exactly `key`.
    pub(crate) fn find_node(&self, key: &[E]) -> Option<NodeId> {
        let mut cur = self.root?;
        let mut rest = key;
        while let Some(first) = rest.first() {
            let child = self.arena[cur].children.find(&self.order, first)?;
            let label = &self.arena[child].label;
            if !rest.starts_with(label) {
                return None;
            }
            rest = &rest[label.len()..];
            cur = child;
        }
        Some(cur)
    }

    /// Clears the value at `id`, then prunes and recompacts around it.
    pub(crate) fn remove_at(&mut self, id: NodeId) -> Option<V> {
        let removed = self.arena[id].value.take()?;
        self.arena.adjust_counts(Some(id), -1);
        self.generation += 1;
        self.prune_from(id);
        Some(removed)
    }

    /// Detaches valueless, childless nodes from `id` upwards.
    ///
    /// In the radix layout the lowest surviving node is then merged with its
    /// only child if it no longer carries a value.
    pub(crate) fn prune_from(&mut self, id: NodeId) {
        let mut cur = id;
        loop {
            let node = &self.arena[cur];
            if node.value.is_set() || !node.children.is_empty() {
                break;
            }
            let parent = node.parent;
            match parent {
                None => {
                    self.arena.clear();
                    self.root = None;
                    return;
                }
                Some(parent) => {
                    self.arena.detach(&self.order, cur);
                    self.arena.release(cur);
                    trace_event!(node = cur.index(), "pruned empty node");
                    cur = parent;
                }
            }
        }
        if self.config.is_radix() {
            self.merge_with_only_child(cur);
        }
    }

    /// Frees `id` and everything below it. The subtree must already be detached.
    pub(crate) fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let node = self.arena.release(cur);
            stack.extend(node.children.ids());
        }
    }

    /// Allocates a fresh root node.
    pub(crate) fn ensure_root(&mut self) -> NodeId {
        match self.root {
            Some(root) => root,
            None => {
                let root = self.arena.alloc(Node::new(Sequence::empty()));
                self.root = Some(root);
                root
            }
        }
    }
}

impl<E, V, S> Extend<(Sequence<E>, V)> for Trie<E, V, S>
where
    E: Clone + Eq,
    S: ChildStore<E>,
{
    fn extend<I: IntoIterator<Item = (Sequence<E>, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<E, V, S> FromIterator<(Sequence<E>, V)> for Trie<E, V, S>
where
    E: Clone + Eq,
    S: ChildStore<E>,
    S::Order: Default,
{
    fn from_iter<I: IntoIterator<Item = (Sequence<E>, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.put_all(iter);
        trie
    }
}

impl<'a, E, V, S> IntoIterator for &'a Trie<E, V, S>
where
    S: ChildStore<E>,
    E: Clone,
{
    type Item = (Sequence<E>, &'a V);
    type IntoIter = Iter<'a, E, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E, V, S> core::fmt::Debug for Trie<E, V, S>
where
    E: Clone + core::fmt::Debug,
    V: core::fmt::Debug,
    S: ChildStore<E>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
