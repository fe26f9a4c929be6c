//! Prefix-restricted views of a trie.
//!
//! A sub-trie for prefix `p` contains exactly the keys that strictly extend
//! `p`; a key equal to `p` belongs to the parent trie only. Keys are always
//! reported in full. Sub-tries share structure with their parent: there is no
//! copy, and changes through [`SubTrieMut`] are changes to the parent.

use std::vec::Vec;

use super::children::{ChildStore, OrderedChildStore};
use super::iter::{Iter, Keys, Values};
use super::map::Trie;
use super::node::{NodeId, NodeRef};
use super::SequenceMap;
use crate::error::{Result, TrieError};
use crate::sequence::{common_prefix_len, Sequence};
use crate::trace::debug_event;

/// Where a prefix lands in the node graph.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Anchor {
    /// Shallowest node whose key extends or equals the prefix.
    pub(crate) node: NodeId,
    /// The node's key equals the prefix.
    pub(crate) exact: bool,
}

fn strictly_extends<E: PartialEq>(key: &[E], prefix: &[E]) -> bool {
    key.len() > prefix.len() && key.starts_with(prefix)
}

impl<E: Clone + Eq, V, S: ChildStore<E>> Trie<E, V, S> {
    /// Descends along `prefix`, which may end in the middle of an edge.
    pub(crate) fn find_anchor(&self, prefix: &[E]) -> Option<Anchor> {
        let mut cur = self.root?;
        let mut rest = prefix;
        while let Some(first) = rest.first() {
            let child = self.arena[cur].children.find(&self.order, first)?;
            let label = &self.arena[child].label;
            let matched = common_prefix_len(rest, label);
            if matched == rest.len() {
                return Some(Anchor {
                    node: child,
                    exact: matched == label.len(),
                });
            }
            if matched < label.len() {
                return None;
            }
            cur = child;
            rest = &rest[matched..];
        }
        Some(Anchor {
            node: cur,
            exact: true,
        })
    }

    /// Number of keys strictly extending the prefix anchored at `anchor`.
    fn anchored_len(&self, anchor: Anchor) -> usize {
        let node = &self.arena[anchor.node];
        if anchor.exact && node.value.is_set() {
            node.count - 1
        } else {
            node.count
        }
    }

    fn anchored_iter(&self, anchor: Anchor) -> Iter<'_, E, V, S> {
        let mut base = self.arena.key_of(anchor.node).into_vec();
        let label_len = self.arena[anchor.node].label.len();
        base.truncate(base.len() - label_len);
        Iter::new(
            &self.arena,
            Some(anchor.node),
            base,
            anchor.exact,
            self.anchored_len(anchor),
        )
    }

    /// Read-only view of the keys that strictly extend `prefix`.
    ///
    /// Fails with `NotFound` when no stored key extends `prefix`.
    pub fn subtrie<K: AsRef<[E]>>(&self, prefix: K) -> Result<SubTrie<'_, E, V, S>> {
        let prefix = prefix.as_ref();
        let anchor = self
            .find_anchor(prefix)
            .ok_or_else(|| TrieError::not_found(format!("no key extends a prefix of length {}", prefix.len())))?;
        Ok(SubTrie {
            trie: self,
            prefix: Sequence::from(prefix),
            anchor,
        })
    }

    /// Writable view of the keys that strictly extend `prefix`.
    ///
    /// Fails with `NotFound` when no stored key extends `prefix`.
    pub fn subtrie_mut<K: AsRef<[E]>>(&mut self, prefix: K) -> Result<SubTrieMut<'_, E, V, S>> {
        let prefix = prefix.as_ref();
        if self.find_anchor(prefix).is_none() {
            return Err(TrieError::not_found(format!(
                "no key extends a prefix of length {}",
                prefix.len()
            )));
        }
        Ok(SubTrieMut {
            trie: self,
            prefix: Sequence::from(prefix),
        })
    }

    /// Removes every key that strictly extends `prefix`, returning how many were removed.
    pub fn remove_prefixed<K: AsRef<[E]>>(&mut self, prefix: K) -> usize {
        let Some(anchor) = self.find_anchor(prefix.as_ref()) else {
            return 0;
        };
        let removed = self.anchored_len(anchor);
        if removed == 0 {
            return 0;
        }

        if anchor.exact {
            let children: Vec<NodeId> = self.arena[anchor.node].children.ids().collect();
            for child in children {
                self.arena.detach(&self.order, child);
                self.release_subtree(child);
            }
            self.generation += 1;
            self.prune_from(anchor.node);
        } else {
            let parent = self.arena[anchor.node].parent;
            self.arena.detach(&self.order, anchor.node);
            self.release_subtree(anchor.node);
            self.generation += 1;
            if let Some(parent) = parent {
                self.prune_from(parent);
            }
        }
        debug_event!(removed, "removed prefixed keys");
        removed
    }
}

/// Read-only view of the keys extending a prefix.
pub struct SubTrie<'a, E, V, S: ChildStore<E>> {
    trie: &'a Trie<E, V, S>,
    prefix: Sequence<E>,
    anchor: Anchor,
}

impl<'a, E: Clone + Eq, V, S: ChildStore<E>> SubTrie<'a, E, V, S> {
    /// The prefix every key of this view strictly extends.
    pub fn prefix(&self) -> &[E] {
        &self.prefix
    }

    /// Number of keys. O(1).
    pub fn len(&self) -> usize {
        self.trie.anchored_len(self.anchor)
    }

    /// Returns `true` if no stored key extends the prefix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for a full key, if it is stored and extends the prefix.
    pub fn get<K: AsRef<[E]>>(&self, key: K) -> Option<&'a V> {
        let key = key.as_ref();
        if !strictly_extends(key, &self.prefix) {
            return None;
        }
        self.trie.get(key)
    }

    /// Returns `true` if `key` is stored and extends the prefix.
    pub fn contains_key<K: AsRef<[E]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Node where the view's keys branch off; its own key may be longer than the prefix.
    pub fn root_node(&self) -> NodeRef<'a, E, V, S> {
        NodeRef::new(&self.trie.arena, self.anchor.node)
    }

    /// Entries in storage order, with full keys.
    pub fn iter(&self) -> Iter<'a, E, V, S> {
        self.trie.anchored_iter(self.anchor)
    }

    /// Full keys in storage order.
    pub fn keys(&self) -> Keys<'a, E, V, S> {
        Keys::new(self.iter())
    }

    /// Values in storage order.
    pub fn values(&self) -> Values<'a, E, V, S> {
        Values::new(self.iter())
    }

    /// Narrows to a longer prefix. `prefix` is a full prefix, not a suffix.
    pub fn subtrie<K: AsRef<[E]>>(&self, prefix: K) -> Result<SubTrie<'a, E, V, S>> {
        let prefix = prefix.as_ref();
        if !prefix.starts_with(&self.prefix) {
            return Err(TrieError::invalid("nested prefix must extend the current prefix"));
        }
        self.trie.subtrie(prefix)
    }
}

impl<'a, E: Clone + Eq, V, S: OrderedChildStore<E>> SubTrie<'a, E, V, S> {
    /// Smallest key in the view.
    pub fn first_key(&self) -> Result<Sequence<E>> {
        let anchor = &self.trie.arena[self.anchor.node];
        let first = if self.anchor.exact {
            anchor.children.first_id().map(|c| self.trie.min_in(c))
        } else {
            Some(self.trie.min_in(self.anchor.node))
        };
        first
            .map(|id| self.trie.arena.key_of(id))
            .ok_or_else(|| TrieError::not_found("first key of an empty sub-trie"))
    }

    /// Largest key in the view.
    pub fn last_key(&self) -> Result<Sequence<E>> {
        let last = self.trie.max_in(self.anchor.node);
        if self.anchor.exact && last == self.anchor.node {
            return Err(TrieError::not_found("last key of an empty sub-trie"));
        }
        Ok(self.trie.arena.key_of(last))
    }
}

impl<'a, E: Clone + Eq, V, S: ChildStore<E>> SequenceMap<E, V> for SubTrie<'a, E, V, S> {
    fn len(&self) -> usize {
        SubTrie::len(self)
    }

    fn get(&self, key: &[E]) -> Option<&V> {
        SubTrie::get(self, key)
    }

    fn try_put(&mut self, _key: &[E], _value: V) -> Result<Option<V>> {
        Err(TrieError::UnsupportedMutation("sub-trie is read-only; use subtrie_mut"))
    }

    fn try_remove(&mut self, _key: &[E]) -> Result<Option<V>> {
        Err(TrieError::UnsupportedMutation("sub-trie is read-only; use subtrie_mut"))
    }

    fn try_clear(&mut self) -> Result<()> {
        Err(TrieError::UnsupportedMutation("sub-trie is read-only; use subtrie_mut"))
    }
}

/// Writable view of the keys extending a prefix.
///
/// Holds the parent trie mutably and resolves the prefix again on every
/// call, so it stays correct across the splits and merges its own writes
/// cause. Emptying the region does not invalidate the view.
pub struct SubTrieMut<'a, E, V, S: ChildStore<E>> {
    trie: &'a mut Trie<E, V, S>,
    prefix: Sequence<E>,
}

impl<'a, E: Clone + Eq, V, S: ChildStore<E>> SubTrieMut<'a, E, V, S> {
    /// The prefix every key of this view strictly extends.
    pub fn prefix(&self) -> &[E] {
        &self.prefix
    }

    /// Number of keys currently under the prefix.
    pub fn len(&self) -> usize {
        self.trie
            .find_anchor(&self.prefix)
            .map_or(0, |anchor| self.trie.anchored_len(anchor))
    }

    /// Returns `true` if no stored key extends the prefix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for a full key, if it is stored and extends the prefix.
    pub fn get<K: AsRef<[E]>>(&self, key: K) -> Option<&V> {
        let key = key.as_ref();
        if !strictly_extends(key, &self.prefix) {
            return None;
        }
        self.trie.get(key)
    }

    /// Mutable value for a full key inside the view.
    pub fn get_mut<K: AsRef<[E]>>(&mut self, key: K) -> Option<&mut V> {
        let key = key.as_ref();
        if !strictly_extends(key, &self.prefix) {
            return None;
        }
        self.trie.get_mut(key)
    }

    /// Returns `true` if `key` is stored and extends the prefix.
    pub fn contains_key<K: AsRef<[E]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Stores a full key in the parent trie.
    ///
    /// Fails with `InvalidArgument` if `key` does not strictly extend the prefix.
    pub fn put<K: AsRef<[E]>>(&mut self, key: K, value: V) -> Result<Option<V>> {
        let key = key.as_ref();
        if !strictly_extends(key, &self.prefix) {
            return Err(TrieError::invalid("key does not extend the sub-trie prefix"));
        }
        Ok(self.trie.put(key, value))
    }

    /// Removes a full key. Keys outside the view are left alone.
    pub fn remove<K: AsRef<[E]>>(&mut self, key: K) -> Option<V> {
        let key = key.as_ref();
        if !strictly_extends(key, &self.prefix) {
            return None;
        }
        self.trie.remove(key)
    }

    /// Removes every key of the view from the parent trie.
    pub fn clear(&mut self) {
        self.trie.remove_prefixed(&self.prefix);
    }

    /// Entries in storage order, with full keys.
    pub fn iter(&self) -> Iter<'_, E, V, S> {
        match self.trie.find_anchor(&self.prefix) {
            Some(anchor) => self.trie.anchored_iter(anchor),
            None => Iter::new(&self.trie.arena, None, Vec::new(), false, 0),
        }
    }

    /// Full keys in storage order.
    pub fn keys(&self) -> Keys<'_, E, V, S> {
        Keys::new(self.iter())
    }

    /// Read-only snapshot of the current region.
    pub fn as_view(&self) -> Result<SubTrie<'_, E, V, S>> {
        self.trie.subtrie(&self.prefix)
    }
}

impl<'a, E: Clone + Eq, V, S: ChildStore<E>> SequenceMap<E, V> for SubTrieMut<'a, E, V, S> {
    fn len(&self) -> usize {
        SubTrieMut::len(self)
    }

    fn get(&self, key: &[E]) -> Option<&V> {
        SubTrieMut::get(self, key)
    }

    fn try_put(&mut self, key: &[E], value: V) -> Result<Option<V>> {
        self.put(key, value)
    }

    fn try_remove(&mut self, key: &[E]) -> Result<Option<V>> {
        Ok(self.remove(key))
    }

    fn try_clear(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}
