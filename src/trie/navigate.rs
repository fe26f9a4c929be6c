//! Ordered navigation for tries with sorted children.
//!
//! Keys are ordered lexicographically under the trie's element order with a
//! prefix sorting before its extensions, which is exactly pre-order over
//! sorted children. All searches below work on nodes and only rebuild a key
//! for the node they finally return.

use core::cmp::Ordering;

use super::children::OrderedChildStore;
use super::map::Trie;
use super::node::NodeId;
use crate::error::{Result, TrieError};
use crate::sequence::{common_prefix_len, Sequence};

impl<E: Clone + Eq, V, S: OrderedChildStore<E>> Trie<E, V, S> {
    /// The element order used by this trie.
    pub fn comparator(&self) -> &S::Order {
        &self.order
    }

    /// Compares two keys under this trie's order.
    pub fn compare_keys(&self, a: &[E], b: &[E]) -> Ordering {
        S::compare_seq(&self.order, a, b)
    }

    /// Smallest key in the trie.
    pub fn first_key(&self) -> Result<Sequence<E>> {
        self.first_node()
            .map(|id| self.arena.key_of(id))
            .ok_or_else(|| TrieError::not_found("first key of an empty trie"))
    }

    /// Largest key in the trie.
    pub fn last_key(&self) -> Result<Sequence<E>> {
        self.last_node()
            .map(|id| self.arena.key_of(id))
            .ok_or_else(|| TrieError::not_found("last key of an empty trie"))
    }

    /// Entry with the smallest key.
    pub fn first_entry(&self) -> Option<(Sequence<E>, &V)> {
        self.first_node().and_then(|id| self.entry_at(id))
    }

    /// Entry with the largest key.
    pub fn last_entry(&self) -> Option<(Sequence<E>, &V)> {
        self.last_node().and_then(|id| self.entry_at(id))
    }

    /// Greatest entry whose key is less than or equal to `key`.
    pub fn floor_entry<K: AsRef<[E]>>(&self, key: K) -> Option<(Sequence<E>, &V)> {
        self.floor_node(key.as_ref(), true)
            .and_then(|id| self.entry_at(id))
    }

    /// Least entry whose key is greater than or equal to `key`.
    pub fn ceiling_entry<K: AsRef<[E]>>(&self, key: K) -> Option<(Sequence<E>, &V)> {
        self.ceiling_node(key.as_ref(), true)
            .and_then(|id| self.entry_at(id))
    }

    /// Greatest entry whose key is strictly less than `key`.
    pub fn lower_entry<K: AsRef<[E]>>(&self, key: K) -> Option<(Sequence<E>, &V)> {
        self.floor_node(key.as_ref(), false)
            .and_then(|id| self.entry_at(id))
    }

    /// Least entry whose key is strictly greater than `key`.
    pub fn higher_entry<K: AsRef<[E]>>(&self, key: K) -> Option<(Sequence<E>, &V)> {
        self.ceiling_node(key.as_ref(), false)
            .and_then(|id| self.entry_at(id))
    }

    /// Greatest key less than or equal to `key`.
    pub fn floor_key<K: AsRef<[E]>>(&self, key: K) -> Option<Sequence<E>> {
        self.floor_entry(key).map(|(k, _)| k)
    }

    /// Least key greater than or equal to `key`.
    pub fn ceiling_key<K: AsRef<[E]>>(&self, key: K) -> Option<Sequence<E>> {
        self.ceiling_entry(key).map(|(k, _)| k)
    }

    /// Greatest key strictly less than `key`.
    pub fn lower_key<K: AsRef<[E]>>(&self, key: K) -> Option<Sequence<E>> {
        self.lower_entry(key).map(|(k, _)| k)
    }

    /// Least key strictly greater than `key`.
    pub fn higher_key<K: AsRef<[E]>>(&self, key: K) -> Option<Sequence<E>> {
        self.higher_entry(key).map(|(k, _)| k)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn poll_first(&mut self) -> Option<(Sequence<E>, V)> {
        let id = self.first_node()?;
        let key = self.arena.key_of(id);
        self.remove_at(id).map(|value| (key, value))
    }

    /// Removes and returns the entry with the largest key.
    pub fn poll_last(&mut self) -> Option<(Sequence<E>, V)> {
        let id = self.last_node()?;
        let key = self.arena.key_of(id);
        self.remove_at(id).map(|value| (key, value))
    }

    pub(crate) fn entry_at(&self, id: NodeId) -> Option<(Sequence<E>, &V)> {
        let value = self.arena[id].value.get()?;
        Some((self.arena.key_of(id), value))
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.root.map(|root| self.min_in(root))
    }

    pub(crate) fn last_node(&self) -> Option<NodeId> {
        self.root.map(|root| self.max_in(root))
    }

    /// Smallest valued node in the subtree of `id`.
    pub(crate) fn min_in(&self, mut id: NodeId) -> NodeId {
        loop {
            let node = &self.arena[id];
            if node.value.is_set() {
                return id;
            }
            match node.children.first_id() {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// Largest node in the subtree of `id`; always a leaf, and leaves carry values.
    pub(crate) fn max_in(&self, mut id: NodeId) -> NodeId {
        while let Some(child) = self.arena[id].children.last_id() {
            id = child;
        }
        id
    }

    fn sibling(&self, id: NodeId, forward: bool) -> Option<NodeId> {
        let node = &self.arena[id];
        let siblings = &self.arena[node.parent?].children;
        let pos = siblings.search(&self.order, &node.label[0]).ok()?;
        if forward {
            siblings.id_at(pos + 1)
        } else {
            pos.checked_sub(1).and_then(|p| siblings.id_at(p))
        }
    }

    /// First valued node after every key in the subtree of `id`.
    fn after(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            if let Some(next) = self.sibling(cur, true) {
                return Some(self.min_in(next));
            }
            cur = self.arena[cur].parent?;
        }
    }

    /// Last valued node before the key of `id`.
    fn before(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            if let Some(prev) = self.sibling(cur, false) {
                return Some(self.max_in(prev));
            }
            let parent = self.arena[cur].parent?;
            if self.arena[parent].value.is_set() {
                return Some(parent);
            }
            cur = parent;
        }
    }

    /// In-order successor of a valued node.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        match self.arena[id].children.first_id() {
            Some(child) => Some(self.min_in(child)),
            None => self.after(id),
        }
    }

    /// In-order predecessor of a valued node.
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.before(id)
    }

    /// Least valued node whose key is `>= target` (or `> target`).
    pub(crate) fn ceiling_node(&self, target: &[E], inclusive: bool) -> Option<NodeId> {
        let mut cur = self.root?;
        let mut rest = target;
        loop {
            let node = &self.arena[cur];
            let Some(first) = rest.first() else {
                if inclusive && node.value.is_set() {
                    return Some(cur);
                }
                return match node.children.first_id() {
                    Some(child) => Some(self.min_in(child)),
                    None => self.after(cur),
                };
            };
            match node.children.search(&self.order, first) {
                Ok(pos) => {
                    let child = node.children.id_at(pos)?;
                    let label = &self.arena[child].label;
                    let matched = common_prefix_len(rest, label);
                    if matched == label.len() {
                        cur = child;
                        rest = &rest[matched..];
                        continue;
                    }
                    // Target ends inside the edge: every key below extends it.
                    if matched == rest.len() {
                        return Some(self.min_in(child));
                    }
                    return match S::compare(&self.order, &rest[matched], &label[matched]) {
                        Ordering::Less => Some(self.min_in(child)),
                        _ => self.after(child),
                    };
                }
                Err(pos) => {
                    return match node.children.id_at(pos) {
                        Some(next) => Some(self.min_in(next)),
                        None => self.after(cur),
                    };
                }
            }
        }
    }

    /// Greatest valued node whose key is `<= target` (or `< target`).
    pub(crate) fn floor_node(&self, target: &[E], inclusive: bool) -> Option<NodeId> {
        let mut cur = self.root?;
        let mut rest = target;
        loop {
            let node = &self.arena[cur];
            let Some(first) = rest.first() else {
                if inclusive && node.value.is_set() {
                    return Some(cur);
                }
                return self.before(cur);
            };
            match node.children.search(&self.order, first) {
                Ok(pos) => {
                    let child = node.children.id_at(pos)?;
                    let label = &self.arena[child].label;
                    let matched = common_prefix_len(rest, label);
                    if matched == label.len() {
                        cur = child;
                        rest = &rest[matched..];
                        continue;
                    }
                    if matched == rest.len() {
                        return self.before(child);
                    }
                    return match S::compare(&self.order, &rest[matched], &label[matched]) {
                        Ordering::Less => self.before(child),
                        _ => Some(self.max_in(child)),
                    };
                }
                Err(pos) => {
                    if let Some(prev) = pos.checked_sub(1).and_then(|p| node.children.id_at(p)) {
                        return Some(self.max_in(prev));
                    }
                    if node.value.is_set() {
                        return Some(cur);
                    }
                    return self.before(cur);
                }
            }
        }
    }
}
