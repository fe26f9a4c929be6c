//! Child storage strategies.
//!
//! Every node maps the first element of each outgoing edge to the child's
//! [`NodeId`]. Siblings never share a first element, in either edge layout,
//! so the first element alone identifies an edge.
//!
//! - [`HashChildren`]: FNV hash map, O(1) average lookup, unspecified order.
//! - [`SortedChildren`]: vector sorted by the trie's element order, binary
//!   search plus indexed forward/backward scans for navigation.

use core::cmp::Ordering;
use core::hash::Hash;
use core::iter::{Copied, Map};
use core::marker::PhantomData;
use core::slice;
use std::collections::hash_map;
use std::vec::Vec;

use fnv::FnvHashMap;

use super::node::NodeId;
use crate::sequence::{ElementOrder, NaturalOrder};

/// Storage for a node's outgoing edges.
///
/// `Order` is per-trie context (an element comparator, or nothing) that the
/// trie passes into every call, so nodes do not each carry a copy of it.
pub trait ChildStore<E>: Default {
    /// Ordering context shared by all nodes of one trie.
    type Order;

    /// Iterator over child ids in storage order.
    type Ids<'a>: Iterator<Item = NodeId>
    where
        Self: 'a;

    /// Looks up the child whose edge starts with `first`.
    fn find(&self, order: &Self::Order, first: &E) -> Option<NodeId>;

    /// Adds or replaces the edge starting with `first`, returning the replaced child.
    fn insert(&mut self, order: &Self::Order, first: E, id: NodeId) -> Option<NodeId>;

    /// Removes the edge starting with `first`.
    fn remove(&mut self, order: &Self::Order, first: &E) -> Option<NodeId>;

    /// Number of children.
    fn len(&self) -> usize;

    /// Returns `true` if there are no children.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates child ids in storage order.
    fn ids(&self) -> Self::Ids<'_>;

    /// The only child, if there is exactly one.
    fn only(&self) -> Option<NodeId> {
        if self.len() == 1 {
            self.ids().next()
        } else {
            None
        }
    }
}

/// Storage whose iteration order is the trie's element order.
///
/// Tries built on an ordered store expose floor/ceiling/first/last
/// navigation and range views.
pub trait OrderedChildStore<E>: ChildStore<E> {
    /// Compares two elements under the trie's order.
    fn compare(order: &Self::Order, a: &E, b: &E) -> Ordering;

    /// Compares two sequences lexicographically under the trie's order.
    fn compare_seq(order: &Self::Order, a: &[E], b: &[E]) -> Ordering {
        for (x, y) in a.iter().zip(b.iter()) {
            match Self::compare(order, x, y) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        a.len().cmp(&b.len())
    }

    /// Binary search for `first`: `Ok(index)` if present, else the insertion point.
    fn search(&self, order: &Self::Order, first: &E) -> Result<usize, usize>;

    /// Child at `index` in ascending order.
    fn id_at(&self, index: usize) -> Option<NodeId>;

    /// Smallest child.
    fn first_id(&self) -> Option<NodeId> {
        self.id_at(0)
    }

    /// Largest child.
    fn last_id(&self) -> Option<NodeId> {
        self.len().checked_sub(1).and_then(|i| self.id_at(i))
    }
}

/// Hash-based children, keyed by first edge element.
#[derive(Debug, Clone)]
pub struct HashChildren<E> {
    map: FnvHashMap<E, NodeId>,
}

impl<E> Default for HashChildren<E> {
    fn default() -> Self {
        Self {
            map: FnvHashMap::default(),
        }
    }
}

impl<E: Hash + Eq> ChildStore<E> for HashChildren<E> {
    type Order = ();
    type Ids<'a> = Copied<hash_map::Values<'a, E, NodeId>> where Self: 'a;

    #[inline]
    fn find(&self, _order: &(), first: &E) -> Option<NodeId> {
        self.map.get(first).copied()
    }

    #[inline]
    fn insert(&mut self, _order: &(), first: E, id: NodeId) -> Option<NodeId> {
        self.map.insert(first, id)
    }

    #[inline]
    fn remove(&mut self, _order: &(), first: &E) -> Option<NodeId> {
        self.map.remove(first)
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    fn ids(&self) -> Self::Ids<'_> {
        self.map.values().copied()
    }
}

type EntryId<E> = fn(&(E, NodeId)) -> NodeId;

/// Children sorted by first edge element under an [`ElementOrder`].
pub struct SortedChildren<E, C = NaturalOrder> {
    entries: Vec<(E, NodeId)>,
    _order: PhantomData<fn() -> C>,
}

impl<E, C> Default for SortedChildren<E, C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            _order: PhantomData,
        }
    }
}

impl<E: Clone, C> Clone for SortedChildren<E, C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            _order: PhantomData,
        }
    }
}

impl<E: core::fmt::Debug, C> core::fmt::Debug for SortedChildren<E, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(e, id)| (e, id))).finish()
    }
}

impl<E, C: ElementOrder<E>> SortedChildren<E, C> {
    #[inline]
    fn position(&self, order: &C, first: &E) -> Result<usize, usize> {
        self.entries.binary_search_by(|(e, _)| order.compare(e, first))
    }
}

impl<E, C: ElementOrder<E>> ChildStore<E> for SortedChildren<E, C> {
    type Order = C;
    type Ids<'a> = Map<slice::Iter<'a, (E, NodeId)>, EntryId<E>> where Self: 'a;

    #[inline]
    fn find(&self, order: &C, first: &E) -> Option<NodeId> {
        self.position(order, first).ok().map(|pos| self.entries[pos].1)
    }

    fn insert(&mut self, order: &C, first: E, id: NodeId) -> Option<NodeId> {
        match self.position(order, &first) {
            Ok(pos) => Some(core::mem::replace(&mut self.entries[pos].1, id)),
            Err(pos) => {
                self.entries.insert(pos, (first, id));
                None
            }
        }
    }

    fn remove(&mut self, order: &C, first: &E) -> Option<NodeId> {
        self.position(order, first)
            .ok()
            .map(|pos| self.entries.remove(pos).1)
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn ids(&self) -> Self::Ids<'_> {
        let id_of: EntryId<E> = |entry| entry.1;
        self.entries.iter().map(id_of)
    }
}

impl<E, C: ElementOrder<E>> OrderedChildStore<E> for SortedChildren<E, C> {
    #[inline]
    fn compare(order: &C, a: &E, b: &E) -> Ordering {
        order.compare(a, b)
    }

    #[inline]
    fn search(&self, order: &C, first: &E) -> Result<usize, usize> {
        self.position(order, first)
    }

    #[inline]
    fn id_at(&self, index: usize) -> Option<NodeId> {
        self.entries.get(index).map(|entry| entry.1)
    }
}
