//! Sequence-keyed tries.
//!
//! One engine, [`Trie`], parameterised over child storage:
//!
//! - [`HashTrie`]: hashed children, unordered iteration.
//! - [`SortedTrie`]: sorted children, ascending iteration, floor/ceiling
//!   navigation and range views.
//!
//! Either can use the plain layout (one element per edge, [`Trie::new`]) or
//! the radix-compressed Patricia layout ([`Trie::patricia`]).
//!
//! Views ([`SubTrie`], [`RangeView`], [`ReadOnly`]) borrow the trie and share
//! its nodes. [`SubTrieMut`] writes through to the parent.

pub mod children;
pub mod iter;
pub mod range;
pub mod read_only;
pub mod sub_trie;
pub mod value;

mod map;
mod navigate;
mod node;
mod radix;
mod verify;

pub use children::{ChildStore, HashChildren, OrderedChildStore, SortedChildren};
pub use iter::{Cursor, Iter, Keys, Values};
pub use map::{HashTrie, SortedTrie, Trie};
pub use node::{NodeId, NodeRef};
pub use range::{RangeIter, RangeView};
pub use read_only::ReadOnly;
pub use sub_trie::{SubTrie, SubTrieMut};
pub use value::NodeValue;

use crate::error::Result;

/// Common interface of tries and their views.
///
/// Writes are fallible because some implementors are read-only and answer
/// every write with [`TrieError::UnsupportedMutation`](crate::error::TrieError::UnsupportedMutation).
pub trait SequenceMap<E, V> {
    /// Number of keys.
    fn len(&self) -> usize;

    /// Returns `true` if there are no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored under `key`.
    fn get(&self, key: &[E]) -> Option<&V>;

    /// Returns `true` if `key` is stored.
    fn contains_key(&self, key: &[E]) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    fn try_put(&mut self, key: &[E], value: V) -> Result<Option<V>>;

    /// Removes `key`, returning its value.
    fn try_remove(&mut self, key: &[E]) -> Result<Option<V>>;

    /// Removes every key.
    fn try_clear(&mut self) -> Result<()>;
}

impl<E: Clone + Eq, V, S: ChildStore<E>> SequenceMap<E, V> for Trie<E, V, S> {
    fn len(&self) -> usize {
        Trie::len(self)
    }

    fn get(&self, key: &[E]) -> Option<&V> {
        Trie::get(self, key)
    }

    fn try_put(&mut self, key: &[E], value: V) -> Result<Option<V>> {
        Ok(self.put(key, value))
    }

    fn try_remove(&mut self, key: &[E]) -> Result<Option<V>> {
        Ok(self.remove(key))
    }

    fn try_clear(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<E: Clone + Eq, V, S: ChildStore<E>> Trie<E, V, S> {
    /// Read-only decorator over this trie.
    pub fn read_only(&self) -> ReadOnly<'_, E, V, Self> {
        ReadOnly::new(self)
    }
}
