//! Presence-aware value slot.

use core::hash::{Hash, Hasher};
use core::mem;

/// The value slot of a trie node.
///
/// `Unset` means the node only exists to carry children. `Set(v)` means the
/// node's key is stored, even when `v` is itself an "empty" value such as
/// `None` of an `Option<T>`.
#[derive(Debug, Clone, Default)]
pub enum NodeValue<V> {
    /// No key ends at this node.
    #[default]
    Unset,
    /// A key ends at this node with this value.
    Set(V),
}

impl<V> NodeValue<V> {
    /// Returns `true` if a key ends here.
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, NodeValue::Set(_))
    }

    /// Borrows the stored value.
    #[inline]
    pub fn get(&self) -> Option<&V> {
        match self {
            NodeValue::Set(v) => Some(v),
            NodeValue::Unset => None,
        }
    }

    /// Mutably borrows the stored value.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut V> {
        match self {
            NodeValue::Set(v) => Some(v),
            NodeValue::Unset => None,
        }
    }

    /// Stores `value`, returning the previous slot content.
    #[inline]
    pub fn replace(&mut self, value: V) -> Option<V> {
        mem::replace(self, NodeValue::Set(value)).into_option()
    }

    /// Clears the slot, returning what it held.
    #[inline]
    pub fn take(&mut self) -> Option<V> {
        mem::take(self).into_option()
    }

    /// Converts into an `Option`, mapping `Unset` to `None`.
    #[inline]
    pub fn into_option(self) -> Option<V> {
        match self {
            NodeValue::Set(v) => Some(v),
            NodeValue::Unset => None,
        }
    }
}

impl<V> From<Option<V>> for NodeValue<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => NodeValue::Set(v),
            None => NodeValue::Unset,
        }
    }
}

/// Two slots are equal only when both are set and their values are equal.
/// An unset slot is not equal to anything, itself included, so there is no `Eq`.
impl<V: PartialEq> PartialEq for NodeValue<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeValue::Set(a), NodeValue::Set(b)) => a == b,
            _ => false,
        }
    }
}

impl<V: Hash> Hash for NodeValue<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let NodeValue::Set(v) = self {
            v.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_differs_from_present_none() {
        let mut slot: NodeValue<Option<u32>> = NodeValue::Unset;
        assert!(!slot.is_set());
        assert_eq!(slot.replace(None), None);
        assert!(slot.is_set());
        // The previous content was a stored `None`, not absence.
        assert_eq!(slot.replace(Some(7)), Some(None));
        assert_eq!(slot.take(), Some(Some(7)));
        assert!(!slot.is_set());
    }

    #[test]
    fn test_equality_requires_both_set() {
        let unset: NodeValue<u8> = NodeValue::Unset;
        assert_ne!(unset, NodeValue::Unset);
        assert_ne!(unset, NodeValue::Set(1));
        assert_eq!(NodeValue::Set(1), NodeValue::Set(1));
        assert_ne!(NodeValue::Set(1), NodeValue::Set(2));
    }
}
