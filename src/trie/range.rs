//! Bounded, optionally descending views over an ordered trie.

use core::cmp::Ordering;
use core::ops::{Bound, RangeBounds};

use super::children::{ChildStore, OrderedChildStore};
use super::map::Trie;
use super::node::NodeId;
use super::SequenceMap;
use crate::error::{Result, TrieError};
use crate::sequence::Sequence;

fn owned_bound<E: Clone, K: AsRef<[E]>>(bound: Bound<&K>) -> Bound<Sequence<E>> {
    match bound {
        Bound::Included(k) => Bound::Included(Sequence::from(k.as_ref())),
        Bound::Excluded(k) => Bound::Excluded(Sequence::from(k.as_ref())),
        Bound::Unbounded => Bound::Unbounded,
    }
}

fn bound_of<E: Clone>(key: &[E], inclusive: bool) -> Bound<Sequence<E>> {
    if inclusive {
        Bound::Included(Sequence::from(key))
    } else {
        Bound::Excluded(Sequence::from(key))
    }
}

/// A window onto the keys of an ordered trie between two bounds.
///
/// Views are live: they borrow the trie and see its current contents. They
/// are read-only; writes through [`SequenceMap`] fail with
/// [`TrieError::UnsupportedMutation`].
///
/// Bounds are always stored in the trie's natural direction. A descending
/// view walks from the upper bound down, and its `head`/`tail` narrowing is
/// expressed in that reversed order.
pub struct RangeView<'a, E, V, S: ChildStore<E>> {
    trie: &'a Trie<E, V, S>,
    lower: Bound<Sequence<E>>,
    upper: Bound<Sequence<E>>,
    descending: bool,
}

impl<E: Clone + Eq, V, S: OrderedChildStore<E>> Trie<E, V, S> {
    /// View of every key in ascending order.
    pub fn ascending_view(&self) -> RangeView<'_, E, V, S> {
        RangeView::new(self, Bound::Unbounded, Bound::Unbounded, false)
    }

    /// View of every key in descending order.
    pub fn descending_view(&self) -> RangeView<'_, E, V, S> {
        RangeView::new(self, Bound::Unbounded, Bound::Unbounded, true)
    }

    /// Keys below `to` (inclusive when `inclusive`).
    pub fn head_view<K: AsRef<[E]>>(&self, to: K, inclusive: bool) -> RangeView<'_, E, V, S> {
        RangeView::new(self, Bound::Unbounded, bound_of(to.as_ref(), inclusive), false)
    }

    /// Keys above `from` (inclusive when `inclusive`).
    pub fn tail_view<K: AsRef<[E]>>(&self, from: K, inclusive: bool) -> RangeView<'_, E, V, S> {
        RangeView::new(self, bound_of(from.as_ref(), inclusive), Bound::Unbounded, false)
    }

    /// Keys between `from` and `to`.
    ///
    /// Fails with `InvalidArgument` when `from` sorts after `to`.
    pub fn sub_view<K: AsRef<[E]>>(
        &self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<RangeView<'_, E, V, S>> {
        let (from, to) = (from.as_ref(), to.as_ref());
        if self.compare_keys(from, to) == Ordering::Greater {
            return Err(TrieError::invalid("range start sorts after range end"));
        }
        Ok(RangeView::new(
            self,
            bound_of(from, from_inclusive),
            bound_of(to, to_inclusive),
            false,
        ))
    }

    /// View over a standard range of keys, e.g. `trie.range(a..=b)`.
    pub fn range<K, R>(&self, range: R) -> Result<RangeView<'_, E, V, S>>
    where
        K: AsRef<[E]>,
        R: RangeBounds<K>,
    {
        let lower = owned_bound(range.start_bound());
        let upper = owned_bound(range.end_bound());
        if let (Bound::Included(lo) | Bound::Excluded(lo), Bound::Included(hi) | Bound::Excluded(hi)) =
            (&lower, &upper)
        {
            if self.compare_keys(lo, hi) == Ordering::Greater {
                return Err(TrieError::invalid("range start sorts after range end"));
            }
        }
        Ok(RangeView::new(self, lower, upper, false))
    }
}

impl<'a, E: Clone + Eq, V, S: OrderedChildStore<E>> RangeView<'a, E, V, S> {
    fn new(
        trie: &'a Trie<E, V, S>,
        lower: Bound<Sequence<E>>,
        upper: Bound<Sequence<E>>,
        descending: bool,
    ) -> Self {
        Self {
            trie,
            lower,
            upper,
            descending,
        }
    }

    /// Returns `true` if the view walks keys from largest to smallest.
    pub fn is_descending(&self) -> bool {
        self.descending
    }

    fn above_lower(&self, key: &[E]) -> bool {
        match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(lo) => self.trie.compare_keys(key, lo) != Ordering::Less,
            Bound::Excluded(lo) => self.trie.compare_keys(key, lo) == Ordering::Greater,
        }
    }

    fn below_upper(&self, key: &[E]) -> bool {
        match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(hi) => self.trie.compare_keys(key, hi) != Ordering::Greater,
            Bound::Excluded(hi) => self.trie.compare_keys(key, hi) == Ordering::Less,
        }
    }

    /// Returns `true` if `key` lies inside the view's bounds.
    pub fn in_range(&self, key: &[E]) -> bool {
        self.above_lower(key) && self.below_upper(key)
    }

    /// Checks that a new bound at `key` does not widen the view.
    fn check_narrowing(&self, key: &[E], inclusive: bool) -> Result<()> {
        let within = |bound: &Bound<Sequence<E>>, outside: Ordering| match bound {
            Bound::Unbounded => true,
            Bound::Included(b) => self.trie.compare_keys(key, b) != outside,
            Bound::Excluded(b) => match self.trie.compare_keys(key, b) {
                Ordering::Equal => !inclusive,
                ord => ord != outside,
            },
        };
        if within(&self.lower, Ordering::Less) && within(&self.upper, Ordering::Greater) {
            Ok(())
        } else {
            Err(TrieError::invalid("bound lies outside the view"))
        }
    }

    fn narrowed(&self) -> RangeView<'a, E, V, S> {
        Self::new(self.trie, self.lower.clone(), self.upper.clone(), self.descending)
    }

    /// Same bounds, opposite direction.
    pub fn descending_view(&self) -> RangeView<'a, E, V, S> {
        Self::new(self.trie, self.lower.clone(), self.upper.clone(), !self.descending)
    }

    /// Keys before `to` in this view's direction.
    pub fn head_view<K: AsRef<[E]>>(&self, to: K, inclusive: bool) -> Result<RangeView<'a, E, V, S>> {
        let to = to.as_ref();
        self.check_narrowing(to, inclusive)?;
        let mut view = self.narrowed();
        if self.descending {
            view.lower = bound_of(to, inclusive);
        } else {
            view.upper = bound_of(to, inclusive);
        }
        Ok(view)
    }

    /// Keys after `from` in this view's direction.
    pub fn tail_view<K: AsRef<[E]>>(&self, from: K, inclusive: bool) -> Result<RangeView<'a, E, V, S>> {
        let from = from.as_ref();
        self.check_narrowing(from, inclusive)?;
        let mut view = self.narrowed();
        if self.descending {
            view.upper = bound_of(from, inclusive);
        } else {
            view.lower = bound_of(from, inclusive);
        }
        Ok(view)
    }

    /// Keys from `from` to `to` in this view's direction.
    pub fn sub_view<K: AsRef<[E]>>(
        &self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<RangeView<'a, E, V, S>> {
        let (from, to) = (from.as_ref(), to.as_ref());
        let order = self.trie.compare_keys(from, to);
        let inverted = if self.descending {
            order == Ordering::Less
        } else {
            order == Ordering::Greater
        };
        if inverted {
            return Err(TrieError::invalid("range start sorts after range end"));
        }
        self.tail_view(from, from_inclusive)?
            .head_view(to, to_inclusive)
    }

    /// Value for `key` if it is stored and inside the view.
    pub fn get<K: AsRef<[E]>>(&self, key: K) -> Option<&'a V> {
        let key = key.as_ref();
        if !self.in_range(key) {
            return None;
        }
        self.trie.get(key)
    }

    /// Returns `true` if `key` is stored and inside the view.
    pub fn contains_key<K: AsRef<[E]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Iterates the view's entries in its direction.
    pub fn iter(&self) -> RangeIter<'a, E, V, S> {
        let next = if self.descending {
            match &self.upper {
                Bound::Unbounded => self.trie.last_node(),
                Bound::Included(hi) => self.trie.floor_node(hi, true),
                Bound::Excluded(hi) => self.trie.floor_node(hi, false),
            }
        } else {
            match &self.lower {
                Bound::Unbounded => self.trie.first_node(),
                Bound::Included(lo) => self.trie.ceiling_node(lo, true),
                Bound::Excluded(lo) => self.trie.ceiling_node(lo, false),
            }
        };
        let stop = if self.descending {
            self.lower.clone()
        } else {
            self.upper.clone()
        };
        RangeIter {
            trie: self.trie,
            next,
            stop,
            descending: self.descending,
        }
    }

    /// Keys of the view in its direction.
    pub fn keys(&self) -> impl Iterator<Item = Sequence<E>> + 'a {
        self.iter().map(|(k, _)| k)
    }

    /// Values of the view in key order of its direction.
    pub fn values(&self) -> impl Iterator<Item = &'a V> + 'a {
        self.iter().map(|(_, v)| v)
    }

    /// Number of keys in the view. Walks the range.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no stored key lies inside the view.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// First entry in the view's direction.
    pub fn first_entry(&self) -> Option<(Sequence<E>, &'a V)> {
        self.iter().next()
    }

    /// Last entry in the view's direction.
    pub fn last_entry(&self) -> Option<(Sequence<E>, &'a V)> {
        self.descending_view().iter().next()
    }

    /// First key in the view's direction, or `NotFound` when the view is empty.
    pub fn first_key(&self) -> Result<Sequence<E>> {
        self.first_entry()
            .map(|(k, _)| k)
            .ok_or_else(|| TrieError::not_found("first key of an empty view"))
    }

    /// Last key in the view's direction, or `NotFound` when the view is empty.
    pub fn last_key(&self) -> Result<Sequence<E>> {
        self.last_entry()
            .map(|(k, _)| k)
            .ok_or_else(|| TrieError::not_found("last key of an empty view"))
    }
}

/// Iterator over a [`RangeView`].
pub struct RangeIter<'a, E, V, S: ChildStore<E>> {
    trie: &'a Trie<E, V, S>,
    next: Option<NodeId>,
    stop: Bound<Sequence<E>>,
    descending: bool,
}

impl<'a, E: Clone + Eq, V, S: OrderedChildStore<E>> Iterator for RangeIter<'a, E, V, S> {
    type Item = (Sequence<E>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let key = self.trie.arena.key_of(id);
        let past = match &self.stop {
            Bound::Unbounded => false,
            Bound::Included(b) => {
                let ord = self.trie.compare_keys(&key, b);
                if self.descending {
                    ord == Ordering::Less
                } else {
                    ord == Ordering::Greater
                }
            }
            Bound::Excluded(b) => {
                let ord = self.trie.compare_keys(&key, b);
                if self.descending {
                    ord != Ordering::Greater
                } else {
                    ord != Ordering::Less
                }
            }
        };
        if past {
            self.next = None;
            return None;
        }
        self.next = if self.descending {
            self.trie.predecessor(id)
        } else {
            self.trie.successor(id)
        };
        let value = self.trie.arena[id].value.get()?;
        Some((key, value))
    }
}

impl<'a, E: Clone + Eq, V, S: OrderedChildStore<E>> SequenceMap<E, V> for RangeView<'a, E, V, S> {
    fn len(&self) -> usize {
        RangeView::len(self)
    }

    fn get(&self, key: &[E]) -> Option<&V> {
        RangeView::get(self, key)
    }

    fn try_put(&mut self, _key: &[E], _value: V) -> Result<Option<V>> {
        Err(TrieError::UnsupportedMutation("range views are read-only"))
    }

    fn try_remove(&mut self, _key: &[E]) -> Result<Option<V>> {
        Err(TrieError::UnsupportedMutation("range views are read-only"))
    }

    fn try_clear(&mut self) -> Result<()> {
        Err(TrieError::UnsupportedMutation("range views are read-only"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::SortedTrie;

    fn romans() -> SortedTrie<char, usize> {
        let mut trie = SortedTrie::patricia();
        for (i, k) in ["romane", "romanus", "romulus", "rubens", "ruber", "rubicon", "rubicundus"]
            .iter()
            .enumerate()
        {
            trie.put(Sequence::from(*k), i);
        }
        trie
    }

    fn names<I: Iterator<Item = Sequence<char>>>(keys: I) -> Vec<String> {
        keys.map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_head_tail_sub() {
        let trie = romans();
        assert_eq!(
            names(trie.head_view(Sequence::from("rubens"), false).keys()),
            vec!["romane", "romanus", "romulus"]
        );
        assert_eq!(
            names(trie.tail_view(Sequence::from("rubicon"), true).keys()),
            vec!["rubicon", "rubicundus"]
        );
        let sub = trie
            .sub_view(Sequence::from("romb"), true, Sequence::from("ruber"), true)
            .unwrap();
        assert_eq!(names(sub.keys()), vec!["romulus", "rubens", "ruber"]);
        assert_eq!(sub.len(), 3);
        assert!(sub.contains_key(Sequence::from("rubens")));
        assert!(!sub.contains_key(Sequence::from("romane")));
    }

    #[test]
    fn test_descending_is_reverse() {
        let trie = romans();
        let mut ascending = names(trie.ascending_view().keys());
        ascending.reverse();
        assert_eq!(names(trie.descending_view().keys()), ascending);

        let sub = trie.range(Sequence::from("romanus")..Sequence::from("rubicon")).unwrap();
        assert_eq!(
            names(sub.descending_view().keys()),
            vec!["ruber", "rubens", "romulus", "romanus"]
        );
        assert_eq!(sub.last_key().unwrap(), "ruber");
        assert_eq!(sub.descending_view().first_key().unwrap(), "ruber");
    }

    #[test]
    fn test_descending_narrowing() {
        let trie = romans();
        let desc = trie.descending_view();
        let head = desc.head_view(Sequence::from("rubens"), false).unwrap();
        assert_eq!(names(head.keys()), vec!["rubicundus", "rubicon", "ruber"]);
        let tail = desc.tail_view(Sequence::from("romulus"), true).unwrap();
        assert_eq!(names(tail.keys()), vec!["romulus", "romanus", "romane"]);
        assert!(desc
            .sub_view(Sequence::from("romane"), true, Sequence::from("rubens"), true)
            .is_err());
    }

    #[test]
    fn test_invalid_bounds() {
        let trie = romans();
        assert!(matches!(
            trie.sub_view(Sequence::from("s"), true, Sequence::from("a"), true),
            Err(TrieError::InvalidArgument(_))
        ));
        let head = trie.head_view(Sequence::from("rubens"), false);
        assert!(head.tail_view(Sequence::from("s"), true).is_err());
        assert!(head.head_view(Sequence::from("rubens"), true).is_err());
        assert!(head.head_view(Sequence::from("rubens"), false).is_ok());
    }

    #[test]
    fn test_view_is_read_only() {
        let trie = romans();
        let mut view = trie.ascending_view();
        assert_eq!(
            view.try_put(&['x'], 0),
            Err(TrieError::UnsupportedMutation("range views are read-only"))
        );
        assert!(view.try_clear().is_err());
        assert_eq!(SequenceMap::len(&view), 7);
    }

    #[test]
    fn test_empty_view() {
        let trie = romans();
        let view = trie.tail_view(Sequence::from("s"), true);
        assert!(view.is_empty());
        assert!(matches!(view.first_key(), Err(TrieError::NotFound(_))));
    }
}
