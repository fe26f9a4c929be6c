//! Immutable element sequences used as trie keys and edge labels.
//!
//! A `Sequence<E>` is a boxed slice: cheap to borrow as `&[E]`, never resized
//! after construction. Edge splitting and merging produce new sequences via
//! [`Sequence::subsequence`] and [`Sequence::concat`].

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Deref, RangeBounds};
use std::boxed::Box;
use std::vec::Vec;

/// A total order over key elements.
///
/// Sequences are compared lexicographically under this order, with a proper
/// prefix sorting before any of its extensions.
pub trait ElementOrder<E> {
    /// Compares two elements.
    fn compare(&self, a: &E, b: &E) -> Ordering;

    /// Compares two sequences lexicographically.
    fn compare_seq(&self, a: &[E], b: &[E]) -> Ordering {
        for (x, y) in a.iter().zip(b.iter()) {
            match self.compare(x, y) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        a.len().cmp(&b.len())
    }
}

/// Element order given by `E: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<E: Ord> ElementOrder<E> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Ordering {
        a.cmp(b)
    }
}

/// Element order given by a comparison closure.
#[derive(Clone, Copy)]
pub struct CompareFn<F>(pub F);

impl<E, F> ElementOrder<E> for CompareFn<F>
where
    F: Fn(&E, &E) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for CompareFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompareFn(..)")
    }
}

/// An immutable, ordered list of elements.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence<E> {
    elems: Box<[E]>,
}

impl<E> Sequence<E> {
    /// The empty sequence. It stands in for the absent key.
    pub fn empty() -> Self {
        Self {
            elems: Box::new([]),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns `true` for the empty sequence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Borrows the elements.
    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.elems
    }

    /// Consumes the sequence, returning its elements.
    pub fn into_vec(self) -> Vec<E> {
        self.elems.into_vec()
    }

    /// Returns `true` if `prefix` is a prefix of this sequence.
    pub fn starts_with(&self, prefix: &[E]) -> bool
    where
        E: PartialEq,
    {
        self.elems.starts_with(prefix)
    }
}

impl<E: Clone> Sequence<E> {
    /// Copies the elements in `range` into a new sequence.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    pub fn subsequence<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let start = match range.start_bound() {
            core::ops::Bound::Included(&s) => s,
            core::ops::Bound::Excluded(&s) => s + 1,
            core::ops::Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            core::ops::Bound::Included(&e) => e + 1,
            core::ops::Bound::Excluded(&e) => e,
            core::ops::Bound::Unbounded => self.len(),
        };
        Self::from(&self.elems[start..end])
    }

    /// Returns `self` followed by `other`.
    pub fn concat(&self, other: &[E]) -> Self {
        let mut elems = Vec::with_capacity(self.len() + other.len());
        elems.extend_from_slice(&self.elems);
        elems.extend_from_slice(other);
        Self::from(elems)
    }
}

/// Length of the longest common prefix of `a` and `b`.
#[inline]
pub fn common_prefix_len<E: PartialEq>(a: &[E], b: &[E]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

impl<E> Default for Sequence<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> Deref for Sequence<E> {
    type Target = [E];

    #[inline]
    fn deref(&self) -> &[E] {
        &self.elems
    }
}

impl<E> AsRef<[E]> for Sequence<E> {
    #[inline]
    fn as_ref(&self) -> &[E] {
        &self.elems
    }
}

impl<E> From<Vec<E>> for Sequence<E> {
    fn from(elems: Vec<E>) -> Self {
        Self {
            elems: elems.into_boxed_slice(),
        }
    }
}

impl<E: Clone> From<&[E]> for Sequence<E> {
    fn from(elems: &[E]) -> Self {
        Self {
            elems: Box::from(elems),
        }
    }
}

impl From<&str> for Sequence<char> {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl<E> FromIterator<E> for Sequence<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            elems: iter.into_iter().collect(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Sequence<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elems.iter()).finish()
    }
}

impl fmt::Display for Sequence<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.elems.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}

impl PartialEq<str> for Sequence<char> {
    fn eq(&self, other: &str) -> bool {
        self.elems.iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for Sequence<char> {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsequence_and_concat() {
        let s = Sequence::from("romanus");
        assert_eq!(s.subsequence(..3), "rom");
        assert_eq!(s.subsequence(3..), "anus");
        assert_eq!(s.subsequence(2..=4), "man");
        assert_eq!(s.subsequence(..3).concat(&s[3..]), s);
        assert!(s.subsequence(7..).is_empty());
    }

    #[test]
    fn test_common_prefix_len() {
        assert_eq!(common_prefix_len(&b"romane"[..], &b"romulus"[..]), 3);
        assert_eq!(common_prefix_len(&b""[..], &b"abc"[..]), 0);
        assert_eq!(common_prefix_len(&b"abc"[..], &b"abc"[..]), 3);
    }

    fn compare_str(order: &impl ElementOrder<char>, a: &str, b: &str) -> Ordering {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        order.compare_seq(&a, &b)
    }

    #[test]
    fn test_lexicographic_order() {
        assert_eq!(compare_str(&NaturalOrder, "a", "ab"), Ordering::Less);
        assert_eq!(compare_str(&NaturalOrder, "", "a"), Ordering::Less);
        assert_eq!(compare_str(&NaturalOrder, "b", "az"), Ordering::Greater);

        let reversed = CompareFn(|a: &char, b: &char| b.cmp(a));
        assert_eq!(compare_str(&reversed, "b", "az"), Ordering::Less);
        // Prefixes still come first under a reversed element order.
        assert_eq!(compare_str(&reversed, "a", "ab"), Ordering::Less);
    }

    #[test]
    fn test_display_and_str_eq() {
        let s = Sequence::from("tea");
        assert_eq!(s.to_string(), "tea");
        assert_eq!(s, "tea");
        assert_eq!(Sequence::<char>::empty(), "");
    }
}
