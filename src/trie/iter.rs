//! Iterators and the fail-fast cursor.

use std::vec::Vec;

use super::children::ChildStore;
use super::map::Trie;
use super::node::{NodeArena, NodeId};
use crate::error::{Result, TrieError};
use crate::sequence::Sequence;
use crate::trace::trace_event;

/// Iterator over the entries of a trie or sub-trie, in storage order.
///
/// Yields `(full key, &value)`. Keys are assembled in a shared buffer as the
/// walk descends and copied out once per yielded entry.
pub struct Iter<'a, E, V, S>
where
    S: ChildStore<E> + 'a,
{
    arena: &'a NodeArena<E, V, S>,
    /// Subtree root not yet entered, and whether its own value is skipped.
    start: Option<(NodeId, bool)>,
    // Stack of (label length, remaining children)
    stack: Vec<(usize, S::Ids<'a>)>,
    // Current constructed key
    key_buf: Vec<E>,
    remaining: usize,
}

impl<'a, E, V, S> Iter<'a, E, V, S>
where
    S: ChildStore<E> + 'a,
{
    /// `base` is the key of `start`'s parent; `remaining` the exact entry count.
    pub(crate) fn new(
        arena: &'a NodeArena<E, V, S>,
        start: Option<NodeId>,
        base: Vec<E>,
        skip_start_value: bool,
        remaining: usize,
    ) -> Self {
        Self {
            arena,
            start: start.map(|id| (id, skip_start_value)),
            stack: Vec::new(),
            key_buf: base,
            remaining,
        }
    }
}

impl<'a, E: Clone, V, S> Iter<'a, E, V, S>
where
    S: ChildStore<E> + 'a,
{
    fn enter(&mut self, id: NodeId, skip_value: bool) -> Option<(Sequence<E>, &'a V)> {
        let arena = self.arena;
        let node = &arena[id];
        self.key_buf.extend_from_slice(&node.label);
        self.stack.push((node.label.len(), node.children.ids()));
        if skip_value {
            return None;
        }
        let value = node.value.get()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((Sequence::from(self.key_buf.as_slice()), value))
    }
}

impl<'a, E: Clone, V, S> Iterator for Iter<'a, E, V, S>
where
    S: ChildStore<E> + 'a,
{
    type Item = (Sequence<E>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((id, skip)) = self.start.take() {
            if let Some(item) = self.enter(id, skip) {
                return Some(item);
            }
        }
        loop {
            let (_, children) = self.stack.last_mut()?;
            match children.next() {
                Some(child) => {
                    if let Some(item) = self.enter(child, false) {
                        return Some(item);
                    }
                }
                None => {
                    // Done with this node
                    let (label_len, _) = self.stack.pop()?;
                    let new_len = self.key_buf.len() - label_len;
                    self.key_buf.truncate(new_len);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, E: Clone, V, S> ExactSizeIterator for Iter<'a, E, V, S> where S: ChildStore<E> + 'a {}

/// Iterator over keys.
pub struct Keys<'a, E, V, S>
where
    S: ChildStore<E> + 'a,
{
    inner: Iter<'a, E, V, S>,
}

impl<'a, E, V, S: ChildStore<E> + 'a> Keys<'a, E, V, S> {
    pub(crate) fn new(inner: Iter<'a, E, V, S>) -> Self {
        Self { inner }
    }
}

impl<'a, E: Clone, V, S: ChildStore<E> + 'a> Iterator for Keys<'a, E, V, S> {
    type Item = Sequence<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over values.
pub struct Values<'a, E, V, S>
where
    S: ChildStore<E> + 'a,
{
    inner: Iter<'a, E, V, S>,
}

impl<'a, E, V, S: ChildStore<E> + 'a> Values<'a, E, V, S> {
    pub(crate) fn new(inner: Iter<'a, E, V, S>) -> Self {
        Self { inner }
    }
}

impl<'a, E: Clone, V, S: ChildStore<E> + 'a> Iterator for Values<'a, E, V, S> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A detached, fail-fast position in a trie's pre-order.
///
/// The cursor holds node handles and a snapshot of the trie's generation
/// instead of a borrow, so the trie can be passed back in mutably to
/// [`Cursor::remove`]. Any structural change made behind the cursor's back
/// (a new key, a removed key, a clear) makes the next call fail with
/// [`TrieError::StructuralChange`]. Replacing the value of an existing key is
/// not a structural change.
///
/// A cursor must only be used with the trie that created it.
#[derive(Debug, Clone)]
pub struct Cursor {
    // Each frame holds the unvisited siblings of one level, reversed.
    stack: Vec<Vec<NodeId>>,
    expected: u64,
    last: Option<NodeId>,
}

impl Cursor {
    pub(crate) fn new(start: Option<NodeId>, generation: u64) -> Self {
        Self {
            stack: vec![start.into_iter().collect()],
            expected: generation,
            last: None,
        }
    }

    /// Generation the cursor expects the trie to be at.
    pub fn expected_generation(&self) -> u64 {
        self.expected
    }

    /// Advances to the next entry.
    ///
    /// Returns `Ok(None)` once every entry has been visited.
    pub fn next_entry<'t, E, V, S>(
        &mut self,
        trie: &'t Trie<E, V, S>,
    ) -> Result<Option<(Sequence<E>, &'t V)>>
    where
        E: Clone,
        S: ChildStore<E>,
    {
        self.check(trie)?;
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };
            let Some(id) = frame.pop() else {
                self.stack.pop();
                continue;
            };
            let node = &trie.arena[id];
            let mut children: Vec<NodeId> = node.children.ids().collect();
            children.reverse();
            self.stack.push(children);
            if let Some(value) = node.value.get() {
                self.last = Some(id);
                return Ok(Some((trie.arena.key_of(id), value)));
            }
        }
    }

    /// Returns `true` if another entry is available.
    pub fn has_next<E, V, S>(&self, trie: &Trie<E, V, S>) -> Result<bool>
    where
        S: ChildStore<E>,
    {
        self.check(trie)?;
        // Every frame entry roots a non-empty subtree, so one is enough.
        Ok(self.stack.iter().any(|frame| !frame.is_empty()))
    }

    /// Removes the entry most recently returned by [`Cursor::next_entry`].
    ///
    /// The cursor stays valid: the removal is applied through the trie's own
    /// removal path and the cursor adopts the new generation.
    pub fn remove<E, V, S>(&mut self, trie: &mut Trie<E, V, S>) -> Result<V>
    where
        E: Clone + Eq,
        S: ChildStore<E>,
    {
        self.check(trie)?;
        let id = self
            .last
            .take()
            .ok_or(TrieError::InvalidState("remove called before next or twice for one entry"))?;
        let value = trie
            .remove_at(id)
            .ok_or(TrieError::InvalidState("entry under the cursor is gone"))?;
        self.expected = trie.generation;
        trace_event!(node = id.index(), generation = self.expected, "cursor removed entry");
        Ok(value)
    }

    fn check<E, V, S>(&self, trie: &Trie<E, V, S>) -> Result<()>
    where
        S: ChildStore<E>,
    {
        if trie.generation != self.expected {
            trace_event!(expected = self.expected, actual = trie.generation, "stale cursor");
            return Err(TrieError::StructuralChange {
                expected: self.expected,
                actual: trie.generation,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TrieError;
    use crate::sequence::Sequence;
    use crate::trie::{HashTrie, SortedTrie};

    #[test]
    fn test_iter_is_sorted_preorder() {
        let mut trie: SortedTrie<char, usize> = SortedTrie::patricia();
        for (i, k) in ["tea", "to", "ted", "ten", "inn", "in"].iter().enumerate() {
            trie.put(Sequence::from(*k), i);
        }
        let keys: Vec<String> = trie.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["in", "inn", "tea", "ted", "ten", "to"]);
        assert_eq!(trie.iter().len(), 6);
        assert_eq!(trie.values().copied().collect::<Vec<_>>(), vec![5, 4, 0, 2, 3, 1]);
    }

    #[test]
    fn test_iter_on_empty_trie() {
        let trie: HashTrie<u8, ()> = HashTrie::new();
        assert_eq!(trie.iter().next(), None);
        let mut cursor = trie.cursor();
        assert_eq!(cursor.next_entry(&trie), Ok(None));
    }

    #[test]
    fn test_cursor_fails_fast() {
        let mut trie: SortedTrie<char, u8> = SortedTrie::new();
        trie.put(Sequence::from("a"), 1);
        trie.put(Sequence::from("b"), 2);

        let mut cursor = trie.cursor();
        assert!(cursor.next_entry(&trie).unwrap().is_some());
        trie.put(Sequence::from("c"), 3);
        assert!(matches!(
            cursor.next_entry(&trie),
            Err(TrieError::StructuralChange { .. })
        ));
    }

    #[test]
    fn test_value_replacement_is_not_structural() {
        let mut trie: SortedTrie<char, u8> = SortedTrie::new();
        trie.put(Sequence::from("a"), 1);
        trie.put(Sequence::from("b"), 2);

        let mut cursor = trie.cursor();
        cursor.next_entry(&trie).unwrap();
        trie.put(Sequence::from("b"), 20);
        let (key, value) = cursor.next_entry(&trie).unwrap().unwrap();
        assert_eq!(key, "b");
        assert_eq!(*value, 20);
    }

    #[test]
    fn test_cursor_remove_all_odd() {
        let mut trie: SortedTrie<char, u32> = SortedTrie::patricia();
        for (i, k) in ["rom", "romane", "romanus", "romulus", "rubens", "ruber"].iter().enumerate() {
            trie.put(Sequence::from(*k), i as u32);
        }

        let mut cursor = trie.cursor();
        assert_eq!(cursor.remove(&mut trie), Err(TrieError::InvalidState("remove called before next or twice for one entry")));
        let mut seen = Vec::new();
        while let Some((key, value)) = cursor.next_entry(&trie).unwrap() {
            seen.push(key.to_string());
            if value % 2 == 1 {
                cursor.remove(&mut trie).unwrap();
                assert!(cursor.remove(&mut trie).is_err());
            }
        }
        assert_eq!(seen, vec!["rom", "romane", "romanus", "romulus", "rubens", "ruber"]);
        let left: Vec<String> = trie.keys().map(|k| k.to_string()).collect();
        assert_eq!(left, vec!["rom", "romanus", "rubens"]);
        trie.verify().unwrap();
    }
}
