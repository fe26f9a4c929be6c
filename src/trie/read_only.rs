//! Read-only decorator over any [`SequenceMap`].

use core::marker::PhantomData;

use super::SequenceMap;
use crate::error::{Result, TrieError};

/// Wraps a map so that reads pass through and every write is rejected with
/// [`TrieError::UnsupportedMutation`].
pub struct ReadOnly<'a, E, V, M: ?Sized> {
    inner: &'a M,
    _marker: PhantomData<fn(&E) -> &V>,
}

impl<'a, E, V, M: SequenceMap<E, V> + ?Sized> ReadOnly<'a, E, V, M> {
    /// Wraps `inner`.
    pub fn new(inner: &'a M) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// The wrapped map.
    pub fn inner(&self) -> &'a M {
        self.inner
    }
}

impl<'a, E, V, M: ?Sized> Clone for ReadOnly<'a, E, V, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E, V, M: ?Sized> Copy for ReadOnly<'a, E, V, M> {}

impl<'a, E, V, M: SequenceMap<E, V> + ?Sized> SequenceMap<E, V> for ReadOnly<'a, E, V, M> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, key: &[E]) -> Option<&V> {
        self.inner.get(key)
    }

    fn contains_key(&self, key: &[E]) -> bool {
        self.inner.contains_key(key)
    }

    fn try_put(&mut self, _key: &[E], _value: V) -> Result<Option<V>> {
        Err(TrieError::UnsupportedMutation("read-only map"))
    }

    fn try_remove(&mut self, _key: &[E]) -> Result<Option<V>> {
        Err(TrieError::UnsupportedMutation("read-only map"))
    }

    fn try_clear(&mut self) -> Result<()> {
        Err(TrieError::UnsupportedMutation("read-only map"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::HashTrie;

    #[test]
    fn test_reads_pass_writes_fail() {
        let mut trie: HashTrie<u8, u32> = HashTrie::patricia();
        trie.put(b"key", 1);

        let mut view = trie.read_only();
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(b"key"), Some(&1));
        assert!(view.contains_key(b"key"));
        assert!(matches!(
            view.try_put(b"other", 2),
            Err(TrieError::UnsupportedMutation(_))
        ));
        assert!(view.try_remove(b"key").is_err());
        assert!(view.try_clear().is_err());
        assert_eq!(trie.len(), 1);
    }
}
