//! Conversions between domain keys and element sequences.
//!
//! A trie only understands sequences. An adapter maps a domain key type onto
//! one, with the empty sequence standing in for the absent key, and maps it
//! back when keys are read out of the trie.

use std::string::String;
use std::vec::Vec;

use crate::sequence::Sequence;

/// Two-way mapping between a key type and element sequences.
pub trait SequenceAdapter {
    /// The domain key.
    type Key;
    /// The element each key is decomposed into.
    type Element;

    /// Decomposes a key. `None` maps to the empty sequence.
    fn to_sequence(&self, key: Option<&Self::Key>) -> Sequence<Self::Element>;

    /// Rebuilds a key. The empty sequence maps back to `None`.
    fn from_sequence(&self, seq: &[Self::Element]) -> Option<Self::Key>;
}

/// `String` keys as sequences of `char`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringAdapter;

impl SequenceAdapter for StringAdapter {
    type Key = String;
    type Element = char;

    fn to_sequence(&self, key: Option<&String>) -> Sequence<char> {
        key.map_or_else(Sequence::empty, |s| Sequence::from(s.as_str()))
    }

    fn from_sequence(&self, seq: &[char]) -> Option<String> {
        if seq.is_empty() {
            None
        } else {
            Some(seq.iter().collect())
        }
    }
}

/// Byte-string keys as sequences of `u8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BytesAdapter;

impl SequenceAdapter for BytesAdapter {
    type Key = Vec<u8>;
    type Element = u8;

    fn to_sequence(&self, key: Option<&Vec<u8>>) -> Sequence<u8> {
        key.map_or_else(Sequence::empty, |bytes| Sequence::from(bytes.as_slice()))
    }

    fn from_sequence(&self, seq: &[u8]) -> Option<Vec<u8>> {
        if seq.is_empty() {
            None
        } else {
            Some(seq.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::SortedTrie;

    #[test]
    fn test_string_adapter_round_trip() {
        let adapter = StringAdapter;
        let key = String::from("romulus");
        let seq = adapter.to_sequence(Some(&key));
        assert_eq!(seq, "romulus");
        assert_eq!(adapter.from_sequence(&seq), Some(key));
    }

    #[test]
    fn test_absent_key_is_empty_sequence() {
        let adapter = StringAdapter;
        assert!(adapter.to_sequence(None).is_empty());
        assert_eq!(adapter.from_sequence(&[]), None);
        // An empty string is indistinguishable from the absent key.
        assert_eq!(adapter.from_sequence(&adapter.to_sequence(Some(&String::new()))), None);
    }

    #[test]
    fn test_adapter_backed_trie() {
        let adapter = BytesAdapter;
        let mut trie: SortedTrie<u8, u32> = SortedTrie::patricia();
        trie.put(adapter.to_sequence(Some(&b"beta".to_vec())), 2);
        trie.put(adapter.to_sequence(Some(&b"alpha".to_vec())), 1);
        trie.put(adapter.to_sequence(None), 0);

        let keys: Vec<Option<Vec<u8>>> = trie.keys().map(|k| adapter.from_sequence(&k)).collect();
        assert_eq!(keys, vec![None, Some(b"alpha".to_vec()), Some(b"beta".to_vec())]);
    }
}
