//! # `seqtrie` - Sequence-Keyed Prefix Trees
//!
//! Maps from sequences of elements (characters, bytes, tokens, any `E`) to
//! values, stored as prefix trees. One engine backs three flavours:
//!
//! - **Hashed trie** (`HashTrie`): children in an FNV hash map, O(1) average
//!   step per element, unordered iteration.
//! - **Sorted trie** (`SortedTrie`): children sorted under an element order,
//!   ascending iteration, floor/ceiling/lower/higher navigation, range views.
//! - **Patricia trie** (`SortedTrie::patricia()`): the sorted trie with
//!   radix-compressed edges. Chains of single-child nodes collapse into one
//!   edge; edges split on insert and merge back on removal.
//!
//! ## Architecture
//!
//! Nodes live in a slab arena owned by the trie and refer to each other by
//! [`NodeId`](trie::NodeId). A node owns its children through handles and
//! keeps a non-owning handle to its parent, which is what lets navigation
//! climb back up and lets full keys be rebuilt on demand. Every node caches
//! the size of its subtree, so `len` is O(1) for the trie and every sub-trie.
//!
//! Child storage is a type parameter ([`ChildStore`](trie::ChildStore)); the
//! ordered API is only implemented for ordered storage, so calling `floor_key`
//! on a hashed trie is a compile error rather than a runtime one.
//!
//! ### Guarantees
//!
//! - **Absent vs. empty**: a key stored with an "empty" value (such as `None`)
//!   is present; `put` returns `Some(old)` for it.
//! - **Canonical shape**: no non-root node is both valueless and childless,
//!   and in the radix layout no non-root valueless node has a single child.
//!   [`Trie::verify`](trie::Trie::verify) checks this and every other
//!   structural invariant.
//! - **Fail-fast cursors**: a [`Cursor`](trie::Cursor) detects structural
//!   changes made behind its back and reports them instead of walking freed
//!   nodes.
//!
//! ## Example
//!
//! ```rust
//! use seqtrie::{Sequence, SortedTrie};
//!
//! let mut trie: SortedTrie<char, u32> = SortedTrie::patricia();
//! for (i, word) in ["romane", "romanus", "romulus", "rubens"].iter().enumerate() {
//!     trie.put(Sequence::from(*word), i as u32);
//! }
//!
//! assert_eq!(trie.get(Sequence::from("romulus")), Some(&2));
//! assert_eq!(trie.floor_key(Sequence::from("romb")).unwrap(), "romanus");
//!
//! let rom = trie.subtrie(Sequence::from("rom")).unwrap();
//! assert_eq!(rom.len(), 3);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod sequence;
pub mod trie;

mod trace;

pub use adapter::{BytesAdapter, SequenceAdapter, StringAdapter};
pub use config::{EdgeCompression, TrieConfig};
pub use error::{Result, TrieError};
pub use sequence::{CompareFn, ElementOrder, NaturalOrder, Sequence};
pub use trie::{
    Cursor,
    HashTrie,
    NodeId,
    NodeRef,
    RangeView,
    ReadOnly,
    SequenceMap,
    SortedTrie,
    SubTrie,
    SubTrieMut,
    Trie,
};

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;

    // Handles are plain indices.
    assert!(mem::size_of::<NodeId>() == mem::size_of::<usize>());

    // The value slot adds nothing over `Option` when the value has a niche.
    assert!(mem::size_of::<trie::NodeValue<Box<u8>>>() == mem::size_of::<Option<Box<u8>>>());

    // Keys and labels are a pointer and a length.
    assert!(mem::size_of::<Sequence<u8>>() == mem::size_of::<usize>() * 2);
};
