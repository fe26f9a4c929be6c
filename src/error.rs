//! Error types for the trie collections.

use thiserror::Error;

/// Result type alias using `TrieError`.
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors surfaced by trie operations, views and cursors.
///
/// Every fallible operation validates its arguments before touching the node
/// graph, so an `Err` never leaves a partially applied split or merge behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// A required argument was malformed (inverted bounds, key outside a view, bad config).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Lookup of a first/last key on an empty trie, or a sub-trie prefix that diverges.
    #[error("key not found: {0}")]
    NotFound(String),

    /// A write was attempted through a read-only or derived view.
    #[error("unsupported mutation: {0}")]
    UnsupportedMutation(&'static str),

    /// The trie was structurally modified after the cursor took its snapshot.
    #[error("structural change detected: cursor expected generation {expected}, trie is at {actual}")]
    StructuralChange {
        /// Generation recorded by the cursor.
        expected: u64,
        /// Generation of the trie at the time of the call.
        actual: u64,
    },

    /// A cursor operation was called in a state where it has no meaning.
    #[error("invalid cursor state: {0}")]
    InvalidState(&'static str),

    /// `verify` found a broken structural invariant.
    #[error("trie corruption: {0}")]
    Corrupted(String),
}

impl TrieError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidArgument(what.into())
    }

    pub(crate) fn corrupted(what: impl Into<String>) -> Self {
        Self::Corrupted(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TrieError::StructuralChange { expected: 3, actual: 5 };
        assert_eq!(
            err.to_string(),
            "structural change detected: cursor expected generation 3, trie is at 5"
        );
        assert_eq!(
            TrieError::not_found("empty trie").to_string(),
            "key not found: empty trie"
        );
    }
}
