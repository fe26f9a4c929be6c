//! Trie construction options.
//!
//! A `TrieConfig` selects whether edges are radix-compressed and how many
//! node slots the arena reserves up front. It is plain serde data so it can be
//! embedded in a host application's configuration file.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrieError};

/// How edge labels are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCompression {
    /// One element per edge.
    #[default]
    None,
    /// Patricia layout: chains of single-child nodes collapse into one edge.
    Radix,
}

/// Options used when building a trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrieConfig {
    /// Edge layout.
    pub compression: EdgeCompression,
    /// Number of node slots to reserve in the arena.
    pub capacity: usize,
}

impl TrieConfig {
    /// Plain layout, one element per edge.
    pub const fn plain() -> Self {
        Self {
            compression: EdgeCompression::None,
            capacity: 0,
        }
    }

    /// Radix-compressed layout.
    pub const fn radix() -> Self {
        Self {
            compression: EdgeCompression::Radix,
            capacity: 0,
        }
    }

    /// Sets the arena capacity.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns `true` for the Patricia layout.
    pub const fn is_radix(&self) -> bool {
        matches!(self.compression, EdgeCompression::Radix)
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TrieError::invalid(format!("trie config: {e}")))
    }

    /// Renders the config as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| TrieError::invalid(format!("trie config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_round_trip() {
        let config = TrieConfig::radix().with_capacity(64);
        let json = config.to_json().unwrap();
        assert_eq!(json, r#"{"compression":"radix","capacity":64}"#);
        assert_eq!(TrieConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_config_defaults_missing_fields() {
        let config = TrieConfig::from_json(r#"{"compression":"radix"}"#).unwrap();
        assert!(config.is_radix());
        assert_eq!(config.capacity, 0);
        assert_eq!(TrieConfig::from_json("{}").unwrap(), TrieConfig::plain());
    }

    #[test]
    fn test_config_rejects_unknown_compression() {
        let err = TrieConfig::from_json(r#"{"compression":"zstd"}"#).unwrap_err();
        assert!(matches!(err, TrieError::InvalidArgument(_)));
    }
}
