//! Structural self-check.

use std::vec::Vec;

use super::children::ChildStore;
use super::map::Trie;
use crate::error::{Result, TrieError};

impl<E: Clone + Eq + core::fmt::Debug, V, S: ChildStore<E>> Trie<E, V, S> {
    /// Walks the whole node graph and checks its invariants:
    ///
    /// - the root has an empty label and no parent, and exists iff the trie is non-empty;
    /// - every child is linked back to its parent and is found under its label's first element;
    /// - every non-root label is non-empty, and exactly one element long in the plain layout;
    /// - subtree counts equal the number of values below;
    /// - no non-root node is both valueless and childless;
    /// - in the radix layout, no non-root valueless node has exactly one child;
    /// - every live arena slot is reachable.
    pub fn verify(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.arena.live() != 0 {
                return Err(TrieError::corrupted(format!(
                    "empty trie holds {} live nodes",
                    self.arena.live()
                )));
            }
            return Ok(());
        };

        let root_node = &self.arena[root];
        if root_node.parent.is_some() || !root_node.label.is_empty() {
            return Err(TrieError::corrupted("root has a parent or a label"));
        }

        let mut visited = 0usize;
        // Post-order count check: (node, expanded)
        let mut stack = vec![(root, false)];
        let mut counts: Vec<usize> = Vec::new();
        while let Some((id, expanded)) = stack.pop() {
            let node = &self.arena[id];
            if expanded {
                let children = node.children.len();
                let below: usize = counts.drain(counts.len() - children..).sum();
                let expected = below + usize::from(node.value.is_set());
                if node.count != expected {
                    return Err(TrieError::corrupted(format!(
                        "node {} at {:?} counts {} keys, found {}",
                        id.index(),
                        self.arena.key_of(id),
                        node.count,
                        expected
                    )));
                }
                counts.push(node.count);
                continue;
            }

            visited += 1;
            if id != root {
                if node.label.is_empty() {
                    return Err(TrieError::corrupted(format!("node {} has an empty label", id.index())));
                }
                if !self.config.is_radix() && node.label.len() != 1 {
                    return Err(TrieError::corrupted(format!(
                        "plain node {} has a {}-element label",
                        id.index(),
                        node.label.len()
                    )));
                }
                if !node.value.is_set() && node.children.is_empty() {
                    return Err(TrieError::corrupted(format!(
                        "dangling node at {:?}",
                        self.arena.key_of(id)
                    )));
                }
                if self.config.is_radix() && !node.value.is_set() && node.children.len() == 1 {
                    return Err(TrieError::corrupted(format!(
                        "uncompressed chain at {:?}",
                        self.arena.key_of(id)
                    )));
                }
            }

            stack.push((id, true));
            for child in node.children.ids() {
                let child_node = self
                    .arena
                    .get(child)
                    .ok_or_else(|| TrieError::corrupted(format!("node {} links a freed slot", id.index())))?;
                if child_node.parent != Some(id) {
                    return Err(TrieError::corrupted(format!(
                        "node {} does not point back to parent {}",
                        child.index(),
                        id.index()
                    )));
                }
                let found = child_node
                    .label
                    .first()
                    .and_then(|first| node.children.find(&self.order, first));
                if found != Some(child) {
                    return Err(TrieError::corrupted(format!(
                        "node {} is not indexed by its first element",
                        child.index()
                    )));
                }
                stack.push((child, false));
            }
        }

        if visited != self.arena.live() {
            return Err(TrieError::corrupted(format!(
                "{} live nodes but only {} reachable",
                self.arena.live(),
                visited
            )));
        }
        Ok(())
    }
}
