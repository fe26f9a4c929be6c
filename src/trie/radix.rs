//! Edge splitting and merging.
//!
//! The insertion path walks edges by their first element. In the radix layout
//! a key that diverges inside an edge splits it, and removal collapses a
//! valueless node with a single child back into one edge. The plain layout
//! never splits or merges: every edge carries exactly one element.

use super::children::ChildStore;
use super::map::Trie;
use super::node::{Node, NodeId};
use crate::sequence::{common_prefix_len, Sequence};
use crate::trace::trace_event;

impl<E: Clone + Eq, V, S: ChildStore<E>> Trie<E, V, S> {
    /// Returns the node for `key`, creating nodes and splitting edges as needed.
    ///
    /// The returned node's value slot is left untouched, as are all counts.
    pub(crate) fn insertion_point(&mut self, key: &[E]) -> NodeId {
        let mut cur = self.ensure_root();
        let mut rest = key;

        while let Some(first) = rest.first() {
            let Some(child) = self.arena[cur].children.find(&self.order, first) else {
                let take = if self.config.is_radix() { rest.len() } else { 1 };
                let leaf = self.arena.alloc(Node::new(Sequence::from(&rest[..take])));
                self.arena.attach(&self.order, cur, leaf);
                cur = leaf;
                rest = &rest[take..];
                continue;
            };

            let label_len = self.arena[child].label.len();
            let matched = common_prefix_len(rest, &self.arena[child].label);
            cur = if matched < label_len {
                self.split_edge(child, matched)
            } else {
                child
            };
            rest = &rest[matched..];
        }
        cur
    }

    /// Splits the edge into `child` after `at` elements.
    ///
    /// A new node takes the first `at` elements and `child`'s place under the
    /// old parent; `child` keeps the remainder below it. Returns the new node.
    fn split_edge(&mut self, child: NodeId, at: usize) -> NodeId {
        debug_assert!(at > 0 && at < self.arena[child].label.len());
        let (head, tail) = {
            let label = &self.arena[child].label;
            (label.subsequence(..at), label.subsequence(at..))
        };

        let mut mid = Node::new(head);
        mid.count = self.arena[child].count;
        let mid = self.arena.alloc(mid);
        self.arena.splice(&self.order, child, mid);

        let first = tail[0].clone();
        {
            let node = &mut self.arena[child];
            node.label = tail;
            node.parent = Some(mid);
        }
        self.arena[mid].children.insert(&self.order, first, child);

        trace_event!(node = child.index(), split = mid.index(), at, "split edge");
        mid
    }

    /// Collapses `id` into its only child when `id` carries no value.
    ///
    /// The child survives with the concatenated label and takes `id`'s place;
    /// `id` is released. The root is never merged.
    pub(crate) fn merge_with_only_child(&mut self, id: NodeId) {
        let node = &self.arena[id];
        if node.parent.is_none() || node.value.is_set() {
            return;
        }
        let Some(child) = node.children.only() else {
            return;
        };

        let merged = node.label.concat(&self.arena[child].label);
        self.arena[child].label = merged;
        self.arena.splice(&self.order, id, child);
        self.arena.release(id);

        trace_event!(node = id.index(), into = child.index(), "merged edge");
    }
}
