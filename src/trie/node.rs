use core::fmt;
use core::ops::{Index, IndexMut};
use std::vec::Vec;

use super::children::ChildStore;
use super::value::NodeValue;
use crate::sequence::Sequence;

/// Handle of a node inside a trie's arena.
///
/// Handles are only meaningful for the trie that issued them and only until
/// the node is pruned or merged away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A vertex of the trie.
///
/// Each node contains:
/// - The edge label leading to it from its parent (empty for the root).
/// - A presence-aware value slot.
/// - Its children, keyed by the first element of each child's label.
/// - The number of set values in its subtree, itself included.
/// - A non-owning handle to its parent.
pub struct Node<E, V, S> {
    pub(crate) label: Sequence<E>,
    pub(crate) value: NodeValue<V>,
    pub(crate) children: S,
    pub(crate) count: usize,
    pub(crate) parent: Option<NodeId>,
}

impl<E, V, S: Default> Node<E, V, S> {
    pub(crate) fn new(label: Sequence<E>) -> Self {
        Self {
            label,
            value: NodeValue::Unset,
            children: S::default(),
            count: 0,
            parent: None,
        }
    }
}

/// A slot in the trie arena.
/// Can be either an occupied node or a link to the next free slot.
pub(crate) enum NodeSlot<E, V, S> {
    Occupied(Node<E, V, S>),
    Free(Option<usize>),
}

/// Slab of trie nodes with an intrusive free list.
///
/// Freed slots are reused before the vector grows, so long insert/remove
/// workloads do not leak arena space.
pub(crate) struct NodeArena<E, V, S> {
    slots: Vec<NodeSlot<E, V, S>>,
    free_head: Option<usize>,
    live: usize,
}

impl<E, V, S> NodeArena<E, V, S> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            live: 0,
        }
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn alloc(&mut self, node: Node<E, V, S>) -> NodeId {
        self.live += 1;
        match self.free_head {
            Some(idx) => {
                let slot = core::mem::replace(&mut self.slots[idx], NodeSlot::Occupied(node));
                match slot {
                    NodeSlot::Free(next) => self.free_head = next,
                    NodeSlot::Occupied(_) => unreachable!("free list points at a live node"),
                }
                NodeId(idx)
            }
            None => {
                self.slots.push(NodeSlot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Releases a node's slot, returning the node.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<E, V, S> {
        let slot = core::mem::replace(&mut self.slots[id.0], NodeSlot::Free(self.free_head));
        match slot {
            NodeSlot::Occupied(node) => {
                self.free_head = Some(id.0);
                self.live -= 1;
                node
            }
            NodeSlot::Free(next) => {
                self.slots[id.0] = NodeSlot::Free(next);
                panic!("corrupted trie: double release of {id:?}");
            }
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<E, V, S>> {
        match self.slots.get(id.0) {
            Some(NodeSlot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }

    /// Adds `delta` to the aggregate count of `from` and all its ancestors.
    pub(crate) fn adjust_counts(&mut self, from: Option<NodeId>, delta: isize) {
        let mut cur = from;
        while let Some(id) = cur {
            let node = &mut self[id];
            node.count = node
                .count
                .checked_add_signed(delta)
                .unwrap_or_else(|| panic!("corrupted trie: negative count at {id:?}"));
            cur = node.parent;
        }
    }

    /// Number of edges between `id` and the root.
    pub(crate) fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self[id].parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self[p].parent;
        }
        depth
    }
}

impl<E: Clone, V, S> NodeArena<E, V, S> {
    /// Rebuilds the full key of `id` by walking parent links.
    pub(crate) fn key_of(&self, id: NodeId) -> Sequence<E> {
        let mut labels = Vec::new();
        let mut len = 0;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = &self[n];
            len += node.label.len();
            labels.push(&node.label);
            cur = node.parent;
        }
        let mut key = Vec::with_capacity(len);
        for label in labels.into_iter().rev() {
            key.extend_from_slice(label);
        }
        Sequence::from(key)
    }
}

impl<E: Clone, V, S: ChildStore<E>> NodeArena<E, V, S> {
    /// Links `child` under `parent` and adds its subtree count to every ancestor.
    pub(crate) fn attach(&mut self, order: &S::Order, parent: NodeId, child: NodeId) {
        let (first, count) = {
            let node = &mut self[child];
            node.parent = Some(parent);
            (node.label[0].clone(), node.count)
        };
        let replaced = self[parent].children.insert(order, first, child);
        debug_assert!(replaced.is_none(), "attach over an existing edge");
        if count > 0 {
            self.adjust_counts(Some(parent), count as isize);
        }
    }

    /// Unlinks `child` from its parent and subtracts its subtree count from every ancestor.
    pub(crate) fn detach(&mut self, order: &S::Order, child: NodeId) {
        let node = &mut self[child];
        let Some(parent) = node.parent.take() else {
            return;
        };
        let count = node.count;
        let first = self[child].label[0].clone();
        let removed = self[parent].children.remove(order, &first);
        debug_assert_eq!(removed, Some(child), "detach of an unlinked child");
        if count > 0 {
            self.adjust_counts(Some(parent), -(count as isize));
        }
    }

    /// Puts `new` in the place of `old` under `old`'s parent without touching counts.
    ///
    /// Both nodes must have labels starting with the same element and equal
    /// subtree counts.
    pub(crate) fn splice(&mut self, order: &S::Order, old: NodeId, new: NodeId) -> Option<NodeId> {
        let parent = self[old].parent.take();
        self[new].parent = parent;
        if let Some(p) = parent {
            let first = self[new].label[0].clone();
            let replaced = self[p].children.insert(order, first, new);
            debug_assert_eq!(replaced, Some(old), "splice over the wrong edge");
        }
        parent
    }
}

impl<E, V, S> Index<NodeId> for NodeArena<E, V, S> {
    type Output = Node<E, V, S>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<E, V, S> {
        match &self.slots[id.0] {
            NodeSlot::Occupied(node) => node,
            NodeSlot::Free(_) => panic!("corrupted trie: {id:?} is not a live node"),
        }
    }
}

impl<E, V, S> IndexMut<NodeId> for NodeArena<E, V, S> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<E, V, S> {
        match &mut self.slots[id.0] {
            NodeSlot::Occupied(node) => node,
            NodeSlot::Free(_) => panic!("corrupted trie: {id:?} is not a live node"),
        }
    }
}

/// Read-only handle on a trie node, for diagnostics and adapters.
pub struct NodeRef<'a, E, V, S> {
    arena: &'a NodeArena<E, V, S>,
    id: NodeId,
}

impl<'a, E, V, S> Clone for NodeRef<'a, E, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E, V, S> Copy for NodeRef<'a, E, V, S> {}

impl<'a, E, V, S> NodeRef<'a, E, V, S> {
    pub(crate) fn new(arena: &'a NodeArena<E, V, S>, id: NodeId) -> Self {
        Self { arena, id }
    }

    fn node(&self) -> &'a Node<E, V, S> {
        &self.arena[self.id]
    }

    /// The node's handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Label of the edge from the parent to this node.
    pub fn label(&self) -> &'a [E] {
        &self.node().label
    }

    /// Value stored at this node, if a key ends here.
    pub fn value(&self) -> Option<&'a V> {
        self.node().value.get()
    }

    /// Returns `true` if a key ends here.
    pub fn has_value(&self) -> bool {
        self.node().value.is_set()
    }

    /// Number of keys in this subtree, this node's own key included.
    pub fn count(&self) -> usize {
        self.node().count
    }

    /// The parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, E, V, S>> {
        self.node().parent.map(|id| NodeRef::new(self.arena, id))
    }

    /// Number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        self.arena.depth(self.id)
    }

    /// Full key from the root to this node.
    pub fn key(&self) -> Sequence<E>
    where
        E: Clone,
    {
        self.arena.key_of(self.id)
    }
}

impl<'a, E, V, S: ChildStore<E>> NodeRef<'a, E, V, S> {
    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Children in storage order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, E, V, S>> + 'a {
        let arena = self.arena;
        self.node()
            .children
            .ids()
            .map(move |id| NodeRef::new(arena, id))
    }

    /// Child whose edge starts with `first`.
    pub fn child(&self, order: &S::Order, first: &E) -> Option<NodeRef<'a, E, V, S>> {
        self.node()
            .children
            .find(order, first)
            .map(|id| NodeRef::new(self.arena, id))
    }
}

impl<'a, E: fmt::Debug, V: fmt::Debug, S: ChildStore<E>> fmt::Debug for NodeRef<'a, E, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("label", &self.label())
            .field("value", &self.value())
            .field("count", &self.count())
            .field("children", &self.child_count())
            .finish()
    }
}
