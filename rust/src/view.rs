//! Read-only traversal of tree nodes.
//!
//! `NodeView` is the only way node structure leaves the crate. It exposes
//! keys, ids and links for inspection or rendering but never a mutable
//! handle, so callers cannot break the tree's invariants through it.

use crate::types::{BPlusTree, Key, NodeId, NodeRef, NULL_NODE};

/// Payload of one node entry.
#[derive(Debug, PartialEq, Eq)]
pub enum Payload<'a, V> {
    /// A leaf's value for the entry's key.
    Value(&'a V),
    /// A branch's pointer to a child.
    Child(NodeRef),
    /// A leaf's trailing link to the next leaf, if any.
    NextLeaf(Option<NodeId>),
}

// Manual impls: `V` itself need not be Clone/Copy to copy a reference to it.
impl<V> Clone for Payload<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Payload<'_, V> {}

/// One `(key, payload)` slot of a node.
///
/// Leaves list one entry per key followed by a keyless `NextLeaf` entry.
/// Branches list a keyless entry for the leftmost child followed by one
/// entry per separator key.
#[derive(Debug, PartialEq, Eq)]
pub struct Entry<'a, V> {
    pub key: Option<Key>,
    pub payload: Payload<'a, V>,
}

impl<V> Clone for Entry<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Entry<'_, V> {}

/// Borrowed, read-only view of a single node.
#[derive(Debug)]
pub struct NodeView<'a, V> {
    tree: &'a BPlusTree<V>,
    node: NodeRef,
}

impl<V> Clone for NodeView<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeView<'_, V> {}

impl<'a, V> NodeView<'a, V> {
    fn new(tree: &'a BPlusTree<V>, node: NodeRef) -> Self {
        Self { tree, node }
    }

    /// Arena id of this node; unique among nodes of the same kind.
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    /// Tagged reference to this node.
    pub fn node_ref(&self) -> NodeRef {
        self.node
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Id of the parent branch, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        let parent = self.tree.parent_of(self.node);
        (parent != NULL_NODE).then_some(parent)
    }

    /// Meaningful keys: a leaf's keys, or a branch's separators.
    pub fn keys(&self) -> &'a [Key] {
        match self.node {
            NodeRef::Leaf(id) => &self.tree.leaf(id).keys,
            NodeRef::Branch(id) => &self.tree.branch(id).keys,
        }
    }

    /// Number of pointers held: values for a leaf, children for a branch.
    pub fn len(&self) -> usize {
        match self.node {
            NodeRef::Leaf(id) => self.tree.leaf(id).len(),
            NodeRef::Branch(id) => self.tree.branch(id).len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries of this node in slot order.
    pub fn entries(&self) -> Vec<Entry<'a, V>> {
        match self.node {
            NodeRef::Leaf(id) => {
                let leaf = self.tree.leaf(id);
                let next = (leaf.next != NULL_NODE).then_some(leaf.next);
                leaf.keys
                    .iter()
                    .zip(&leaf.values)
                    .map(|(&key, value)| Entry {
                        key: Some(key),
                        payload: Payload::Value(value),
                    })
                    .chain(std::iter::once(Entry {
                        key: None,
                        payload: Payload::NextLeaf(next),
                    }))
                    .collect()
            }
            NodeRef::Branch(id) => {
                let branch = self.tree.branch(id);
                std::iter::once(Entry {
                    key: None,
                    payload: Payload::Child(branch.children[0]),
                })
                .chain(branch.keys.iter().zip(&branch.children[1..]).map(|(&key, &child)| Entry {
                    key: Some(key),
                    payload: Payload::Child(child),
                }))
                .collect()
            }
        }
    }

    /// Children of a branch, leftmost first; empty for a leaf.
    pub fn children(&self) -> Vec<NodeView<'a, V>> {
        match self.node {
            NodeRef::Leaf(_) => Vec::new(),
            NodeRef::Branch(id) => self
                .tree
                .branch(id)
                .children
                .iter()
                .map(|&child| NodeView::new(self.tree, child))
                .collect(),
        }
    }

    /// The leaf after this one in key order; `None` for branches and the last leaf.
    pub fn next_leaf(&self) -> Option<NodeView<'a, V>> {
        match self.node {
            NodeRef::Leaf(id) => {
                let next = self.tree.leaf(id).next;
                (next != NULL_NODE).then(|| NodeView::new(self.tree, NodeRef::Leaf(next)))
            }
            NodeRef::Branch(_) => None,
        }
    }
}

/// Iterator over leaves in key order, following sibling links.
pub struct Leaves<'a, V> {
    next: Option<NodeView<'a, V>>,
}

impl<'a, V> Iterator for Leaves<'a, V> {
    type Item = NodeView<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next_leaf();
        Some(current)
    }
}

impl<V> BPlusTree<V> {
    /// Read-only view of the root node.
    pub fn root(&self) -> NodeView<'_, V> {
        NodeView::new(self, self.root)
    }

    /// Leaves from smallest to largest key, walked through the sibling chain.
    ///
    /// ```
    /// use bplustree_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// for key in 0..6 {
    ///     tree.insert(key, ()).unwrap();
    /// }
    /// let keys: Vec<i64> = tree.leaves().flat_map(|leaf| leaf.keys().to_vec()).collect();
    /// assert_eq!(keys, vec![0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn leaves(&self) -> Leaves<'_, V> {
        Leaves {
            next: Some(NodeView::new(self, NodeRef::Leaf(self.first_leaf_id()))),
        }
    }
}
