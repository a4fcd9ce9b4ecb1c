//! Tree structure queries for BPlusTree.
//!
//! This module contains tree-level operations that describe the overall
//! shape: size queries, height, node counting and leftmost-leaf navigation.

use crate::types::{BPlusTree, NodeId, NodeRef};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<V> BPlusTree<V> {
    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len_recursive(self.root)
    }

    fn len_recursive(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(id) => self.leaf(id).len(),
            NodeRef::Branch(id) => self
                .branch(id)
                .children
                .iter()
                .map(|&child| self.len_recursive(child))
                .sum(),
        }
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        match self.root {
            NodeRef::Leaf(id) => self.leaf(id).is_empty(),
            // A branch root always has at least two non-empty subtrees.
            NodeRef::Branch(_) => false,
        }
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels, counting the root and the leaves.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Branch(id) = current {
            current = self.branch(id).children[0];
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Count the (leaf, branch) nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, node: NodeRef) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_) => (1, 0),
            NodeRef::Branch(id) => self.branch(id).children.iter().fold(
                (0, 1),
                |(leaves, branches), &child| {
                    let (child_leaves, child_branches) = self.count_nodes_recursive(child);
                    (leaves + child_leaves, branches + child_branches)
                },
            ),
        }
    }

    // ============================================================================
    // TREE NAVIGATION HELPERS
    // ============================================================================

    /// Get the ID of the first (leftmost) leaf in the tree
    pub(crate) fn first_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => current = self.branch(id).children[0],
            }
        }
    }
}
