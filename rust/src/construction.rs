//! Construction and initialization logic for BPlusTree and nodes.
//!
//! This module contains the construction, initialization, and setup logic
//! for the B+ tree and its nodes, including order validation and default
//! implementations.

use crate::compact_arena::CompactArena;
use crate::error::{BPlusTreeError, InitResult};
use crate::types::{BPlusTree, BranchNode, Key, LeafNode, NodeRef, MIN_ORDER, NULL_NODE};

/// Default order for B+ tree nodes
pub const DEFAULT_ORDER: usize = 16;

impl<V> BPlusTree<V> {
    /// Create an empty B+ tree with the specified order.
    ///
    /// # Arguments
    ///
    /// * `order` - Maximum number of pointers per node (minimum 3)
    ///
    /// # Returns
    ///
    /// Returns `Ok(BPlusTree)` whose root is an empty leaf, or
    /// `Err(BPlusTreeError::InvalidOrder)` if `order < 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplustree_index::BPlusTree;
    ///
    /// let tree = BPlusTree::<String>::new(4).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusTree::<String>::new(2).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        validation::validate_order(order)?;
        Ok(Self::with_empty_root(order))
    }

    /// Create a B+ tree with the default order.
    ///
    /// ```
    /// use bplustree_index::BPlusTree;
    ///
    /// let tree = BPlusTree::<u64>::with_default_order();
    /// assert_eq!(tree.order(), 16);
    /// ```
    pub fn with_default_order() -> Self {
        Self::with_empty_root(DEFAULT_ORDER)
    }

    /// Build a tree whose root is a fresh empty leaf. `order` must already be valid.
    fn with_empty_root(order: usize) -> Self {
        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(order));

        Self {
            order,
            root: NodeRef::Leaf(root_id),
            leaf_arena,
            branch_arena: CompactArena::new(),
        }
    }

    /// Remove every entry, leaving an empty leaf root.
    pub fn clear(&mut self) {
        *self = Self::with_empty_root(self.order);
    }

    /// The maximum number of pointers a node may hold.
    pub fn order(&self) -> usize {
        self.order
    }
}

impl<V> LeafNode<V> {
    /// Creates a new, unlinked leaf node for a tree of the given order.
    pub fn new(order: usize) -> Self {
        // One spare slot so the transient overflow before a split never reallocates.
        Self {
            order,
            keys: Vec::with_capacity(order),
            values: Vec::with_capacity(order),
            next: NULL_NODE,
            parent: NULL_NODE,
        }
    }
}

impl BranchNode {
    /// Creates a new branch node with no children.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            keys: Vec::with_capacity(order),
            children: Vec::with_capacity(order + 1),
            parent: NULL_NODE,
        }
    }

    /// Creates a root branch with exactly two children split by `separator_key`.
    pub(crate) fn new_root(order: usize, left: NodeRef, separator_key: Key, right: NodeRef) -> Self {
        let mut branch = Self::new(order);
        branch.keys.push(separator_key);
        branch.children.push(left);
        branch.children.push(right);
        branch
    }
}

// Default implementations
impl<V> Default for BPlusTree<V> {
    /// Create a B+ tree with the default order.
    fn default() -> Self {
        Self::with_default_order()
    }
}

impl<V> Default for LeafNode<V> {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

impl Default for BranchNode {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that an order is suitable for B+ tree nodes.
    ///
    /// Below 3, a split could leave a node with no keys and a merge could
    /// fail to make progress.
    pub fn validate_order(order: usize) -> InitResult<()> {
        if order < MIN_ORDER {
            Err(BPlusTreeError::invalid_order(order, MIN_ORDER))
        } else {
            Ok(())
        }
    }

    /// Get the recommended order for a given expected number of elements.
    pub fn recommended_order(expected_elements: usize) -> usize {
        if expected_elements < 100 {
            4
        } else if expected_elements < 10_000 {
            16
        } else if expected_elements < 1_000_000 {
            32
        } else {
            64
        }
    }
}
