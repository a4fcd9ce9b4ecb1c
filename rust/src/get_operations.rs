//! GET operations for BPlusTree.
//!
//! This module contains the read operations for the B+ tree: key lookup and
//! value retrieval. None of them mutate the tree structure.

use crate::error::{BPlusTreeError, KeyResult};
use crate::types::{BPlusTree, Key, NodeId, NodeRef};

impl<V> BPlusTree<V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Look up the value associated with a key.
    ///
    /// # Returns
    ///
    /// A reference to the value, or `KeyNotFound` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplustree_index::{BPlusTree, BPlusTreeError};
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(1, "one").unwrap();
    /// assert_eq!(tree.find(1), Ok(&"one"));
    /// assert_eq!(tree.find(2), Err(BPlusTreeError::KeyNotFound(2)));
    /// ```
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn find(&self, key: Key) -> KeyResult<&V> {
        self.get(key).ok_or(BPlusTreeError::KeyNotFound(key))
    }

    /// Get a reference to the value associated with a key, if present.
    ///
    /// ```
    /// use bplustree_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(1, "one").unwrap();
    /// assert_eq!(tree.get(1), Some(&"one"));
    /// assert_eq!(tree.get(2), None);
    /// ```
    pub fn get(&self, key: Key) -> Option<&V> {
        let leaf_id = self.find_leaf_for_key(key);
        self.leaf(leaf_id).get(key)
    }

    /// Check if key exists in the tree.
    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Get a mutable reference to the value for a key.
    ///
    /// ```
    /// use bplustree_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(1, "one").unwrap();
    /// if let Some(value) = tree.get_mut(1) {
    ///     *value = "ONE";
    /// }
    /// assert_eq!(tree.get(1), Some(&"ONE"));
    /// ```
    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let leaf_id = self.find_leaf_for_key(key);
        self.leaf_mut(leaf_id).get_mut(key)
    }

    // ============================================================================
    // HELPERS FOR GET OPERATIONS
    // ============================================================================

    /// Descend from the root to the leaf whose key range covers `key`.
    pub(crate) fn find_leaf_for_key(&self, key: Key) -> NodeId {
        let mut current = self.root;

        loop {
            match current {
                NodeRef::Leaf(leaf_id) => return leaf_id,
                NodeRef::Branch(branch_id) => {
                    let branch = self.branch(branch_id);
                    current = branch.children[branch.find_child_index(key)];
                }
            }
        }
    }
}
