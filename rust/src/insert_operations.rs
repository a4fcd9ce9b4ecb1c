//! INSERT operations for BPlusTree.
//!
//! Insertion descends recursively to the target leaf. A node that overflows
//! splits and hands an `InsertResult::Split` back to its caller, which links
//! the new sibling in right after the child that split and may overflow in
//! turn. A split that escapes the root grows the tree by one level.

use crate::error::ModifyResult;
use crate::tracing_helpers::{debug_log, trace_log};
use crate::types::{BPlusTree, BranchNode, InsertResult, Key, NodeId, NodeRef};

impl<V> BPlusTree<V> {
    // ============================================================================
    // PUBLIC INSERT OPERATIONS
    // ============================================================================

    /// Insert a key-value pair into the tree.
    ///
    /// # Returns
    ///
    /// `Ok(())` on success, or `DuplicateKey` if `key` is already present, in
    /// which case the tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplustree_index::{BPlusTree, BPlusTreeError};
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(1, "one").unwrap();
    /// assert_eq!(tree.insert(1, "uno"), Err(BPlusTreeError::DuplicateKey(1)));
    /// assert_eq!(tree.find(1), Ok(&"one"));
    /// ```
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self, value)))]
    pub fn insert(&mut self, key: Key, value: V) -> ModifyResult<()> {
        match self.insert_recursive(self.root, key, value)? {
            InsertResult::Inserted => {}
            InsertResult::Split {
                separator_key,
                new_node,
            } => self.new_root(separator_key, new_node),
        }
        Ok(())
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Insert into the subtree rooted at `node`, reporting whether it split.
    fn insert_recursive(&mut self, node: NodeRef, key: Key, value: V) -> ModifyResult<InsertResult> {
        match node {
            NodeRef::Leaf(leaf_id) => self.insert_into_leaf(leaf_id, key, value),
            NodeRef::Branch(branch_id) => {
                let branch = self.branch(branch_id);
                let child_index = branch.find_child_index(key);
                let child = branch.children[child_index];

                match self.insert_recursive(child, key, value)? {
                    InsertResult::Inserted => Ok(InsertResult::Inserted),
                    InsertResult::Split {
                        separator_key,
                        new_node,
                    } => Ok(self.insert_into_branch(branch_id, child_index + 1, separator_key, new_node)),
                }
            }
        }
    }

    fn insert_into_leaf(&mut self, leaf_id: NodeId, key: Key, value: V) -> ModifyResult<InsertResult> {
        let leaf = self.leaf_mut(leaf_id);
        leaf.insert(key, value)?;
        if !leaf.needs_split() {
            return Ok(InsertResult::Inserted);
        }

        let new_leaf = leaf.split();
        let separator_key = new_leaf.keys[0];
        let new_id = self.leaf_arena.allocate(new_leaf);
        self.leaf_mut(leaf_id).next = new_id;

        debug_log!(leaf_id, new_id, separator_key, "split leaf");
        Ok(InsertResult::Split {
            separator_key,
            new_node: NodeRef::Leaf(new_id),
        })
    }

    /// Link a promoted sibling into `branch_id` and split the branch if it overflows.
    fn insert_into_branch(
        &mut self,
        branch_id: NodeId,
        child_index: usize,
        separator_key: Key,
        new_child: NodeRef,
    ) -> InsertResult {
        let branch = self.branch_mut(branch_id);
        branch.insert_child(child_index, separator_key, new_child);
        let needs_split = branch.needs_split();
        self.set_parent(new_child, branch_id);

        if !needs_split {
            return InsertResult::Inserted;
        }

        let (new_branch, promoted_key) = self.branch_mut(branch_id).split();
        let moved_children = new_branch.children.clone();
        let new_id = self.branch_arena.allocate(new_branch);
        for child in moved_children {
            self.set_parent(child, new_id);
        }

        debug_log!(branch_id, new_id, promoted_key, "split branch");
        InsertResult::Split {
            separator_key: promoted_key,
            new_node: NodeRef::Branch(new_id),
        }
    }

    /// Grow the tree: a new root over the old root and the sibling it split off.
    fn new_root(&mut self, separator_key: Key, new_node: NodeRef) {
        let old_root = self.root;
        let root = BranchNode::new_root(self.order, old_root, separator_key, new_node);
        let root_id = self.branch_arena.allocate(root);

        self.set_parent(old_root, root_id);
        self.set_parent(new_node, root_id);
        self.root = NodeRef::Branch(root_id);

        trace_log!(root_id, separator_key, "grew new root");
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{BPlusTree, NodeRef, NULL_NODE};

    #[test]
    fn test_insert_into_root_leaf() {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in [2, 1, 3] {
            tree.insert(key, key).unwrap();
        }
        assert!(tree.is_leaf_root());
        assert_eq!(tree.root().keys(), &[1, 2, 3]);
    }

    #[test]
    fn test_root_leaf_split_creates_branch_root() {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in 1..=4 {
            tree.insert(key, key).unwrap();
        }

        let root = tree.root();
        assert!(!root.is_leaf());
        assert_eq!(root.keys(), &[3]);
        assert_eq!(root.parent(), None);

        let children = root.children();
        assert_eq!(children[0].keys(), &[1, 2]);
        assert_eq!(children[1].keys(), &[3, 4]);
        for child in &children {
            assert_eq!(child.parent(), Some(root.id()));
        }
        assert_eq!(children[0].next_leaf().map(|leaf| leaf.id()), Some(children[1].id()));
        assert!(children[1].next_leaf().is_none());
    }

    #[test]
    fn test_branch_split_reparents_moved_children() {
        // order 3: 7 ascending keys force a branch split below the root
        let mut tree = BPlusTree::new(3).unwrap();
        for key in [3, 1, 2, 4, 5, 6, 7] {
            tree.insert(key, key).unwrap();
        }

        let root = tree.root();
        let right = &root.children()[1];
        assert!(!right.is_leaf());
        assert_eq!(right.children().len(), 2);
        for child in right.children() {
            assert_eq!(child.parent(), Some(right.id()));
        }
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_new_root_parents() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..3 {
            tree.insert(key, ()).unwrap();
        }
        let NodeRef::Branch(root_id) = tree.root else {
            panic!("root should be a branch after the first split");
        };
        assert_eq!(tree.branch(root_id).parent, NULL_NODE);
        for &child in tree.branch(root_id).children() {
            assert_eq!(tree.parent_of(child), root_id);
        }
    }

    #[test]
    fn test_duplicate_insert_leaves_tree_unchanged() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..20 {
            tree.insert(key, key).unwrap();
        }
        let before = tree.to_string();

        assert!(tree.insert(7, 700).unwrap_err().is_duplicate_key());
        assert_eq!(tree.to_string(), before);
        assert_eq!(tree.find(7), Ok(&7));
        assert_eq!(tree.len(), 20);
    }
}
