//! DELETE operations for BPlusTree.
//!
//! Deletion descends recursively to the target leaf and removes the key. A
//! non-root node left below minimum occupancy is rebalanced through its
//! parent, trying in order: merge into the left sibling, merge the right
//! sibling in, borrow from the left sibling, borrow from the right sibling.
//! Only merges shrink the parent, so only merges can cascade upward. A root
//! branch left with a single child is replaced by that child.

use crate::error::ModifyResult;
use crate::tracing_helpers::{debug_log, error_log, trace_log};
use crate::types::{BPlusTree, Key, NodeId, NodeRef, RemoveResult, NULL_NODE};

impl<V> BPlusTree<V> {
    // ============================================================================
    // PUBLIC DELETE OPERATIONS
    // ============================================================================

    /// Remove a key from the tree, returning its value.
    ///
    /// # Returns
    ///
    /// The removed value, or `KeyNotFound` if the key is absent, in which case
    /// the tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplustree_index::{BPlusTree, BPlusTreeError};
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(1, "one").unwrap();
    /// assert_eq!(tree.delete(1), Ok("one"));
    /// assert_eq!(tree.delete(1), Err(BPlusTreeError::KeyNotFound(1)));
    /// ```
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn delete(&mut self, key: Key) -> ModifyResult<V> {
        let (value, _) = self.delete_recursive(self.root, key)?;
        self.collapse_root_if_needed();
        Ok(value)
    }

    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Delete from the subtree rooted at `node`, rebalancing `node` itself if
    /// it underflows.
    fn delete_recursive(&mut self, node: NodeRef, key: Key) -> ModifyResult<(V, RemoveResult)> {
        match node {
            NodeRef::Leaf(leaf_id) => {
                let leaf = self.leaf_mut(leaf_id);
                let value = leaf.remove(key)?;
                let underfull = leaf.is_underfull() && leaf.parent != NULL_NODE;

                let result = if underfull {
                    self.rebalance(node)
                } else {
                    RemoveResult::NoUnderflow
                };
                Ok((value, result))
            }
            NodeRef::Branch(branch_id) => {
                let branch = self.branch(branch_id);
                let child = branch.children[branch.find_child_index(key)];

                let (value, child_result) = self.delete_recursive(child, key)?;
                let result = match child_result {
                    RemoveResult::NoUnderflow | RemoveResult::Redistributed => {
                        RemoveResult::NoUnderflow
                    }
                    RemoveResult::Merged(index) => {
                        let branch = self.branch_mut(branch_id);
                        branch.remove_child_at(index);
                        if branch.is_underfull() && branch.parent != NULL_NODE {
                            self.rebalance(node)
                        } else {
                            RemoveResult::NoUnderflow
                        }
                    }
                };
                Ok((value, result))
            }
        }
    }

    /// Restore minimum occupancy of the underfull, non-root `node`.
    ///
    /// Returns `Merged(i)` when the parent must drop its child entry `i`, or
    /// `Redistributed` when a borrow fixed the node without shrinking the parent.
    fn rebalance(&mut self, node: NodeRef) -> RemoveResult {
        let parent_id = self.parent_of(node);
        let parent = self.branch(parent_id);
        let index = match parent.position_of(node) {
            Some(index) => index,
            None => {
                error_log!(?node, parent_id, "node missing from its parent");
                unreachable!("node {:?} is not a child of its parent {}", node, parent_id)
            }
        };
        let left = index.checked_sub(1).map(|i| parent.children[i]);
        let right = parent.children.get(index + 1).copied();

        if let Some(left) = left {
            if self.try_merge(parent_id, index, left, node) {
                debug_log!(?node, ?left, "merged into left sibling");
                return RemoveResult::Merged(index);
            }
        }

        if let Some(right) = right {
            if self.try_merge(parent_id, index + 1, node, right) {
                debug_log!(?node, ?right, "merged right sibling");
                return RemoveResult::Merged(index + 1);
            }
        }

        if let Some(left) = left {
            self.borrow_from_left(parent_id, index, left, node);
            debug_log!(?node, ?left, "borrowed from left sibling");
            return RemoveResult::Redistributed;
        }

        if let Some(right) = right {
            self.borrow_from_right(parent_id, index + 1, node, right);
            debug_log!(?node, ?right, "borrowed from right sibling");
            return RemoveResult::Redistributed;
        }

        error_log!(?node, parent_id, "underfull node has no sibling");
        unreachable!("underfull node {:?} has no sibling under {}", node, parent_id)
    }

    /// Merge `right` into `left` if the result fits in one node.
    ///
    /// `right_index` is `right`'s position in the parent; the separator in
    /// front of it is pulled down into a merged branch. The parent itself is
    /// not modified, the caller drops its entry at `right_index`.
    fn try_merge(&mut self, parent_id: NodeId, right_index: usize, left: NodeRef, right: NodeRef) -> bool {
        match (left, right) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(right_id)) => {
                if !self.leaf(left_id).can_merge_with(self.leaf(right_id)) {
                    return false;
                }
                let right_leaf = self.take_leaf(right_id);
                self.leaf_mut(left_id).merge_from(right_leaf);
                true
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(right_id)) => {
                if !self.branch(left_id).can_merge_with(self.branch(right_id)) {
                    return false;
                }
                let separator = self.branch(parent_id).keys[right_index - 1];
                let right_branch = self.take_branch(right_id);
                let moved_children = right_branch.children.clone();
                self.branch_mut(left_id).merge_from(separator, right_branch);
                for child in moved_children {
                    self.set_parent(child, left_id);
                }
                true
            }
            _ => {
                error_log!(?left, ?right, "siblings at different depths");
                unreachable!("cannot merge {:?} with {:?}", left, right)
            }
        }
    }

    /// Move `left`'s last entry to the front of `node`, which sits at `index`
    /// in the parent.
    fn borrow_from_left(&mut self, parent_id: NodeId, index: usize, left: NodeRef, node: NodeRef) {
        let separator_slot = index - 1;
        match (left, node) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(node_id)) => {
                let (key, value) = match self.leaf_mut(left_id).pop_last() {
                    Some(entry) => entry,
                    None => unreachable!("left leaf {} has nothing to lend", left_id),
                };
                self.leaf_mut(node_id).push_front(key, value);
                self.branch_mut(parent_id).keys[separator_slot] = key;
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(node_id)) => {
                let (key, child) = match self.branch_mut(left_id).pop_last() {
                    Some(entry) => entry,
                    None => unreachable!("left branch {} has nothing to lend", left_id),
                };
                // Rotate through the parent: its separator becomes the lower
                // bound of node's old first child.
                let parent = self.branch_mut(parent_id);
                let old_separator = std::mem::replace(&mut parent.keys[separator_slot], key);
                self.branch_mut(node_id).push_front(old_separator, child);
                self.set_parent(child, node_id);
            }
            _ => {
                error_log!(?left, ?node, "siblings at different depths");
                unreachable!("cannot borrow from {:?} into {:?}", left, node)
            }
        }
    }

    /// Move `right`'s first entry to the end of `node`; `right` sits at
    /// `right_index` in the parent.
    fn borrow_from_right(&mut self, parent_id: NodeId, right_index: usize, node: NodeRef, right: NodeRef) {
        let separator_slot = right_index - 1;
        match (node, right) {
            (NodeRef::Leaf(node_id), NodeRef::Leaf(right_id)) => {
                let right_leaf = self.leaf_mut(right_id);
                let (key, value) = match right_leaf.pop_first() {
                    Some(entry) => entry,
                    None => unreachable!("right leaf {} has nothing to lend", right_id),
                };
                let new_separator = right_leaf.keys[0];
                self.leaf_mut(node_id).push_back(key, value);
                self.branch_mut(parent_id).keys[separator_slot] = new_separator;
            }
            (NodeRef::Branch(node_id), NodeRef::Branch(right_id)) => {
                let (key, child) = match self.branch_mut(right_id).pop_first() {
                    Some(entry) => entry,
                    None => unreachable!("right branch {} has nothing to lend", right_id),
                };
                let parent = self.branch_mut(parent_id);
                let old_separator = std::mem::replace(&mut parent.keys[separator_slot], key);
                self.branch_mut(node_id).push_back(old_separator, child);
                self.set_parent(child, node_id);
            }
            _ => {
                error_log!(?node, ?right, "siblings at different depths");
                unreachable!("cannot borrow from {:?} into {:?}", right, node)
            }
        }
    }

    /// Replace a root branch that is down to one child by that child.
    fn collapse_root_if_needed(&mut self) {
        let NodeRef::Branch(root_id) = self.root else {
            return;
        };
        if self.branch(root_id).children.len() != 1 {
            return;
        }

        let old_root = self.take_branch(root_id);
        let new_root = old_root.children[0];
        self.set_parent(new_root, NULL_NODE);
        self.root = new_root;

        trace_log!(root_id, ?new_root, "collapsed root");
    }
}
