//! Node implementations for BPlusTree.
//!
//! This module contains the node-level halves of every structural operation:
//! sorted insertion and removal, splitting, merging and single-entry
//! borrowing. None of these touch the arena; the tree-level engines allocate,
//! free and re-parent nodes around them.

use crate::error::{BPlusTreeError, KeyResult, ModifyResult};
use crate::search::{find_child_index, find_exact, find_insert_pos};
use crate::types::{BranchNode, Key, LeafNode, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<V> LeafNode<V> {
    // ============================================================================
    // GET OPERATIONS
    // ============================================================================

    /// Get a value by key from this leaf node.
    pub fn get(&self, key: Key) -> Option<&V> {
        find_exact(&self.keys, key).map(|index| &self.values[index])
    }

    /// Get a mutable reference to a value by key from this leaf node.
    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let index = find_exact(&self.keys, key)?;
        Some(&mut self.values[index])
    }

    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf node is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorted keys held by this leaf.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Values in key order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a key-value pair in sorted position.
    ///
    /// Fails with `DuplicateKey` without touching the node if `key` is present.
    /// The node may be left one key over its maximum; the caller splits it.
    pub fn insert(&mut self, key: Key, value: V) -> ModifyResult<()> {
        assert!(
            self.keys.len() <= self.max_keys(),
            "leaf overflow: {} keys with order {} before insert",
            self.keys.len(),
            self.order
        );

        let index = find_insert_pos(&self.keys, key);
        if self.keys.get(index) == Some(&key) {
            return Err(BPlusTreeError::DuplicateKey(key));
        }

        self.keys.insert(index, key);
        self.values.insert(index, value);
        Ok(())
    }

    /// Returns true if this leaf holds more keys than its order allows.
    pub fn needs_split(&self) -> bool {
        self.keys.len() > self.max_keys()
    }

    /// Split this leaf node, returning the new right node.
    ///
    /// The right node inherits this node's sibling link and parent; this node's
    /// link is cleared for the caller to point at the right node once it has an id.
    pub fn split(&mut self) -> LeafNode<V> {
        let mid = (self.keys.len() + 1) / 2;

        let new_right = LeafNode {
            order: self.order,
            keys: self.keys.split_off(mid),
            values: self.values.split_off(mid),
            next: self.next,
            parent: self.parent,
        };
        self.next = NULL_NODE;

        new_right
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Remove a key, shifting later entries left, and return its value.
    pub fn remove(&mut self, key: Key) -> KeyResult<V> {
        let index = find_exact(&self.keys, key).ok_or(BPlusTreeError::KeyNotFound(key))?;
        self.keys.remove(index);
        Ok(self.values.remove(index))
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Maximum number of keys; the remaining pointer is the sibling link.
    pub fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// Minimum number of keys for a non-root leaf.
    pub fn min_keys(&self) -> usize {
        self.order / 2
    }

    /// Returns true if this leaf node is underfull (below minimum occupancy).
    pub fn is_underfull(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Returns true if this leaf can donate a key and stay at minimum occupancy.
    pub fn can_donate(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    /// Returns true if `other`'s keys fit in this leaf alongside its own.
    pub fn can_merge_with(&self, other: &LeafNode<V>) -> bool {
        self.keys.len() + other.keys.len() <= self.max_keys()
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Take the last key-value pair (used when this is the left sibling).
    pub fn pop_last(&mut self) -> Option<(Key, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    /// Take the first key-value pair (used when this is the right sibling).
    pub fn pop_first(&mut self) -> Option<(Key, V)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.values.remove(0)))
    }

    /// Accept a borrowed pair at the beginning (from the left sibling).
    pub fn push_front(&mut self, key: Key, value: V) {
        self.keys.insert(0, key);
        self.values.insert(0, value);
    }

    /// Accept a borrowed pair at the end (from the right sibling).
    pub fn push_back(&mut self, key: Key, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Absorb the right sibling, taking over its place in the leaf chain.
    pub fn merge_from(&mut self, mut right: LeafNode<V>) {
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.next = right.next;
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl BranchNode {
    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if this branch has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Separator keys; `keys()[i]` sits between `children()[i]` and `children()[i + 1]`.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Child pointers, leftmost first.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Find the index of the child that should contain the given key.
    pub fn find_child_index(&self, key: Key) -> usize {
        find_child_index(&self.keys, key)
    }

    /// Position of `child` among this branch's children.
    pub fn position_of(&self, child: NodeRef) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert `child` at `child_index`, with `separator_key` as its lower bound.
    ///
    /// `child_index` must be at least 1: a promoted sibling always lands to the
    /// right of the child that split.
    pub fn insert_child(&mut self, child_index: usize, separator_key: Key, child: NodeRef) {
        assert!(
            child_index >= 1 && self.children.len() <= self.max_children(),
            "branch overflow inserting child at {} into {} children with order {}",
            child_index,
            self.children.len(),
            self.order
        );
        self.keys.insert(child_index - 1, separator_key);
        self.children.insert(child_index, child);
    }

    /// Returns true if this branch holds more children than its order allows.
    pub fn needs_split(&self) -> bool {
        self.children.len() > self.max_children()
    }

    /// Split this branch node, returning the new right node and promoted key.
    ///
    /// The key at the split boundary leaves both halves and is returned for
    /// the parent. Moved children still name this node as parent; the caller
    /// re-parents them once the right node has an id.
    pub fn split(&mut self) -> (BranchNode, Key) {
        let mid = (self.children.len() + 1) / 2;

        let right_children = self.children.split_off(mid);
        let right_keys = self.keys.split_off(mid);
        let promoted_key = match self.keys.pop() {
            Some(key) => key,
            None => unreachable!("branch split with {} children", mid),
        };

        let new_right = BranchNode {
            order: self.order,
            keys: right_keys,
            children: right_children,
            parent: self.parent,
        };

        (new_right, promoted_key)
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Drop the child at `child_index` along with the separator to its left.
    pub fn remove_child_at(&mut self, child_index: usize) -> NodeRef {
        assert!(
            child_index >= 1 && child_index < self.children.len(),
            "cannot remove child {} of {}",
            child_index,
            self.children.len()
        );
        self.keys.remove(child_index - 1);
        self.children.remove(child_index)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Maximum number of children.
    pub fn max_children(&self) -> usize {
        self.order
    }

    /// Minimum number of children for a non-root branch.
    pub fn min_children(&self) -> usize {
        (self.order + 1) / 2
    }

    /// Returns true if this branch node is underfull (below minimum occupancy).
    pub fn is_underfull(&self) -> bool {
        self.children.len() < self.min_children()
    }

    /// Returns true if this branch can donate a child and stay at minimum occupancy.
    pub fn can_donate(&self) -> bool {
        self.children.len() > self.min_children()
    }

    /// Returns true if `other`'s children fit in this branch alongside its own.
    pub fn can_merge_with(&self, other: &BranchNode) -> bool {
        self.children.len() + other.children.len() <= self.max_children()
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Take the last child and the separator in front of it.
    pub fn pop_last(&mut self) -> Option<(Key, NodeRef)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Take the first child and the separator behind it.
    ///
    /// The returned key was the lower bound of the new first child, so it is
    /// what the parent's separator must become.
    pub fn pop_first(&mut self) -> Option<(Key, NodeRef)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.remove(0);
        let child = self.children.remove(0);
        Some((key, child))
    }

    /// Prepend a child; `separator` is the lower bound of the old first child.
    pub fn push_front(&mut self, separator: Key, child: NodeRef) {
        self.keys.insert(0, separator);
        self.children.insert(0, child);
    }

    /// Append a child; `separator` is the lower bound of that child.
    pub fn push_back(&mut self, separator: Key, child: NodeRef) {
        self.keys.push(separator);
        self.children.push(child);
    }

    /// Absorb the right sibling; `separator` is the parent key between the two.
    pub fn merge_from(&mut self, separator: Key, mut right: BranchNode) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }
}
