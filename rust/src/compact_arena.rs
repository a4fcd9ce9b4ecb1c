//! Compact arena implementation using Vec<T> instead of Vec<Option<T>>.
//!
//! The arena owns every node of a tree; nodes refer to each other (children,
//! parents, leaf siblings) by `NodeId`, so parent back-references never form
//! an ownership cycle.

use std::convert::TryFrom;

use crate::types::{NodeId, NULL_NODE};

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
}

/// Compact arena allocator with a free list for slot reuse.
#[derive(Debug)]
pub struct CompactArena<T> {
    /// Direct storage without Option wrapper
    storage: Vec<T>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Track which slots are actually allocated
    allocated_mask: Vec<bool>,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };

        // NULL_NODE is reserved, so the last usable id is NULL_NODE - 1.
        match NodeId::try_from(index) {
            Ok(id) if id != NULL_NODE => id,
            _ => panic!("arena exhausted: index {} does not fit in a NodeId", index),
        }
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.allocated_index(id)?;

        self.allocated_mask[index] = false;
        self.free_list.push(index);

        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.allocated_index(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.allocated_index(id)?;
        Some(&mut self.storage[index])
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.allocated_index(id).is_some()
    }

    fn allocated_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }

        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let total_capacity = self.storage.capacity();
        let allocated_count = self.len();
        let free_count = self.free_list.len();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };

        CompactArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated_mask
            .iter()
            .filter(|&&allocated| allocated)
            .count()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}


// ============================================================================
// BPLUSTREE ARENA ACCESS HELPERS
// ============================================================================

use crate::tracing_helpers::error_log;
use crate::types::{BPlusTree, BranchNode, LeafNode, NodeRef};

impl<V> BPlusTree<V> {
    /// Get a leaf node from the arena, if `id` is allocated.
    #[inline]
    pub(crate) fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<V>> {
        self.leaf_arena.get(id)
    }

    /// Get a branch node from the arena, if `id` is allocated.
    #[inline]
    pub(crate) fn get_branch(&self, id: NodeId) -> Option<&BranchNode> {
        self.branch_arena.get(id)
    }

    /// Get statistics for the leaf node arena.
    pub fn leaf_arena_stats(&self) -> CompactArenaStats {
        self.leaf_arena.stats()
    }

    /// Get statistics for the branch node arena.
    pub fn branch_arena_stats(&self) -> CompactArenaStats {
        self.branch_arena.stats()
    }

    // A dangling id reachable from the tree means the structure is corrupt;
    // the accessors below abort rather than continue on a broken tree.

    #[inline]
    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<V> {
        match self.leaf_arena.get(id) {
            Some(leaf) => leaf,
            None => dangling("leaf", id),
        }
    }

    #[inline]
    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<V> {
        match self.leaf_arena.get_mut(id) {
            Some(leaf) => leaf,
            None => dangling("leaf", id),
        }
    }

    #[inline]
    pub(crate) fn branch(&self, id: NodeId) -> &BranchNode {
        match self.branch_arena.get(id) {
            Some(branch) => branch,
            None => dangling("branch", id),
        }
    }

    #[inline]
    pub(crate) fn branch_mut(&mut self, id: NodeId) -> &mut BranchNode {
        match self.branch_arena.get_mut(id) {
            Some(branch) => branch,
            None => dangling("branch", id),
        }
    }

    /// Parent branch of `node`, or `NULL_NODE` for the root.
    pub(crate) fn parent_of(&self, node: NodeRef) -> NodeId {
        match node {
            NodeRef::Leaf(id) => self.leaf(id).parent,
            NodeRef::Branch(id) => self.branch(id).parent,
        }
    }

    /// Point `node`'s back-reference at `parent`.
    pub(crate) fn set_parent(&mut self, node: NodeRef, parent: NodeId) {
        match node {
            NodeRef::Leaf(id) => self.leaf_mut(id).parent = parent,
            NodeRef::Branch(id) => self.branch_mut(id).parent = parent,
        }
    }

    /// Remove a leaf from the arena, returning its contents.
    pub(crate) fn take_leaf(&mut self, id: NodeId) -> LeafNode<V> {
        match self.leaf_arena.deallocate(id) {
            Some(leaf) => leaf,
            None => dangling("leaf", id),
        }
    }

    /// Remove a branch from the arena, returning its contents.
    pub(crate) fn take_branch(&mut self, id: NodeId) -> BranchNode {
        match self.branch_arena.deallocate(id) {
            Some(branch) => branch,
            None => dangling("branch", id),
        }
    }
}

#[cold]
fn dangling(kind: &str, id: NodeId) -> ! {
    error_log!(kind, id, "dangling node reference");
    panic!("tree corrupted: {} node {} is not allocated", kind, id)
}
