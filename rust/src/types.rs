//! Core types and data structures for BPlusTree.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree implementation.

use crate::compact_arena::CompactArena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest order for which splits and merges are guaranteed to terminate.
pub const MIN_ORDER: usize = 3;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Key type stored in the index.
pub type Key = i64;

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel for "no node": end of the leaf chain, or the root's parent.
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B+ tree index keyed by `i64`.
///
/// All values live in leaves; leaves are chained left to right through their
/// `next` link. Internal nodes only route lookups. Every non-root node keeps a
/// back-reference to its parent, which the delete engine uses to find siblings
/// when a node underflows.
///
/// The `order` is the maximum number of pointers a node may hold: a leaf
/// holds at most `order - 1` keys (plus its sibling link) and a branch at most
/// `order` children.
///
/// # Examples
///
/// ```
/// use bplustree_index::BPlusTree;
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// tree.insert(1, "one").unwrap();
/// tree.insert(2, "two").unwrap();
/// tree.insert(3, "three").unwrap();
///
/// assert_eq!(tree.find(2), Ok(&"two"));
/// assert_eq!(tree.delete(2), Ok("two"));
/// assert!(tree.find(2).is_err());
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n)
/// - **Lookup**: O(log n)
/// - **Deletion**: O(log n)
///
/// The tree is not internally synchronized; wrap it in a lock to share it
/// between threads.
#[derive(Debug)]
pub struct BPlusTree<V> {
    /// Maximum number of pointers per node.
    pub(crate) order: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<V>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: CompactArena<BranchNode>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<V> {
    /// Order of the owning tree.
    pub(crate) order: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<Key>,
    /// List of values corresponding to keys.
    pub(crate) values: Vec<V>,
    /// Next leaf node in the linked list.
    pub(crate) next: NodeId,
    /// Branch holding a pointer to this leaf, or `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

/// Internal (branch) node containing separator keys and child pointers.
///
/// `keys[i]` is the separator between `children[i]` and `children[i + 1]`:
/// every key under `children[i + 1]` is `>= keys[i]`.
#[derive(Debug, Clone)]
pub struct BranchNode {
    /// Order of the owning tree.
    pub(crate) order: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<Key>,
    /// List of child nodes (leaves or other branches).
    pub(crate) children: Vec<NodeRef>,
    /// Branch holding a pointer to this branch, or `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

// ============================================================================
// ENUMS AND RESULT TYPES
// ============================================================================

/// Node reference that can be either a leaf or branch node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// Signal returned by the recursive insert helper to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertResult {
    /// The subtree absorbed the insertion.
    Inserted,
    /// The subtree root split; the caller must add `new_node` right after the
    /// child that produced it, separated by `separator_key`.
    Split {
        separator_key: Key,
        new_node: NodeRef,
    },
}

/// Signal returned by the recursive delete helper to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RemoveResult {
    /// The subtree root is still within its occupancy bounds.
    NoUnderflow,
    /// The subtree root underflowed and was merged with a sibling; the parent
    /// must drop its child entry at this index and re-check itself.
    Merged(usize),
    /// The subtree root underflowed and borrowed from a sibling. Only a
    /// separator key in the parent changed.
    Redistributed,
}
