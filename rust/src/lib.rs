//! In-memory B+ tree index over `i64` keys.
//!
//! This crate provides the balancing engine of a B+ tree: point lookup,
//! insertion with split propagation, and deletion with merge or
//! redistribution propagation. Nodes live in two arenas (leaves and
//! branches) and refer to each other by id, including the parent
//! back-references the delete engine navigates by.
//!
//! ```
//! use bplustree_index::BPlusTree;
//!
//! let mut tree = BPlusTree::new(4).unwrap();
//! for key in 1..=12 {
//!     tree.insert(key, key * 10).unwrap();
//! }
//! assert_eq!(tree.height(), 3);
//!
//! assert_eq!(tree.delete(7), Ok(70));
//! assert_eq!(tree.find(8), Ok(&80));
//! assert!(tree.check_invariants());
//! ```
//!
//! With the `tracing` feature enabled, public operations emit spans and
//! structural changes (splits, merges, borrows, root changes) emit events.

mod tracing_helpers;

mod compact_arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod node;
mod render;
mod search;
mod tree_structure;
mod types;
mod validation;
mod view;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::validation as order_validation;
pub use construction::DEFAULT_ORDER;
pub use error::{BPlusTreeError, BTreeResult, InitResult, KeyResult, ModifyResult};
pub use types::{BPlusTree, BranchNode, Key, LeafNode, NodeId, NodeRef, MIN_ORDER, NULL_NODE};
pub use view::{Entry, Leaves, NodeView, Payload};
