//! Shared helpers for integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//!     let tree = common::tree_of(4, 1..=12);
//! }
//! ```
//!
//! Run with `--features tracing` and `RUST_LOG=bplustree_index=debug` to see
//! splits, merges and borrows as they happen.

#![allow(dead_code)]

use std::sync::Once;

use bplustree_index::{BPlusTree, Key, NodeView};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Install a compact console subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call multiple times - only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .compact()
            .try_init();
    });
}

/// Tree of the given order holding `keys`, each mapped to itself.
pub fn tree_of(order: usize, keys: impl IntoIterator<Item = Key>) -> BPlusTree<Key> {
    let mut tree = BPlusTree::new(order).unwrap();
    for key in keys {
        tree.insert(key, key).unwrap();
    }
    tree
}

/// Keys `start, start + step, ...`, `count` of them.
pub fn stepped_keys(count: usize, start: Key, step: Key) -> Vec<Key> {
    (0..count as Key).map(|i| start + i * step).collect()
}

/// Keys of each child of `node`, left to right.
pub fn child_keys<V>(node: &NodeView<'_, V>) -> Vec<Vec<Key>> {
    node.children().iter().map(|child| child.keys().to_vec()).collect()
}

/// Keys of every leaf, left to right along the sibling chain.
pub fn leaf_keys<V>(tree: &BPlusTree<V>) -> Vec<Vec<Key>> {
    tree.leaves().map(|leaf| leaf.keys().to_vec()).collect()
}

/// Panic with the violation and the rendered tree if any invariant is broken.
pub fn assert_valid<V>(tree: &BPlusTree<V>) {
    if let Err(violation) = tree.check_invariants_detailed() {
        panic!("invariant violated: {}\n{}", violation, tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_init() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialized");
    }
}
