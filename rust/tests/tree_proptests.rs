//! Property-based tests for the tree.
//!
//! Uses differential testing against `BTreeMap` as an oracle and checks the
//! full invariant set after every mutation.

use bplustree_index::{BPlusTree, BPlusTreeError};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
//  Strategies
// ============================================================================

/// Orders from the minimum up to a size where nodes are still small enough
/// for short sequences to reach every rebalancing path.
fn order() -> impl Strategy<Value = usize> {
    3usize..=9
}

/// Keys from a narrow range so inserts collide and deletes hit.
fn key() -> impl Strategy<Value = i64> {
    -64i64..64
}

/// Operations for random testing.
#[derive(Debug, Clone)]
enum Op {
    Insert(i64, u32),
    Delete(i64),
    Find(i64),
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            2 => key().prop_map(Op::Delete),
            1 => key().prop_map(Op::Find),
        ],
        0..=max_ops,
    )
}

fn check(tree: &BPlusTree<u32>) -> Result<(), TestCaseError> {
    tree.check_invariants_detailed()
        .map_err(|violation| TestCaseError::fail(format!("{}\n{}", violation, tree)))
}

// ============================================================================
//  Differential Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Random operation sequences agree with BTreeMap and keep every invariant.
    #[test]
    fn matches_btreemap(order in order(), ops in operations(400)) {
        let mut tree = BPlusTree::new(order).unwrap();
        let mut oracle = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let result = tree.insert(k, v);
                    if oracle.contains_key(&k) {
                        prop_assert_eq!(result, Err(BPlusTreeError::DuplicateKey(k)));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        oracle.insert(k, v);
                    }
                    check(&tree)?;
                }
                Op::Delete(k) => {
                    let result = tree.delete(k);
                    match oracle.remove(&k) {
                        Some(v) => prop_assert_eq!(result, Ok(v)),
                        None => prop_assert_eq!(result, Err(BPlusTreeError::KeyNotFound(k))),
                    }
                    check(&tree)?;
                }
                Op::Find(k) => {
                    prop_assert_eq!(tree.get(k), oracle.get(&k));
                }
            }
        }

        prop_assert_eq!(tree.len(), oracle.len());
        let leaf_order: Vec<i64> = tree.leaves().flat_map(|leaf| leaf.keys().to_vec()).collect();
        let expected: Vec<i64> = oracle.keys().copied().collect();
        prop_assert_eq!(leaf_order, expected);
    }

    /// Inserting then deleting every key in an arbitrary order empties the tree
    /// and frees every node but the root leaf.
    #[test]
    fn insert_then_delete_all(
        order in order(),
        keys in prop::collection::hash_set(any::<i64>(), 0..300),
        seed in any::<u64>(),
    ) {
        let keys: Vec<i64> = keys.into_iter().collect();
        let mut tree = BPlusTree::new(order).unwrap();
        for &k in &keys {
            tree.insert(k, k as u32).unwrap();
        }
        check(&tree)?;

        // deterministic shuffle driven by the seed
        let mut delete_order = keys.clone();
        delete_order.sort_by_key(|&k| (k as u64).wrapping_mul(seed | 1).rotate_left(17));

        for &k in &delete_order {
            prop_assert_eq!(tree.delete(k), Ok(k as u32));
            check(&tree)?;
        }

        prop_assert!(tree.is_empty());
        prop_assert!(tree.is_leaf_root());
        prop_assert_eq!(tree.leaf_arena_stats().allocated_count, 1);
        prop_assert_eq!(tree.branch_arena_stats().allocated_count, 0);
    }

    /// Failed operations leave the tree exactly as it was.
    #[test]
    fn failed_operations_do_not_mutate(
        order in order(),
        keys in prop::collection::btree_set(key(), 1..100),
        missing in 64i64..1000,
    ) {
        let mut tree = BPlusTree::new(order).unwrap();
        for &k in &keys {
            tree.insert(k, 0).unwrap();
        }
        let before = tree.to_string();
        let present = *keys.iter().next().unwrap();

        prop_assert!(tree.insert(present, 1).unwrap_err().is_duplicate_key());
        prop_assert_eq!(tree.to_string(), before.clone());
        prop_assert_eq!(tree.find(present), Ok(&0));

        prop_assert!(tree.delete(missing).unwrap_err().is_key_not_found());
        prop_assert_eq!(tree.to_string(), before);
        prop_assert_eq!(tree.len(), keys.len());
    }

    /// Height stays logarithmic: every non-root node is at least half full.
    #[test]
    fn height_is_bounded(order in order(), count in 1usize..2000) {
        let mut tree = BPlusTree::new(order).unwrap();
        for k in 0..count as i64 {
            tree.insert(k, 0).unwrap();
        }

        let min_fanout = ((order + 1) / 2) as f64;
        let leaves = tree.leaf_count() as f64;
        let bound = 2.0 + leaves.ln() / min_fanout.ln();
        prop_assert!(
            (tree.height() as f64) <= bound,
            "height {} exceeds {} for {} keys at order {}",
            tree.height(),
            bound,
            count,
            order
        );
    }
}
