//! Validation and debugging utilities for BPlusTree.
//!
//! This module checks the structural invariants the insert and delete
//! engines must maintain: key order, occupancy bounds, uniform leaf depth,
//! separator bracketing, parent back-references, the leaf chain, and
//! agreement between the arenas and the reachable tree.

use crate::types::{BPlusTree, Key, NodeId, NodeRef, NULL_NODE};

/// Key range a subtree must fall in: `lower <= key < upper`.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    lower: Option<Key>,
    upper: Option<Key>,
}

impl Bounds {
    const UNBOUNDED: Bounds = Bounds {
        lower: None,
        upper: None,
    };

    fn contains(&self, key: Key) -> bool {
        self.lower.map_or(true, |lower| key >= lower) && self.upper.map_or(true, |upper| key < upper)
    }
}

/// Facts gathered while walking the tree, compared against the leaf chain and arenas.
#[derive(Default)]
struct Walk {
    leaf_depth: Option<usize>,
    leaves: Vec<NodeId>,
    branches: usize,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<V> BPlusTree<V> {
    /// Check if the tree maintains B+ tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    ///
    /// # Returns
    ///
    /// `Ok(())` for a well-formed tree, or a description of the first
    /// violation found.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        if self.parent_of_checked(self.root)? != NULL_NODE {
            return Err(format!("Root {:?} has a parent", self.root));
        }

        let mut walk = Walk::default();
        self.check_node(self.root, Bounds::UNBOUNDED, NULL_NODE, 1, &mut walk)?;
        self.check_leaf_chain(&walk.leaves)?;
        self.check_arena_consistency(&walk)
    }

    /// Alias for check_invariants_detailed (for test compatibility).
    pub fn validate(&self) -> Result<(), String> {
        self.check_invariants_detailed()
    }

    // ============================================================================
    // VALIDATION HELPERS
    // ============================================================================

    fn parent_of_checked(&self, node: NodeRef) -> Result<NodeId, String> {
        match node {
            NodeRef::Leaf(id) => self.get_leaf(id).map(|leaf| leaf.parent),
            NodeRef::Branch(id) => self.get_branch(id).map(|branch| branch.parent),
        }
        .ok_or_else(|| format!("{:?} is not allocated", node))
    }

    fn check_node(
        &self,
        node: NodeRef,
        bounds: Bounds,
        expected_parent: NodeId,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<(), String> {
        let is_root = expected_parent == NULL_NODE;
        let parent = self.parent_of_checked(node)?;
        if parent != expected_parent {
            return Err(format!(
                "{:?} records parent {} but hangs under {}",
                node, parent, expected_parent
            ));
        }

        match node {
            NodeRef::Leaf(id) => {
                let leaf = self
                    .get_leaf(id)
                    .ok_or_else(|| format!("Leaf {} is not allocated", id))?;

                if leaf.keys.len() != leaf.values.len() {
                    return Err(format!(
                        "Leaf {} has {} keys but {} values",
                        id,
                        leaf.keys.len(),
                        leaf.values.len()
                    ));
                }
                check_ascending(&leaf.keys, node)?;
                if leaf.len() > leaf.max_keys() {
                    return Err(format!("Leaf {} overflows with {} keys", id, leaf.len()));
                }
                if !is_root && leaf.is_underfull() {
                    return Err(format!("Leaf {} underflows with {} keys", id, leaf.len()));
                }
                if let Some(&key) = leaf.keys.iter().find(|&&key| !bounds.contains(key)) {
                    return Err(format!("Leaf {} key {} is outside {:?}", id, key, bounds));
                }

                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(format!(
                            "Leaf {} at depth {} but other leaves at depth {}",
                            id, depth, expected
                        ));
                    }
                    Some(_) => {}
                }
                walk.leaves.push(id);
                Ok(())
            }
            NodeRef::Branch(id) => {
                let branch = self
                    .get_branch(id)
                    .ok_or_else(|| format!("Branch {} is not allocated", id))?;

                if branch.keys.len() + 1 != branch.children.len() {
                    return Err(format!(
                        "Branch {} has {} keys but {} children",
                        id,
                        branch.keys.len(),
                        branch.children.len()
                    ));
                }
                check_ascending(&branch.keys, node)?;
                if branch.len() > branch.max_children() {
                    return Err(format!("Branch {} overflows with {} children", id, branch.len()));
                }
                let min_children = if is_root { 2 } else { branch.min_children() };
                if branch.len() < min_children {
                    return Err(format!(
                        "Branch {} underflows with {} children",
                        id,
                        branch.len()
                    ));
                }
                if let Some(&key) = branch.keys.iter().find(|&&key| !bounds.contains(key)) {
                    return Err(format!("Branch {} separator {} is outside {:?}", id, key, bounds));
                }

                walk.branches += 1;
                for (i, &child) in branch.children.iter().enumerate() {
                    let child_bounds = Bounds {
                        lower: if i == 0 { bounds.lower } else { Some(branch.keys[i - 1]) },
                        upper: branch.keys.get(i).copied().or(bounds.upper),
                    };
                    self.check_node(child, child_bounds, id, depth + 1, walk)?;
                }
                Ok(())
            }
        }
    }

    /// The sibling chain must visit exactly the leaves found by descent, in
    /// the same left-to-right order, and end at the last one.
    fn check_leaf_chain(&self, leaves_in_order: &[NodeId]) -> Result<(), String> {
        let mut current = self.first_leaf_id();
        let mut previous_key: Option<Key> = None;

        for (position, &expected) in leaves_in_order.iter().enumerate() {
            if current != expected {
                return Err(format!(
                    "Leaf chain reaches {} at position {} where descent found {}",
                    current, position, expected
                ));
            }
            let leaf = self
                .get_leaf(current)
                .ok_or_else(|| format!("Leaf chain points at unallocated leaf {}", current))?;
            if let (Some(previous), Some(&first)) = (previous_key, leaf.keys.first()) {
                if previous >= first {
                    return Err(format!(
                        "Leaf chain goes backwards: {} then {} in leaf {}",
                        previous, first, current
                    ));
                }
            }
            previous_key = leaf.keys.last().copied().or(previous_key);
            current = leaf.next;
        }

        if current != NULL_NODE {
            return Err(format!("Leaf chain continues past the last leaf to {}", current));
        }
        Ok(())
    }

    /// Every allocated node must be reachable from the root exactly once.
    fn check_arena_consistency(&self, walk: &Walk) -> Result<(), String> {
        let leaf_stats = self.leaf_arena_stats();
        if walk.leaves.len() != leaf_stats.allocated_count {
            return Err(format!(
                "Leaf consistency check: {} in tree vs {} in arena",
                walk.leaves.len(),
                leaf_stats.allocated_count
            ));
        }

        let branch_stats = self.branch_arena_stats();
        if walk.branches != branch_stats.allocated_count {
            return Err(format!(
                "Branch consistency check: {} in tree vs {} in arena",
                walk.branches, branch_stats.allocated_count
            ));
        }
        Ok(())
    }
}

fn check_ascending(keys: &[Key], node: NodeRef) -> Result<(), String> {
    match keys.windows(2).find(|pair| pair[0] >= pair[1]) {
        Some(pair) => Err(format!(
            "{:?} keys out of order: {} before {}",
            node, pair[0], pair[1]
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{BPlusTree, NodeRef, NULL_NODE};

    fn sample_tree() -> BPlusTree<i64> {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in 1..=12 {
            tree.insert(key, key).unwrap();
        }
        tree
    }

    fn first_child(tree: &BPlusTree<i64>) -> NodeRef {
        tree.root().children()[0].node_ref()
    }

    #[test]
    fn test_valid_trees_pass() {
        assert_eq!(BPlusTree::<i64>::new(3).unwrap().validate(), Ok(()));
        assert_eq!(sample_tree().check_invariants_detailed(), Ok(()));
    }

    #[test]
    fn test_detects_wrong_parent_pointer() {
        let mut tree = sample_tree();
        let child = first_child(&tree);
        tree.set_parent(child, NULL_NODE);
        let error = tree.check_invariants_detailed().unwrap_err();
        assert!(error.contains("parent"), "{}", error);
    }

    #[test]
    fn test_detects_unordered_leaf_keys() {
        let mut tree = sample_tree();
        let leaf_id = tree.first_leaf_id();
        tree.leaf_mut(leaf_id).keys.swap(0, 1);
        assert!(!tree.check_invariants());
    }

    #[test]
    fn test_detects_separator_violation() {
        let mut tree = sample_tree();
        let NodeRef::Branch(root_id) = tree.root else {
            panic!("expected a branch root");
        };
        tree.branch_mut(root_id).keys[0] = 100;
        let error = tree.check_invariants_detailed().unwrap_err();
        assert!(error.contains("outside"), "{}", error);
    }

    #[test]
    fn test_detects_broken_leaf_chain() {
        let mut tree = sample_tree();
        let leaf_id = tree.first_leaf_id();
        tree.leaf_mut(leaf_id).next = NULL_NODE;
        let error = tree.check_invariants_detailed().unwrap_err();
        assert!(error.contains("Leaf chain"), "{}", error);
    }

    #[test]
    fn test_detects_underfull_leaf() {
        let mut tree = sample_tree();
        let leaf_id = tree.first_leaf_id();
        tree.leaf_mut(leaf_id).pop_last();
        let error = tree.check_invariants_detailed().unwrap_err();
        assert!(error.contains("underflows"), "{}", error);
    }

    #[test]
    fn test_detects_leaked_arena_node() {
        let mut tree = sample_tree();
        tree.leaf_arena.allocate(Default::default());
        let error = tree.check_invariants_detailed().unwrap_err();
        assert!(error.contains("consistency"), "{}", error);
    }
}
