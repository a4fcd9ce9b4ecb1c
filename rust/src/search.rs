//! Position search within a node's sorted keys.
//!
//! Both node kinds keep their meaningful keys in a plain sorted slice (a
//! branch stores no key for its leftmost child), so one binary search serves
//! leaves and branches alike.

use crate::types::Key;

/// Smallest index `i` such that `keys[i] >= key`, or `keys.len()` if every
/// key is smaller.
#[inline]
pub(crate) fn find_insert_pos(keys: &[Key], key: Key) -> usize {
    match keys.binary_search(&key) {
        Ok(index) | Err(index) => index,
    }
}

/// Index of the child to descend into for `key`, given a branch's separators.
///
/// Picks the greatest child whose separator is `<= key`, or the leftmost
/// child when `key` is below every separator.
#[inline]
pub(crate) fn find_child_index(separators: &[Key], key: Key) -> usize {
    let pos = find_insert_pos(separators, key);
    if pos < separators.len() && separators[pos] == key {
        pos + 1
    } else {
        pos
    }
}

/// Exact-match lookup in a leaf's keys.
#[inline]
pub(crate) fn find_exact(keys: &[Key], key: Key) -> Option<usize> {
    let pos = find_insert_pos(keys, key);
    (pos < keys.len() && keys[pos] == key).then_some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_pos_bounds() {
        let keys = [10, 20, 30];
        assert_eq!(find_insert_pos(&keys, 5), 0);
        assert_eq!(find_insert_pos(&keys, 10), 0);
        assert_eq!(find_insert_pos(&keys, 15), 1);
        assert_eq!(find_insert_pos(&keys, 30), 2);
        assert_eq!(find_insert_pos(&keys, 31), 3);
        assert_eq!(find_insert_pos(&[], 1), 0);
    }

    #[test]
    fn test_child_index_routes_equal_keys_right() {
        let separators = [10, 20, 30];
        assert_eq!(find_child_index(&separators, i64::MIN), 0);
        assert_eq!(find_child_index(&separators, 9), 0);
        assert_eq!(find_child_index(&separators, 10), 1);
        assert_eq!(find_child_index(&separators, 19), 1);
        assert_eq!(find_child_index(&separators, 20), 2);
        assert_eq!(find_child_index(&separators, 30), 3);
        assert_eq!(find_child_index(&separators, i64::MAX), 3);
    }

    #[test]
    fn test_find_exact() {
        let keys = [-4, 0, 7];
        assert_eq!(find_exact(&keys, 0), Some(1));
        assert_eq!(find_exact(&keys, 7), Some(2));
        assert_eq!(find_exact(&keys, 1), None);
        assert_eq!(find_exact(&keys, 8), None);
    }
}
