//! Error handling and result types for BPlusTree operations.
//!
//! All three error kinds are reported before the tree is mutated, so a failed
//! operation always leaves the tree exactly as it was.

use crate::types::Key;

/// Error type for B+ tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BPlusTreeError {
    /// Order too small for splits and merges to terminate.
    InvalidOrder(String),
    /// Insert of a key that is already present.
    DuplicateKey(Key),
    /// Find or delete of a key that is absent.
    KeyNotFound(Key),
}

impl BPlusTreeError {
    /// Create an InvalidOrder error with context
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidOrder(format!(
            "Order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Check if this error is an order error
    pub fn is_order_error(&self) -> bool {
        matches!(self, Self::InvalidOrder(_))
    }

    /// Check if this error reports a duplicate key
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }

    /// Check if this error reports a missing key
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// The key the failed operation was called with, if any.
    pub fn key(&self) -> Option<Key> {
        match self {
            Self::DuplicateKey(key) | Self::KeyNotFound(key) => Some(*key),
            Self::InvalidOrder(_) => None,
        }
    }
}

impl std::fmt::Display for BPlusTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BPlusTreeError::InvalidOrder(msg) => write!(f, "Invalid order: {}", msg),
            BPlusTreeError::DuplicateKey(key) => write!(f, "Duplicate key: {}", key),
            BPlusTreeError::KeyNotFound(key) => write!(f, "Key not found in tree: {}", key),
        }
    }
}

impl std::error::Error for BPlusTreeError {}

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, BPlusTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_message() {
        let err = BPlusTreeError::invalid_order(2, 3);
        assert!(err.is_order_error());
        assert_eq!(
            err.to_string(),
            "Invalid order: Order 2 is invalid (minimum required: 3)"
        );
        assert_eq!(err.key(), None);
    }

    #[test]
    fn test_key_errors_carry_key() {
        let dup = BPlusTreeError::DuplicateKey(7);
        assert!(dup.is_duplicate_key());
        assert_eq!(dup.key(), Some(7));
        assert_eq!(dup.to_string(), "Duplicate key: 7");

        let missing = BPlusTreeError::KeyNotFound(-3);
        assert!(missing.is_key_not_found());
        assert_eq!(missing.key(), Some(-3));
        assert_eq!(missing.to_string(), "Key not found in tree: -3");
    }
}
