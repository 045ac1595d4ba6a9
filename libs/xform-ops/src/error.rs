//! # Error Types
//!
//! Errors raised by the op-value store and the coordinate frame evaluator.
//!
//! ## Error Policy
//!
//! - Lookups that miss are explicit errors, never silent identities
//! - Values that were never authored are NOT errors (they read as identity)
//! - Errors carry the node and operation name for debugging

use thiserror::Error;

use crate::op::{OperationKind, ValueShape};
use crate::store::NodeId;

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors raised by a [`TransformOpStore`](crate::store::TransformOpStore).
///
/// ## Example
///
/// ```rust
/// use xform_ops::{InMemoryOpStore, NodeId, StoreError, TransformOpStore};
///
/// let store = InMemoryOpStore::default();
/// match store.ordered_operations(NodeId(7)) {
///     Err(StoreError::UnknownNode(id)) => assert_eq!(id, NodeId(7)),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The node handle does not exist in the store.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// No operation with this name exists on the node.
    #[error("operation '{name}' not found on node {node}")]
    UnknownOperation {
        /// Node that was searched
        node: NodeId,
        /// Full operation name
        name: String,
    },

    /// A value of the wrong shape was written to an operation.
    #[error("operation '{name}' expects a {expected} value, got {found}")]
    ValueMismatch {
        /// Full operation name
        name: String,
        /// Shape required by the operation kind
        expected: ValueShape,
        /// Shape that was supplied
        found: ValueShape,
    },

    /// A forward operation with this name is already on the stack.
    #[error("operation '{name}' already exists on node {node}")]
    DuplicateOperation {
        /// Node being authored
        node: NodeId,
        /// Full operation name
        name: String,
    },

    /// An inverse operation was pushed without a forward partner of the same kind.
    #[error("inverse operation '{name}' has no {kind} partner on node {node}")]
    MissingInversePartner {
        /// Node being authored
        node: NodeId,
        /// Full operation name
        name: String,
        /// Kind of the inverse operation
        kind: OperationKind,
    },
}

// =============================================================================
// EVALUATION ERRORS
// =============================================================================

/// Errors raised while evaluating coordinate frames.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The exclusive frame index exceeds the stack length.
    #[error("frame index {index} out of range for a stack of {len} operations")]
    IndexOutOfRange {
        /// Requested exclusive index
        index: usize,
        /// Number of operations on the stack
        len: usize,
    },

    /// The requested half-open range is inverted or exceeds the stack.
    #[error("invalid frame range {start}..{end} for a stack of {len} operations")]
    InvalidRange {
        /// Inclusive start index
        start: usize,
        /// Exclusive end index
        end: usize,
        /// Number of operations on the stack
        len: usize,
    },

    /// The store failed while values were being read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// RESULT TYPE ALIASES
// =============================================================================

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for frame evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

// =============================================================================
// TESTS
// =============================================================================
