//! # Error Types
//!
//! Failures of a manipulation call. Every failure leaves the store untouched.
//!
//! Calls that succeed without writing (a negligible delta, or a rotation
//! through a singular basis) are not errors; they return `Ok(None)`.

use thiserror::Error;

use xform_ops::{EvalError, OperationKind, RotationAxis, StoreError};

use crate::mode::{ManipMode, Space};

/// Errors raised by the transform manipulator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManipulatorError {
    /// The selector does not match an operation on the stack.
    #[error("unable to resolve transform operation: {0}")]
    Unresolvable(String),

    /// The operation kind cannot be edited in the requested mode.
    #[error("cannot {mode} operation '{name}' of kind {kind}")]
    IncompatibleMode {
        /// Full operation name
        name: String,
        /// Kind of the operation
        kind: OperationKind,
        /// Requested mode
        mode: ManipMode,
    },

    /// The operation is the inverse half of a pivot pair.
    #[error("operation '{name}' is an inverse and cannot be edited directly")]
    InverseOperation {
        /// Full operation name
        name: String,
    },

    /// A non-uniform scale cannot be expressed in this space without shear.
    #[error("non-uniform scale is not representable in {space} space")]
    NonUniformScale {
        /// Requested space
        space: Space,
    },

    /// A single-axis rotation would need a component about another axis.
    #[error("operation '{name}' can only rotate about {axis}")]
    AxisMismatch {
        /// Full operation name
        name: String,
        /// The operation's axis
        axis: RotationAxis,
    },

    /// Store access failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Frame evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Result type alias for manipulator calls.
pub type ManipulatorResult<T> = Result<T, ManipulatorError>;
