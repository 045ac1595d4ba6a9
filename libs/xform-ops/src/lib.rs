//! # Xform Ops
//!
//! Typed transform operation stacks and coordinate frame evaluation.
//!
//! ## Architecture
//!
//! ```text
//! TransformOpStore (ordered ops + typed values)
//!        ↓
//! CoordinateFrameEvaluator (frame before / after any index)
//!        ↓
//! xform-manip (edits expressed in transform, parent, world or object space)
//! ```
//!
//! Matrices follow the `glam` column-vector convention: the local transform
//! of a node is `C₀ · C₁ · … · C_{n-1}` where `Cᵢ` is the matrix of the
//! operation at index `i`, so `ops[n-1]` is applied to points first.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use xform_ops::{
//!     CoordinateFrameEvaluator, InMemoryOpStore, OpValue, OperationKind, Precision,
//!     TimeCode, TransformOpStore, TransformOperation,
//! };
//!
//! let mut store = InMemoryOpStore::default();
//! let node = store.add_node(None).unwrap();
//! let scale = TransformOperation::new(OperationKind::Scale, Precision::Double, None);
//! let translate = TransformOperation::new(OperationKind::Translate, Precision::Double, None);
//! store.push_operation(node, scale.clone()).unwrap();
//! store.push_operation(node, translate.clone()).unwrap();
//! let s = OpValue::Vec3(DVec3::new(1.0, 10.0, 100.0));
//! let t = OpValue::Vec3(DVec3::new(1.0, 2.0, 3.0));
//! store.author(node, scale.name(), s, TimeCode::Default).unwrap();
//! store.author(node, translate.name(), t, TimeCode::Default).unwrap();
//!
//! let stack = store.ordered_operations(node).unwrap();
//! let frame = CoordinateFrameEvaluator::new(&store)
//!     .frame_for_index(&stack, 2, TimeCode::Default)
//!     .unwrap();
//! assert_eq!(frame.w_axis.truncate(), DVec3::new(1.0, 20.0, 300.0));
//! ```

pub mod error;
pub mod evaluator;
pub mod maths;
pub mod op;
pub mod precision;
pub mod store;

// Re-export public API
pub use error::{EvalError, EvalResult, StoreError, StoreResult};
pub use evaluator::CoordinateFrameEvaluator;
pub use op::{
    OpValue, OperationKind, RotationAxis, RotationOrder, TransformOperation, ValueShape,
};
pub use precision::Precision;
pub use store::{InMemoryOpStore, NodeId, OpStack, TimeCode, TransformOpStore};
