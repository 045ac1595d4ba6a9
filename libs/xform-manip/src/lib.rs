//! # Xform Manip
//!
//! Interactive translate, rotate and scale edits of one operation on a
//! transform stack.
//!
//! ## Architecture
//!
//! ```text
//! OpSelector ──→ resolve_op_index ──→ TransformManipulator
//!                                          │ Frames (coordinate, parent, world, post)
//!                                          ↓
//!                            translate / rotate / scale (delta, Space)
//!                                          ↓
//!                                Edit { previous, new }
//! ```
//!
//! A delta is given in one of four [`Space`]s and solved for the op's own
//! parametrization so that evaluating the stack again reproduces the edit.
//!
//! ## Example
//!
//! ```rust
//! use glam::{DQuat, DVec3};
//! use xform_manip::{OpSelector, PrimaryOpNames, ManipMode, Space, TransformManipulator};
//! use xform_ops::{InMemoryOpStore, OpValue, OperationKind, Precision, TimeCode,
//!     TransformOperation};
//!
//! let mut store = InMemoryOpStore::default();
//! let node = store.add_node(None).unwrap();
//! for kind in [OperationKind::Translate, OperationKind::RotateXYZ, OperationKind::Scale] {
//!     store.push_operation(node, TransformOperation::new(kind, Precision::Double, None)).unwrap();
//! }
//!
//! let names = PrimaryOpNames::default();
//! let mut rotate = TransformManipulator::new(
//!     &store,
//!     node,
//!     OpSelector::Primary(&names),
//!     Some(ManipMode::Rotate),
//!     TimeCode::Default,
//! )
//! .unwrap();
//! assert_eq!(rotate.op_index(), 1);
//!
//! let edit = rotate
//!     .rotate_x(&mut store, 45f64.to_radians(), Space::Transform)
//!     .unwrap()
//!     .unwrap();
//! let OpValue::Vec3(angles) = edit.new else { unreachable!() };
//! assert!((angles - DVec3::new(45.0, 0.0, 0.0)).length() < 1e-9);
//!
//! // the identity rotation writes nothing
//! assert!(rotate.rotate(&mut store, DQuat::IDENTITY, Space::World).unwrap().is_none());
//! ```

pub mod edit;
pub mod error;
pub mod lookup;
pub mod manipulator;
pub mod mode;
pub mod settings;

// Re-export public API
pub use edit::Edit;
pub use error::{ManipulatorError, ManipulatorResult};
pub use lookup::{resolve_op_index, OpSelector, PrimaryOpNames};
pub use manipulator::{Frames, TransformManipulator};
pub use mode::{ManipMode, Space};
pub use settings::{ManipulatorConfig, ManipulatorConfigError};
