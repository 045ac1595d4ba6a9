//! Frames a manipulator works in, recomputed on every refresh.

use glam::{DMat3, DMat4};
use log::trace;

use xform_ops::maths::{affine_pseudo_inverse, normalize_axes};
use xform_ops::{
    CoordinateFrameEvaluator, OpStack, OperationKind, TimeCode, TransformOpStore,
};

use crate::error::ManipulatorResult;
use crate::mode::ManipMode;

/// Every frame derived for one operation at one time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frames {
    /// Ops before the edited one
    pub coordinate: DMat4,
    /// The coordinate frame shifted to the pivot of a matrix op
    pub manipulator: DMat4,
    /// Inverse of `manipulator`
    pub inv_manipulator: DMat4,
    /// Ops after the edited one
    pub post: DMat4,
    /// Inverse of `post`
    pub inv_post: DMat4,
    /// Ancestor world frame, identity when inheritance is reset
    pub parent: DMat4,
    /// `parent · manipulator`
    pub world: DMat4,
    /// Inverse of `world`
    pub inv_world: DMat4,
    /// The edited op's own matrix
    pub op_matrix: DMat4,
}

impl Frames {
    /// Evaluates the frames around `stack[index]`.
    ///
    /// A matrix op edited in rotate mode pivots about its own translation;
    /// in scale mode it also adopts its own normalized axes.
    pub fn compute<S: TransformOpStore + ?Sized>(
        store: &S,
        stack: &OpStack,
        index: usize,
        mode: ManipMode,
        time: TimeCode,
        singular_tolerance: f64,
    ) -> ManipulatorResult<Self> {
        let eval = CoordinateFrameEvaluator::new(store);
        let coordinate = eval.frame_for_index(stack, index, time)?;
        let post = eval.frame_for_range(stack, index + 1, stack.len(), time)?;

        let op = &stack.operations[index];
        let value = store.operation_value(stack.node, op.name(), time)?;
        let op_matrix = op.matrix(value.as_ref());

        let manipulator = if op.kind() == OperationKind::Matrix {
            match mode {
                ManipMode::Translate => coordinate,
                ManipMode::Rotate => {
                    let mut frame = coordinate;
                    frame.w_axis += coordinate * op_matrix.w_axis.truncate().extend(0.0);
                    frame
                }
                ManipMode::Scale => coordinate * normalize_axes(op_matrix),
            }
        } else {
            coordinate
        };

        let parent = if stack.resets_parent_inheritance {
            DMat4::IDENTITY
        } else {
            store.ancestor_world_frame(stack.node, time)?
        };
        let world = parent * manipulator;
        trace!(
            "node {}: frames for {} in {mode} mode refreshed",
            stack.node,
            op.name()
        );

        Ok(Self {
            coordinate,
            manipulator,
            inv_manipulator: affine_pseudo_inverse(manipulator, singular_tolerance),
            post,
            inv_post: affine_pseudo_inverse(post, singular_tolerance),
            parent,
            world,
            inv_world: affine_pseudo_inverse(world, singular_tolerance),
            op_matrix,
        })
    }
}

/// Upper-left 3x3 block of a frame.
pub(crate) fn linear(m: &DMat4) -> DMat3 {
    DMat3::from_mat4(*m)
}
