//! # Transform Manipulator
//!
//! Edits one operation of a node's transform stack so that a translate,
//! rotate or scale delta expressed in a chosen [`Space`](crate::Space) is reproduced when
//! the stack is evaluated again.
//!
//! ## Lifecycle
//!
//! ```text
//! TransformManipulator::new (resolve op, pick mode, compute frames)
//!        ↓
//! translate / rotate / scale (refresh frames → solve → write → Edit)
//! ```
//!
//! Frames are re-read from the store before every edit, so edits made by
//! someone else between calls are always seen.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use xform_manip::{OpSelector, Space, TransformManipulator};
//! use xform_ops::{InMemoryOpStore, OpValue, OperationKind, Precision, TimeCode,
//!     TransformOperation};
//!
//! let mut store = InMemoryOpStore::default();
//! let node = store.add_node(None).unwrap();
//! let op = TransformOperation::new(OperationKind::Translate, Precision::Double, None);
//! store.push_operation(node, op.clone()).unwrap();
//!
//! let mut manip =
//!     TransformManipulator::new(&store, node, OpSelector::Index(0), None, TimeCode::Default)
//!         .unwrap();
//! let edit = manip
//!     .translate(&mut store, DVec3::new(1.0, 2.0, 3.0), Space::Transform)
//!     .unwrap();
//! assert_eq!(edit.unwrap().new, OpValue::Vec3(DVec3::new(1.0, 2.0, 3.0)));
//! ```

mod absolute;
mod frames;
mod rotate;
mod scale;
mod translate;

pub use frames::Frames;

use glam::{DMat4, DQuat, DVec3};
use log::debug;

use xform_ops::maths::rotation_of;
use xform_ops::{
    NodeId, OpStack, OpValue, OperationKind, RotationAxis, TimeCode, TransformOpStore,
    TransformOperation,
};

use crate::edit::Edit;
use crate::error::{ManipulatorError, ManipulatorResult};
use crate::lookup::{resolve_op_index, OpSelector};
use crate::mode::ManipMode;
use crate::settings::ManipulatorConfig;

/// Edits one operation on a node's transform stack.
#[derive(Debug, Clone)]
pub struct TransformManipulator {
    node: NodeId,
    index: usize,
    op: TransformOperation,
    mode: ManipMode,
    time: TimeCode,
    config: ManipulatorConfig,
    stack: OpStack,
    frames: Frames,
}

impl TransformManipulator {
    /// Creates a manipulator with the default configuration.
    ///
    /// Without a `mode` the mode is guessed from the op kind; a matrix op
    /// then starts in translate mode.
    ///
    /// # Errors
    ///
    /// [`ManipulatorError::Unresolvable`] when the selector matches nothing,
    /// [`ManipulatorError::IncompatibleMode`] when the op cannot be edited in
    /// `mode`.
    pub fn new<S: TransformOpStore + ?Sized>(
        store: &S,
        node: NodeId,
        selector: OpSelector<'_>,
        mode: Option<ManipMode>,
        time: TimeCode,
    ) -> ManipulatorResult<Self> {
        Self::with_config(store, node, selector, mode, time, ManipulatorConfig::default())
    }

    /// Creates a manipulator with explicit tolerances.
    pub fn with_config<S: TransformOpStore + ?Sized>(
        store: &S,
        node: NodeId,
        selector: OpSelector<'_>,
        mode: Option<ManipMode>,
        time: TimeCode,
        config: ManipulatorConfig,
    ) -> ManipulatorResult<Self> {
        let stack = store.ordered_operations(node)?;
        let index = resolve_op_index(&stack, selector, mode)?;
        let op = stack.operations[index].clone();
        let mode = match mode {
            Some(mode) => {
                check_mode(&op, mode)?;
                mode
            }
            None => ManipMode::guess(op.kind()),
        };
        let frames = Frames::compute(store, &stack, index, mode, time, config.singular_tolerance)?;
        debug!("node {node}: manipulating {} ({mode})", op.name());
        Ok(Self {
            node,
            index,
            op,
            mode,
            time,
            config,
            stack,
            frames,
        })
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    /// Re-reads the stack at `time` and recomputes every frame.
    ///
    /// With `Some(mode)` the manipulator switches to that mode first.
    pub fn update_to_time<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &S,
        time: TimeCode,
        mode: Option<ManipMode>,
    ) -> ManipulatorResult<()> {
        if let Some(mode) = mode {
            check_mode(&self.op, mode)?;
            self.mode = mode;
        }
        self.time = time;
        self.refresh(store)
    }

    /// Re-reads the stack and frames at the current time.
    ///
    /// The op is tracked by name, so it is found again if ops were inserted
    /// before it.
    fn refresh<S: TransformOpStore + ?Sized>(&mut self, store: &S) -> ManipulatorResult<()> {
        let stack = store.ordered_operations(self.node)?;
        let unchanged = stack
            .get(self.index)
            .is_some_and(|op| op.name() == self.op.name() && op.kind() == self.op.kind());
        if !unchanged {
            self.index = stack
                .iter()
                .position(|op| !op.is_inverse() && op.name() == self.op.name())
                .ok_or_else(|| {
                    ManipulatorError::Unresolvable(format!(
                        "'{}' is no longer on node {}",
                        self.op.name(),
                        self.node
                    ))
                })?;
        }
        self.op = stack.operations[self.index].clone();
        self.frames = Frames::compute(
            store,
            &stack,
            self.index,
            self.mode,
            self.time,
            self.config.singular_tolerance,
        )?;
        self.stack = stack;
        Ok(())
    }

    /// Refreshes and makes sure the op can take an edit in `mode`.
    ///
    /// A matrix op switches modes on demand; any other kind must already
    /// be in `mode`.
    fn prepare<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &S,
        mode: ManipMode,
    ) -> ManipulatorResult<()> {
        self.refresh(store)?;
        if self.op.is_inverse() {
            debug!("{} is an inverse op; edit rejected", self.op.name());
            return Err(ManipulatorError::InverseOperation {
                name: self.op.name().to_string(),
            });
        }
        if self.mode != mode {
            if self.op.kind() == OperationKind::Matrix {
                self.update_to_time(store, self.time, Some(mode))?;
            } else {
                return Err(self.incompatible(mode));
            }
        }
        Ok(())
    }

    /// Writes `value`, refreshes, and returns what changed.
    fn commit<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        value: OpValue,
    ) -> ManipulatorResult<Option<Edit>> {
        let name = self.op.name().to_string();
        let previous = store.operation_value(self.node, &name, self.time)?;
        store.set_operation_value(self.node, &name, value, self.time)?;
        let new = store
            .operation_value(self.node, &name, self.time)?
            .unwrap_or(value);
        debug!("node {}: {name} {previous:?} -> {new:?}", self.node);
        self.refresh(&*store)?;
        Ok(Some(Edit {
            node: self.node,
            op_name: name,
            kind: self.op.kind(),
            time: self.time,
            previous,
            new,
        }))
    }

    /// Current value of the op, with unset values read as identity.
    fn current_value<S: TransformOpStore + ?Sized>(&self, store: &S) -> ManipulatorResult<OpValue> {
        let value = store.operation_value(self.node, self.op.name(), self.time)?;
        Ok(self.op.resolve(value.as_ref()))
    }

    fn incompatible(&self, mode: ManipMode) -> ManipulatorError {
        debug!("{} cannot {mode}", self.op.name());
        ManipulatorError::IncompatibleMode {
            name: self.op.name().to_string(),
            kind: self.op.kind(),
            mode,
        }
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Node owning the op.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Index of the op on the stack.
    pub fn op_index(&self) -> usize {
        self.index
    }

    /// The op being edited.
    pub fn operation(&self) -> &TransformOperation {
        &self.op
    }

    /// Active mode.
    pub fn mode(&self) -> ManipMode {
        self.mode
    }

    /// Time values are read and written at.
    pub fn time(&self) -> TimeCode {
        self.time
    }

    /// Tolerances in use.
    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    /// Stack snapshot from the last refresh.
    pub fn stack(&self) -> &OpStack {
        &self.stack
    }

    // =========================================================================
    // CAPABILITIES
    // =========================================================================

    /// True when the op accepts translation edits.
    pub fn can_translate(&self) -> bool {
        !self.op.is_inverse() && ManipMode::Translate.supports(self.op.kind())
    }

    /// True when the op accepts scale edits.
    pub fn can_scale(&self) -> bool {
        !self.op.is_inverse() && ManipMode::Scale.supports(self.op.kind())
    }

    /// True when the op accepts rotation edits.
    pub fn can_rotate(&self) -> bool {
        !self.op.is_inverse() && ManipMode::Rotate.supports(self.op.kind())
    }

    /// True when the op can rotate about X.
    pub fn can_rotate_x(&self) -> bool {
        self.can_rotate_about(RotationAxis::X)
    }

    /// True when the op can rotate about Y.
    pub fn can_rotate_y(&self) -> bool {
        self.can_rotate_about(RotationAxis::Y)
    }

    /// True when the op can rotate about Z.
    pub fn can_rotate_z(&self) -> bool {
        self.can_rotate_about(RotationAxis::Z)
    }

    fn can_rotate_about(&self, axis: RotationAxis) -> bool {
        self.can_rotate()
            && self
                .op
                .kind()
                .rotation_axis()
                .map_or(true, |own| own == axis)
    }

    // =========================================================================
    // FRAMES
    // =========================================================================

    /// Frame formed by the ops before the edited one.
    pub fn coordinate_frame(&self) -> DMat4 {
        self.frames.coordinate
    }

    /// Inverse of the manipulator frame.
    pub fn inv_coordinate_frame(&self) -> DMat4 {
        self.frames.inv_manipulator
    }

    /// Ancestor world frame, identity when the node resets inheritance.
    pub fn parent_frame(&self) -> DMat4 {
        self.frames.parent
    }

    /// Parent frame composed with the manipulator frame.
    pub fn world_frame(&self) -> DMat4 {
        self.frames.world
    }

    /// Frame formed by the ops after the edited one.
    pub fn post_transform_frame(&self) -> DMat4 {
        self.frames.post
    }

    /// Inverse of the post-transform frame.
    pub fn inv_post_transform_frame(&self) -> DMat4 {
        self.frames.inv_post
    }

    /// Frame edits in transform space are expressed in.
    ///
    /// For a matrix op in rotate or scale mode this pivots about the
    /// matrix's own translation.
    pub fn manipulator_frame(&self) -> DMat4 {
        self.frames.manipulator
    }

    /// Coordinate frame including the edited op.
    pub fn manipulator_matrix(&self) -> DMat4 {
        self.frames.coordinate * self.frames.op_matrix
    }

    /// The edited op's own matrix.
    pub fn op_matrix(&self) -> DMat4 {
        self.frames.op_matrix
    }

    /// All frames from the last refresh.
    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    // =========================================================================
    // VALUES
    // =========================================================================

    /// Rotation held by the op; identity when it cannot rotate.
    ///
    /// For a matrix op this is the rotation of its orthonormalized basis.
    pub fn current_rotation<S: TransformOpStore + ?Sized>(
        &self,
        store: &S,
    ) -> ManipulatorResult<DQuat> {
        if !ManipMode::Rotate.supports(self.op.kind()) {
            return Ok(DQuat::IDENTITY);
        }
        let value = self.current_value(store)?;
        Ok(match value {
            OpValue::Matrix(m) => {
                rotation_of(&frames::linear(&m), self.config.singular_tolerance)
                    .unwrap_or(DQuat::IDENTITY)
            }
            value => self.op.rotation(Some(&value)).unwrap_or(DQuat::IDENTITY),
        })
    }

    /// Translation held by the op; zero when it cannot translate.
    pub fn current_translation<S: TransformOpStore + ?Sized>(
        &self,
        store: &S,
    ) -> ManipulatorResult<DVec3> {
        Ok(match self.current_value(store)? {
            OpValue::Matrix(m) => m.w_axis.truncate(),
            OpValue::Vec3(t) if self.op.kind() == OperationKind::Translate => t,
            _ => DVec3::ZERO,
        })
    }

    /// Scale held by the op; one when it cannot scale.
    ///
    /// For a matrix op this is the length of each basis axis.
    pub fn current_scale<S: TransformOpStore + ?Sized>(
        &self,
        store: &S,
    ) -> ManipulatorResult<DVec3> {
        Ok(match self.current_value(store)? {
            OpValue::Matrix(m) => DVec3::new(
                m.x_axis.truncate().length(),
                m.y_axis.truncate().length(),
                m.z_axis.truncate().length(),
            ),
            OpValue::Vec3(s) if self.op.kind() == OperationKind::Scale => s,
            _ => DVec3::ONE,
        })
    }
}

fn check_mode(op: &TransformOperation, mode: ManipMode) -> ManipulatorResult<()> {
    if mode.supports(op.kind()) {
        Ok(())
    } else {
        Err(ManipulatorError::IncompatibleMode {
            name: op.name().to_string(),
            kind: op.kind(),
            mode,
        })
    }
}

#[cfg(test)]
mod tests;
