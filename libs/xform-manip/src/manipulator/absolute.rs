//! Absolute edits.
//!
//! Each setter reads the op's current value, turns the target into the delta
//! that reaches it, and hands that delta to the matching relative edit. The
//! relative edit's rules (tolerances, shear checks, single-axis checks) all
//! still apply.

use glam::{DMat4, DQuat, DVec3};
use log::debug;

use xform_ops::maths::{normalize_quat, rotation_of};
use xform_ops::{OperationKind, TransformOpStore};

use super::frames::linear;
use super::TransformManipulator;
use crate::edit::Edit;
use crate::error::ManipulatorResult;
use crate::mode::{ManipMode, Space};

impl TransformManipulator {
    /// Moves the op so its translation lands on `position` in `space`.
    ///
    /// | space         | `position` is                                       |
    /// |---------------|-----------------------------------------------------|
    /// | transform     | the op's own value                                  |
    /// | parent        | the translated point in the node's parent space     |
    /// | world         | the translated point in world space                 |
    /// | post-transform| the value mapped back through the following ops     |
    ///
    /// # Examples
    /// ```
    /// use glam::DVec3;
    /// use xform_manip::{OpSelector, Space, TransformManipulator};
    /// use xform_ops::{InMemoryOpStore, OpValue, OperationKind, Precision, TimeCode,
    ///     TransformOperation};
    ///
    /// let mut store = InMemoryOpStore::default();
    /// let node = store.add_node(None).unwrap();
    /// let op = TransformOperation::new(OperationKind::Translate, Precision::Double, None);
    /// store.push_operation(node, op.clone()).unwrap();
    /// store.author(node, op.name(), OpValue::Vec3(DVec3::ONE), TimeCode::Default).unwrap();
    ///
    /// let mut manip =
    ///     TransformManipulator::new(&store, node, OpSelector::Index(0), None, TimeCode::Default)
    ///         .unwrap();
    /// let target = DVec3::new(4.0, 0.0, 2.0);
    /// let edit = manip.set_translation(&mut store, target, Space::Transform).unwrap();
    /// assert_eq!(edit.unwrap().new, OpValue::Vec3(DVec3::new(4.0, 0.0, 2.0)));
    /// ```
    pub fn set_translation<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        position: DVec3,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.prepare(&*store, ManipMode::Translate)?;
        let current = self.current_translation(&*store)?;
        let from = match space {
            Space::Transform => current,
            Space::Parent => self.frames.manipulator.transform_point3(current),
            Space::World => self.frames.world.transform_point3(current),
            Space::PostTransform => self.frames.inv_post.transform_vector3(current),
        };
        self.translate(store, position - from, space)
    }

    /// Rotates the op so its orientation in `space` becomes `orientation`.
    ///
    /// In transform space the target is the op's own rotation; in parent and
    /// world space it is that rotation composed with the rotation of the
    /// parent or world frame; in post-transform space it is the op's rotation
    /// followed by the rotation of the ops after it. A singular frame leaves
    /// the op alone and returns `Ok(None)`.
    pub fn set_rotation<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        orientation: DQuat,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.prepare(&*store, ManipMode::Rotate)?;
        let target = normalize_quat(orientation);
        let current = self.current_rotation(&*store)?;
        let singular = self.config.singular_tolerance;
        let rotation = |frame: &DMat4| rotation_of(&linear(frame), singular);

        let delta = match space {
            Space::Transform if self.op.kind() == OperationKind::Matrix => {
                Some(target * current.conjugate())
            }
            Space::Transform => Some(current.conjugate() * target),
            Space::Parent => {
                rotation(&self.frames.manipulator).map(|c| target * (c * current).conjugate())
            }
            Space::World => {
                rotation(&self.frames.world).map(|w| target * (w * current).conjugate())
            }
            Space::PostTransform => {
                rotation(&self.frames.post).map(|p| (current * p).conjugate() * target)
            }
        };
        match delta {
            Some(delta) => self.rotate(store, delta, space),
            None => {
                debug!("{}: {space} frame is singular; orientation ignored", self.op.name());
                Ok(None)
            }
        }
    }

    /// Scales the op so its per-axis factors become `scale`.
    ///
    /// `space` only decides whether a non-uniform change is accepted, exactly
    /// as for [`scale`](Self::scale). An axis whose current factor is zero
    /// cannot be reached by multiplying and is left unchanged.
    pub fn set_scale<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        scale: DVec3,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.prepare(&*store, ManipMode::Scale)?;
        let current = self.current_scale(&*store)?;
        let ratio = |target: f64, current: f64| {
            if current == 0.0 {
                debug!("{}: zero scale axis left unchanged", self.op.name());
                1.0
            } else {
                target / current
            }
        };
        let delta = DVec3::new(
            ratio(scale.x, current.x),
            ratio(scale.y, current.y),
            ratio(scale.z, current.z),
        );
        self.scale(store, delta, space)
    }
}
