//! Scale edits.
//!
//! A scale op stores a per-axis factor, so only scales along the op's own
//! axes are representable. A non-uniform delta in another space is accepted
//! only when that space's axes line up with the op's.

use glam::{DVec3, DVec4};
use log::debug;

use xform_ops::maths::is_axis_aligned;
use xform_ops::{OpValue, OperationKind, TransformOpStore};

use super::frames::linear;
use super::TransformManipulator;
use crate::edit::Edit;
use crate::error::{ManipulatorError, ManipulatorResult};
use crate::mode::{ManipMode, Space};

impl TransformManipulator {
    /// Multiplies the op's scale by `delta` expressed in `space`.
    ///
    /// # Errors
    ///
    /// [`ManipulatorError::NonUniformScale`] when a non-uniform delta would
    /// need shear in `space`. A delta within tolerance of one returns
    /// `Ok(None)`.
    pub fn scale<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        delta: DVec3,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.prepare(&*store, ManipMode::Scale)?;

        if !self.is_uniform(delta) && !self.allows_non_uniform(space) {
            debug!("{}: non-uniform {delta} rejected in {space} space", self.op.name());
            return Err(ManipulatorError::NonUniformScale { space });
        }
        if (delta - DVec3::ONE).abs().max_element() <= self.config.tolerance {
            return Ok(None);
        }

        let value = match self.current_value(&*store)? {
            OpValue::Matrix(mut m) => {
                m.x_axis *= axis_mask(delta.x);
                m.y_axis *= axis_mask(delta.y);
                m.z_axis *= axis_mask(delta.z);
                OpValue::Matrix(m)
            }
            current => OpValue::Vec3(current.as_vec3().unwrap_or(DVec3::ONE) * delta),
        };
        self.commit(store, value)
    }

    fn is_uniform(&self, delta: DVec3) -> bool {
        delta.max_element() - delta.min_element() <= self.config.uniform_tolerance
    }

    fn allows_non_uniform(&self, space: Space) -> bool {
        match space {
            Space::Transform => true,
            Space::PostTransform => self.stack.operations[self.index + 1..]
                .iter()
                .all(|op| matches!(op.kind(), OperationKind::Translate | OperationKind::Scale)),
            Space::Parent => {
                is_axis_aligned(&linear(&self.frames.manipulator), self.config.alignment_tolerance)
            }
            Space::World => {
                is_axis_aligned(&linear(&self.frames.world), self.config.alignment_tolerance)
            }
        }
    }
}

/// Scales the basis part of a column, leaving its fourth row alone.
fn axis_mask(factor: f64) -> DVec4 {
    DVec4::new(factor, factor, factor, 1.0)
}
