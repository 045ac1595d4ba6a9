//! Translation edits.

use glam::DVec3;

use xform_ops::{OpValue, TransformOpStore};

use super::frames::linear;
use super::TransformManipulator;
use crate::edit::Edit;
use crate::error::ManipulatorResult;
use crate::mode::{ManipMode, Space};

impl TransformManipulator {
    /// Moves the op by `delta` expressed in `space`.
    ///
    /// Deltas that map to nothing larger than the tolerance are ignored and
    /// return `Ok(None)`; a collapsed frame maps its missing axes to zero.
    pub fn translate<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        delta: DVec3,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.prepare(&*store, ManipMode::Translate)?;

        let local = match space {
            Space::Transform => delta,
            Space::Parent => linear(&self.frames.inv_manipulator) * delta,
            Space::World => linear(&self.frames.inv_world) * delta,
            Space::PostTransform => linear(&self.frames.post) * delta,
        };
        if local.abs().max_element() <= self.config.tolerance {
            return Ok(None);
        }

        let value = match self.current_value(&*store)? {
            OpValue::Matrix(mut m) => {
                m.w_axis += local.extend(0.0);
                OpValue::Matrix(m)
            }
            current => OpValue::Vec3(current.as_vec3().unwrap_or(DVec3::ZERO) + local),
        };
        self.commit(store, value)
    }
}
