//! Rotation edits.
//!
//! Multi-axis and matrix ops are solved with full linear frames so any
//! scale in those frames is carried into the result. Single-axis and orient
//! ops only ever hold a pure rotation and are solved with the rotation
//! quaternions of the frames.

use glam::{DMat3, DMat4, DQuat};
use log::debug;

use xform_ops::maths::{
    ensure_right_handed, euler_to_matrix, is_identity_quat, matrix_to_euler, normalize_quat,
    rotation_of, try_inverse, twist_degrees, with_basis,
};
use xform_ops::{OpValue, RotationAxis, TransformOpStore};

use super::frames::linear;
use super::TransformManipulator;
use crate::edit::Edit;
use crate::error::{ManipulatorError, ManipulatorResult};
use crate::mode::{ManipMode, Space};

impl TransformManipulator {
    /// Rotates the op by `delta` expressed in `space`.
    ///
    /// Returns `Ok(None)` for an identity delta, and when the frame the
    /// delta must be conjugated through is singular.
    ///
    /// # Errors
    ///
    /// [`ManipulatorError::AxisMismatch`] when a single-axis op would need
    /// a rotation about another axis.
    pub fn rotate<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        delta: DQuat,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.prepare(&*store, ManipMode::Rotate)?;
        let tolerance = self.config.tolerance;
        if is_identity_quat(delta, tolerance) || is_identity_quat(-delta, tolerance) {
            return Ok(None);
        }
        let delta = normalize_quat(delta);

        let value = match self.current_value(&*store)? {
            OpValue::Matrix(m) => match self.rotate_basis(linear(&m), delta, space) {
                Some(basis) => OpValue::Matrix(with_basis(m, basis)),
                None => return self.skip_singular(space),
            },
            current => match self.op.kind().rotation_order() {
                Some(order) => {
                    let angles = current.as_vec3().unwrap_or_default();
                    let Some(basis) =
                        self.rotate_basis(euler_to_matrix(order, angles), delta, space)
                    else {
                        return self.skip_singular(space);
                    };
                    OpValue::Vec3(matrix_to_euler(order, &ensure_right_handed(basis)))
                }
                None => {
                    let current_q = self.op.rotation(Some(&current)).unwrap_or(DQuat::IDENTITY);
                    let Some(q) = self.rotate_quat(current_q, delta, space) else {
                        return self.skip_singular(space);
                    };
                    match self.op.kind().rotation_axis() {
                        Some(axis) => {
                            let degrees = current.as_scalar().unwrap_or(0.0);
                            OpValue::Scalar(self.single_axis_angle(axis, degrees, q)?)
                        }
                        None => OpValue::Quat(q),
                    }
                }
            },
        };
        self.commit(store, value)
    }

    /// Rotates about X by `radians` expressed in `space`.
    ///
    /// In transform space an X op, or a multi-axis op whose order starts
    /// with X, simply has the angle added.
    pub fn rotate_x<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        radians: f64,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.rotate_about(store, RotationAxis::X, radians, space)
    }

    /// Rotates about Y by `radians` expressed in `space`.
    pub fn rotate_y<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        radians: f64,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.rotate_about(store, RotationAxis::Y, radians, space)
    }

    /// Rotates about Z by `radians` expressed in `space`.
    pub fn rotate_z<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        radians: f64,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        self.rotate_about(store, RotationAxis::Z, radians, space)
    }

    fn rotate_about<S: TransformOpStore + ?Sized>(
        &mut self,
        store: &mut S,
        axis: RotationAxis,
        radians: f64,
        space: Space,
    ) -> ManipulatorResult<Option<Edit>> {
        if radians.abs() <= self.config.tolerance {
            return Ok(None);
        }
        if space == Space::Transform {
            self.prepare(&*store, ManipMode::Rotate)?;
            let kind = self.op.kind();
            let degrees = radians.to_degrees();
            if let Some(own) = kind.rotation_axis() {
                if own != axis {
                    return Err(self.axis_mismatch(own));
                }
                let current = self.current_value(&*store)?.as_scalar().unwrap_or(0.0);
                return self.commit(store, OpValue::Scalar(current + degrees));
            }
            if kind.rotation_order().is_some_and(|order| order.first() == axis) {
                let mut angles = self.current_value(&*store)?.as_vec3().unwrap_or_default();
                angles[axis.index()] += degrees;
                return self.commit(store, OpValue::Vec3(angles));
            }
        }
        self.rotate(store, axis.quat(radians), space)
    }

    /// New linear part for a rotation applied to `basis`.
    fn rotate_basis(&self, basis: DMat3, delta: DQuat, space: Space) -> Option<DMat3> {
        let d = DMat3::from_quat(delta);
        let conjugate = |frame: &DMat4| {
            let f = linear(frame);
            try_inverse(&f, self.config.singular_tolerance).map(|inv| inv * d * f)
        };
        match space {
            Space::Transform => Some(match self.op.kind().rotation_order() {
                Some(_) => basis * d,
                None => d * basis,
            }),
            Space::Parent => conjugate(&self.frames.manipulator).map(|c| c * basis),
            Space::World => conjugate(&self.frames.world).map(|w| w * basis),
            Space::PostTransform => {
                let p = linear(&self.frames.post);
                try_inverse(&p, self.config.singular_tolerance).map(|inv| basis * p * d * inv)
            }
        }
    }

    /// New rotation for a single-axis or orient op holding `current`.
    fn rotate_quat(&self, current: DQuat, delta: DQuat, space: Space) -> Option<DQuat> {
        let rotation = |frame: &DMat4| rotation_of(&linear(frame), self.config.singular_tolerance);
        let q = match space {
            Space::Transform => current * delta,
            Space::Parent => {
                let c = rotation(&self.frames.manipulator)?;
                c.conjugate() * delta * c * current
            }
            Space::World => {
                let w = rotation(&self.frames.world)?;
                w.conjugate() * delta * w * current
            }
            Space::PostTransform => {
                let p = rotation(&self.frames.post)?;
                current * p * delta * p.conjugate()
            }
        };
        Some(normalize_quat(q))
    }

    /// Angle about `axis` for `q`, kept next to `current` degrees so
    /// repeated edits keep winding past ±180.
    fn single_axis_angle(
        &self,
        axis: RotationAxis,
        current: f64,
        q: DQuat,
    ) -> ManipulatorResult<f64> {
        let (angle, off_axis) = twist_degrees(q, axis);
        if off_axis > self.config.twist_tolerance {
            return Err(self.axis_mismatch(axis));
        }
        let step = (angle - current + 180.0).rem_euclid(360.0) - 180.0;
        Ok(current + step)
    }

    fn axis_mismatch(&self, axis: RotationAxis) -> ManipulatorError {
        debug!("{} only rotates about {axis}", self.op.name());
        ManipulatorError::AxisMismatch {
            name: self.op.name().to_string(),
            axis,
        }
    }

    fn skip_singular(&self, space: Space) -> ManipulatorResult<Option<Edit>> {
        debug!("{}: {space} frame is singular; rotation ignored", self.op.name());
        Ok(None)
    }
}
