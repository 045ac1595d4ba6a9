//! # Rotation and Basis Maths
//!
//! Euler composition and extraction for the six rotation orders, quaternion
//! helpers, and the degenerate-safe basis utilities used by the evaluator and
//! manipulator.
//!
//! Matrices are `glam` column-major. When describing an element as
//! `mat[i][j]` below, `i` is the basis vector (column) and `j` its component,
//! i.e. `mat[i][j] == m.col(i)[j]`.

use std::f64::consts::FRAC_PI_2;

use glam::{DMat3, DMat4, DQuat, DVec3, DVec4};
use log::warn;

use config::constants::GIMBAL_EPSILON;

use crate::op::{RotationAxis, RotationOrder};

// =============================================================================
// EULER ANGLES
// =============================================================================

/// Quaternion for a three-axis rotation given in degrees, `(x, y, z)`.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use xform_ops::{maths, RotationOrder};
/// let q = maths::euler_to_quat(RotationOrder::XYZ, DVec3::new(90.0, 0.0, 0.0));
/// assert!((q * DVec3::Y - DVec3::Z).length() < 1e-12);
/// ```
pub fn euler_to_quat(order: RotationOrder, degrees: DVec3) -> DQuat {
    let [a, b, c] = order.axes();
    c.quat(degrees[c.index()].to_radians())
        * b.quat(degrees[b.index()].to_radians())
        * a.quat(degrees[a.index()].to_radians())
}

/// Rotation matrix for a three-axis rotation given in degrees, `(x, y, z)`.
pub fn euler_to_matrix(order: RotationOrder, degrees: DVec3) -> DMat3 {
    let [a, b, c] = order.axes();
    c.matrix(degrees[c.index()].to_radians())
        * b.matrix(degrees[b.index()].to_radians())
        * a.matrix(degrees[a.index()].to_radians())
}

/// Layout of an order inside the shared extraction formula.
struct EulerLayout {
    row: usize,
    col: usize,
    col_cos: usize,
    col_sin: usize,
    row_sin: usize,
    row_cos: usize,
    sign: f64,
}

impl EulerLayout {
    fn new(order: RotationOrder) -> Self {
        const MOD3: [usize; 6] = [0, 1, 2, 0, 1, 2];
        // cyclic orders first, then the anti-cyclic ones
        let code = match order {
            RotationOrder::XYZ => 0,
            RotationOrder::YZX => 1,
            RotationOrder::ZXY => 2,
            RotationOrder::XZY => 3,
            RotationOrder::YXZ => 4,
            RotationOrder::ZYX => 5,
        };
        let k1 = if code > 2 { 2 } else { 1 };
        let k2 = 3 - k1;
        let row = MOD3[code];
        let col = MOD3[k2 + row];
        Self {
            row,
            col,
            col_cos: MOD3[col + k1],
            col_sin: MOD3[col + k2],
            row_sin: MOD3[row + k1],
            row_cos: MOD3[row + k2],
            sign: if code < 3 { -1.0 } else { 1.0 },
        }
    }
}

/// Extracts `(x, y, z)` Euler angles in degrees for `order` from a rotation matrix.
///
/// The matrix is not orthonormalized first; callers passing a sheared basis
/// get the same approximation the angles would reproduce. When the middle
/// axis is at ±90° the last axis is set to zero.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use xform_ops::{maths, RotationOrder};
/// let angles = DVec3::new(10.0, 20.0, 30.0);
/// let m = maths::euler_to_matrix(RotationOrder::ZXY, angles);
/// let back = maths::matrix_to_euler(RotationOrder::ZXY, &m);
/// assert!((back - angles).length() < 1e-9);
/// ```
pub fn matrix_to_euler(order: RotationOrder, m: &DMat3) -> DVec3 {
    let l = EulerLayout::new(order);
    let at = |i: usize, j: usize| m.col(i)[j];
    let s = l.sign;
    let mut rot = [0.0f64; 3];

    let pivot = at(l.row, l.col);
    if (pivot - 1.0).abs() < GIMBAL_EPSILON {
        rot[l.row] = (s * at(l.row_sin, l.col_cos)).atan2(at(l.row_sin, l.col_sin));
        rot[l.row_sin] = s * FRAC_PI_2;
        rot[l.row_cos] = 0.0;
    } else if (pivot + 1.0).abs() < GIMBAL_EPSILON {
        rot[l.row] = (-s * at(l.row_sin, l.col_cos)).atan2(at(l.row_sin, l.col_sin));
        rot[l.row_sin] = -s * FRAC_PI_2;
        rot[l.row_cos] = 0.0;
    } else {
        rot[l.row] = (-s * at(l.row_sin, l.col)).atan2(at(l.row_cos, l.col));
        rot[l.row_sin] = (s * pivot).clamp(-1.0, 1.0).asin();
        rot[l.row_cos] = (-s * at(l.row, l.col_sin)).atan2(at(l.row, l.col_cos));
    }
    DVec3::new(rot[0].to_degrees(), rot[1].to_degrees(), rot[2].to_degrees())
}

// =============================================================================
// QUATERNIONS
// =============================================================================

/// Normalizes a quaternion, mapping degenerate input to the identity.
pub fn normalize_quat(q: DQuat) -> DQuat {
    let len = q.length();
    if len.is_finite() && len > 0.0 {
        q / len
    } else {
        DQuat::IDENTITY
    }
}

/// True when every component is within `epsilon` of the identity quaternion.
pub fn is_identity_quat(q: DQuat, epsilon: f64) -> bool {
    q.x.abs() <= epsilon
        && q.y.abs() <= epsilon
        && q.z.abs() <= epsilon
        && (q.w - 1.0).abs() <= epsilon
}

/// Splits a rotation into its angle about `axis` (degrees) and the magnitude
/// of the components that rotate about any other axis.
///
/// # Examples
/// ```
/// use xform_ops::{maths, RotationAxis};
/// let q = RotationAxis::Y.quat(190f64.to_radians());
/// let (angle, off_axis) = maths::twist_degrees(q, RotationAxis::Y);
/// assert!((angle - 190.0).abs() < 1e-9);
/// assert!(off_axis < 1e-12);
/// ```
pub fn twist_degrees(q: DQuat, axis: RotationAxis) -> (f64, f64) {
    let q = normalize_quat(q);
    let v = q.xyz();
    let along = v[axis.index()];
    let off_axis = (v - axis.unit() * along).length();
    (2.0 * along.atan2(q.w).to_degrees(), off_axis)
}

// =============================================================================
// BASES
// =============================================================================

/// Pure rotation of a basis, found by Gram-Schmidt on its X and Y axes.
///
/// Returns `None` when the basis is singular.
pub fn rotation_of(m: &DMat3, singular_epsilon: f64) -> Option<DQuat> {
    if !(m.determinant().abs() > singular_epsilon) {
        return None;
    }
    let x = m.x_axis.normalize();
    let y = (m.y_axis - x * x.dot(m.y_axis)).normalize();
    let z = x.cross(y);
    Some(normalize_quat(DQuat::from_mat3(&DMat3::from_cols(x, y, z))))
}

/// Inverse of a basis, or `None` when it is singular.
pub fn try_inverse(m: &DMat3, singular_epsilon: f64) -> Option<DMat3> {
    (m.determinant().abs() > singular_epsilon).then(|| m.inverse())
}

/// Minimum-norm inverse of a basis, degrading gracefully when it is singular.
///
/// A singular basis is factored as `Q·R` over an orthonormal basis `Q` of its
/// column space, and the Moore-Penrose inverse `Rᵀ(R·Rᵀ)⁻¹·Qᵀ` is returned. A
/// vector mapped through the result loses only its components outside the
/// column space, and mapping back reproduces its projection onto it.
///
/// # Examples
/// ```
/// use glam::{DMat3, DVec3};
/// use xform_ops::maths;
/// let collapsed = DMat3::from_diagonal(DVec3::new(2.0, 0.0, 4.0));
/// let inv = maths::pseudo_inverse(&collapsed, 1e-12);
/// assert_eq!(inv * DVec3::new(2.0, 5.0, 4.0), DVec3::new(1.0, 0.0, 1.0));
/// ```
pub fn pseudo_inverse(m: &DMat3, singular_epsilon: f64) -> DMat3 {
    if let Some(inverse) = try_inverse(m, singular_epsilon) {
        return inverse;
    }
    warn!("singular basis (det = {:e}); using its pseudo-inverse", m.determinant());

    let mut basis: Vec<DVec3> = Vec::with_capacity(3);
    for column in [m.x_axis, m.y_axis, m.z_axis] {
        let residual = basis.iter().fold(column, |c, q| c - *q * q.dot(c));
        if residual.length_squared() > singular_epsilon {
            basis.push(residual.normalize());
        }
    }
    // rows of R = Qᵀ·M, stored as vectors
    let rows: Vec<DVec3> = basis.iter().map(|q| m.transpose() * *q).collect();
    let outer = |a: DVec3, b: DVec3| DMat3::from_cols(a * b.x, a * b.y, a * b.z);

    match (basis.as_slice(), rows.as_slice()) {
        ([q], [r]) => outer(*r, *q) * r.length_squared().recip(),
        ([q1, q2], [r1, r2]) => {
            let (g11, g12, g22) = (r1.dot(*r1), r1.dot(*r2), r2.dot(*r2));
            let det = g11 * g22 - g12 * g12;
            (outer(*r1, *q1) * g22 - outer(*r1, *q2) * g12 - outer(*r2, *q1) * g12
                + outer(*r2, *q2) * g11)
                * det.recip()
        }
        ([_, _, _], _) => m.inverse(),
        _ => DMat3::ZERO,
    }
}

/// Inverse of an affine 4x4 matrix using [`pseudo_inverse`] for its basis
/// when the matrix is singular.
pub fn affine_pseudo_inverse(m: DMat4, singular_epsilon: f64) -> DMat4 {
    if m.determinant().abs() > singular_epsilon {
        return m.inverse();
    }
    let basis = pseudo_inverse(&DMat3::from_mat4(m), singular_epsilon);
    let t = -(basis * m.w_axis.truncate());
    DMat4::from_cols(
        basis.x_axis.extend(0.0),
        basis.y_axis.extend(0.0),
        basis.z_axis.extend(0.0),
        t.extend(1.0),
    )
}

/// Negates the Z axis of a left-handed basis.
pub fn ensure_right_handed(m: DMat3) -> DMat3 {
    if m.x_axis.cross(m.y_axis).dot(m.z_axis) < 0.0 {
        DMat3::from_cols(m.x_axis, m.y_axis, -m.z_axis)
    } else {
        m
    }
}

/// True when a basis has no rotation or shear, i.e. it is diagonal.
pub fn is_axis_aligned(m: &DMat3, epsilon: f64) -> bool {
    let scale = m
        .x_axis
        .length()
        .max(m.y_axis.length())
        .max(m.z_axis.length())
        .max(1.0);
    let tolerance = epsilon * scale;
    [m.x_axis.y, m.x_axis.z, m.y_axis.x, m.y_axis.z, m.z_axis.x, m.z_axis.y]
        .iter()
        .all(|v| v.abs() <= tolerance)
}

/// Normalizes the first three axes of a matrix, keeping its translation.
pub fn normalize_axes(m: DMat4) -> DMat4 {
    let unit = |c: DVec4| {
        let len = c.truncate().length();
        if len > 0.0 {
            (c.truncate() / len).extend(c.w)
        } else {
            c
        }
    };
    DMat4::from_cols(unit(m.x_axis), unit(m.y_axis), unit(m.z_axis), m.w_axis)
}

/// Replaces the basis of a 4x4 matrix, keeping its translation and fourth row.
pub fn with_basis(m: DMat4, basis: DMat3) -> DMat4 {
    DMat4::from_cols(
        basis.x_axis.extend(m.x_axis.w),
        basis.y_axis.extend(m.y_axis.w),
        basis.z_axis.extend(m.z_axis.w),
        m.w_axis,
    )
}
