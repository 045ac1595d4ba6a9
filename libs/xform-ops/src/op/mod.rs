//! # Transform Operations
//!
//! One entry in a node's ordered transform stack: its kind, storage
//! precision, inverse flag and the name that locates its value in the store.
//!
//! ## Kinds
//!
//! - `Translate`, `Scale` - vector3 values
//! - `RotateX/Y/Z` - scalar angle in degrees
//! - `RotateXYZ` … `RotateZYX` - vector3 of angles in degrees
//! - `Orient` - quaternion
//! - `Matrix` - 4x4 matrix, always double precision

use std::fmt;

use glam::{DMat3, DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::maths;
use crate::precision::Precision;

/// Prefix shared by every operation name.
pub const OP_NAME_PREFIX: &str = "xformOp";

// =============================================================================
// ROTATION AXES AND ORDERS
// =============================================================================

/// A principal rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    /// The X axis
    X,
    /// The Y axis
    Y,
    /// The Z axis
    Z,
}

impl RotationAxis {
    /// Component index of this axis in a vector3.
    pub fn index(self) -> usize {
        match self {
            RotationAxis::X => 0,
            RotationAxis::Y => 1,
            RotationAxis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> DVec3 {
        match self {
            RotationAxis::X => DVec3::X,
            RotationAxis::Y => DVec3::Y,
            RotationAxis::Z => DVec3::Z,
        }
    }

    /// Rotation about this axis by `radians`.
    ///
    /// # Examples
    /// ```
    /// use xform_ops::RotationAxis;
    /// let q = RotationAxis::Z.quat(std::f64::consts::FRAC_PI_2);
    /// let v = q * glam::DVec3::X;
    /// assert!((v - glam::DVec3::Y).length() < 1e-12);
    /// ```
    pub fn quat(self, radians: f64) -> DQuat {
        match self {
            RotationAxis::X => DQuat::from_rotation_x(radians),
            RotationAxis::Y => DQuat::from_rotation_y(radians),
            RotationAxis::Z => DQuat::from_rotation_z(radians),
        }
    }

    /// Rotation matrix about this axis by `radians`.
    pub fn matrix(self, radians: f64) -> DMat3 {
        match self {
            RotationAxis::X => DMat3::from_rotation_x(radians),
            RotationAxis::Y => DMat3::from_rotation_y(radians),
            RotationAxis::Z => DMat3::from_rotation_z(radians),
        }
    }
}

impl fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationAxis::X => "X",
            RotationAxis::Y => "Y",
            RotationAxis::Z => "Z",
        };
        f.write_str(name)
    }
}

/// Order in which a three-axis rotation applies its axes.
///
/// For `XYZ` the X rotation is applied to points first, then Y, then Z, so
/// the combined matrix is `Rz · Ry · Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationOrder {
    /// X, then Y, then Z
    XYZ,
    /// X, then Z, then Y
    XZY,
    /// Y, then X, then Z
    YXZ,
    /// Y, then Z, then X
    YZX,
    /// Z, then X, then Y
    ZXY,
    /// Z, then Y, then X
    ZYX,
}

impl RotationOrder {
    /// All six orders.
    pub const ALL: [RotationOrder; 6] = [
        RotationOrder::XYZ,
        RotationOrder::XZY,
        RotationOrder::YXZ,
        RotationOrder::YZX,
        RotationOrder::ZXY,
        RotationOrder::ZYX,
    ];

    /// Axes in application order.
    pub fn axes(self) -> [RotationAxis; 3] {
        use RotationAxis::{X, Y, Z};
        match self {
            RotationOrder::XYZ => [X, Y, Z],
            RotationOrder::XZY => [X, Z, Y],
            RotationOrder::YXZ => [Y, X, Z],
            RotationOrder::YZX => [Y, Z, X],
            RotationOrder::ZXY => [Z, X, Y],
            RotationOrder::ZYX => [Z, Y, X],
        }
    }

    /// The axis applied first. Edits to this axis never disturb the others.
    pub fn first(self) -> RotationAxis {
        self.axes()[0]
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// Shape of the value an operation kind stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueShape {
    /// A single angle
    Scalar,
    /// Three components
    Vec3,
    /// A quaternion
    Quat,
    /// A 4x4 matrix
    Matrix,
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueShape::Scalar => "scalar",
            ValueShape::Vec3 => "vec3",
            ValueShape::Quat => "quat",
            ValueShape::Matrix => "matrix",
        };
        f.write_str(name)
    }
}

/// A typed operation value as read from or written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OpValue {
    /// Single-axis rotation angle in degrees
    Scalar(f64),
    /// Translation, scale or three-axis rotation in degrees
    Vec3(DVec3),
    /// Orientation quaternion
    Quat(DQuat),
    /// Full 4x4 matrix
    Matrix(DMat4),
}

impl OpValue {
    /// Shape of this value.
    pub fn shape(&self) -> ValueShape {
        match self {
            OpValue::Scalar(_) => ValueShape::Scalar,
            OpValue::Vec3(_) => ValueShape::Vec3,
            OpValue::Quat(_) => ValueShape::Quat,
            OpValue::Matrix(_) => ValueShape::Matrix,
        }
    }

    /// Returns the scalar payload, if any.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            OpValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the vector3 payload, if any.
    pub fn as_vec3(&self) -> Option<DVec3> {
        match self {
            OpValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the quaternion payload, if any.
    pub fn as_quat(&self) -> Option<DQuat> {
        match self {
            OpValue::Quat(q) => Some(*q),
            _ => None,
        }
    }

    /// Returns the matrix payload, if any.
    pub fn as_matrix(&self) -> Option<DMat4> {
        match self {
            OpValue::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    /// Truncates every component to the given storage precision.
    ///
    /// # Examples
    /// ```
    /// use xform_ops::{OpValue, Precision};
    /// let v = OpValue::Scalar(0.1).quantized(Precision::Float);
    /// assert_eq!(v, OpValue::Scalar(0.1f32 as f64));
    /// ```
    pub fn quantized(self, precision: Precision) -> Self {
        match self {
            OpValue::Scalar(v) => OpValue::Scalar(precision.quantize(v)),
            OpValue::Vec3(v) => OpValue::Vec3(precision.quantize_vec3(v)),
            OpValue::Quat(q) => {
                let v = precision.quantize_vec4(glam::DVec4::from(q));
                OpValue::Quat(DQuat::from_vec4(v))
            }
            // matrices are always stored in double precision
            OpValue::Matrix(m) => OpValue::Matrix(m),
        }
    }
}

// =============================================================================
// OPERATION KIND
// =============================================================================

/// Semantic kind of a transform operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Translation by a vector3
    Translate,
    /// Non-uniform scale by a vector3
    Scale,
    /// Rotation about X in degrees
    RotateX,
    /// Rotation about Y in degrees
    RotateY,
    /// Rotation about Z in degrees
    RotateZ,
    /// Three-axis rotation, X applied first
    RotateXYZ,
    /// Three-axis rotation, X then Z then Y
    RotateXZY,
    /// Three-axis rotation, Y then X then Z
    RotateYXZ,
    /// Three-axis rotation, Y then Z then X
    RotateYZX,
    /// Three-axis rotation, Z then X then Y
    RotateZXY,
    /// Three-axis rotation, Z then Y then X
    RotateZYX,
    /// Rotation by quaternion
    Orient,
    /// Arbitrary 4x4 matrix
    Matrix,
}

impl OperationKind {
    /// Every kind, in declaration order.
    pub const ALL: [OperationKind; 13] = [
        OperationKind::Translate,
        OperationKind::Scale,
        OperationKind::RotateX,
        OperationKind::RotateY,
        OperationKind::RotateZ,
        OperationKind::RotateXYZ,
        OperationKind::RotateXZY,
        OperationKind::RotateYXZ,
        OperationKind::RotateYZX,
        OperationKind::RotateZXY,
        OperationKind::RotateZYX,
        OperationKind::Orient,
        OperationKind::Matrix,
    ];

    /// Token used in operation names, e.g. `rotateXYZ`.
    pub fn token(self) -> &'static str {
        match self {
            OperationKind::Translate => "translate",
            OperationKind::Scale => "scale",
            OperationKind::RotateX => "rotateX",
            OperationKind::RotateY => "rotateY",
            OperationKind::RotateZ => "rotateZ",
            OperationKind::RotateXYZ => "rotateXYZ",
            OperationKind::RotateXZY => "rotateXZY",
            OperationKind::RotateYXZ => "rotateYXZ",
            OperationKind::RotateYZX => "rotateYZX",
            OperationKind::RotateZXY => "rotateZXY",
            OperationKind::RotateZYX => "rotateZYX",
            OperationKind::Orient => "orient",
            OperationKind::Matrix => "transform",
        }
    }

    /// Shape of the value this kind stores.
    pub fn value_shape(self) -> ValueShape {
        match self {
            OperationKind::RotateX | OperationKind::RotateY | OperationKind::RotateZ => {
                ValueShape::Scalar
            }
            OperationKind::Orient => ValueShape::Quat,
            OperationKind::Matrix => ValueShape::Matrix,
            _ => ValueShape::Vec3,
        }
    }

    /// The value that leaves the frame unchanged. Unauthored values read as this.
    ///
    /// # Examples
    /// ```
    /// use glam::DVec3;
    /// use xform_ops::{OpValue, OperationKind};
    /// assert_eq!(OperationKind::Scale.identity_value(), OpValue::Vec3(DVec3::ONE));
    /// ```
    pub fn identity_value(self) -> OpValue {
        match self {
            OperationKind::Scale => OpValue::Vec3(DVec3::ONE),
            OperationKind::Orient => OpValue::Quat(DQuat::IDENTITY),
            OperationKind::Matrix => OpValue::Matrix(DMat4::IDENTITY),
            kind => match kind.value_shape() {
                ValueShape::Scalar => OpValue::Scalar(0.0),
                _ => OpValue::Vec3(DVec3::ZERO),
            },
        }
    }

    /// Axis of a single-axis rotation kind.
    pub fn rotation_axis(self) -> Option<RotationAxis> {
        match self {
            OperationKind::RotateX => Some(RotationAxis::X),
            OperationKind::RotateY => Some(RotationAxis::Y),
            OperationKind::RotateZ => Some(RotationAxis::Z),
            _ => None,
        }
    }

    /// Order of a three-axis rotation kind.
    pub fn rotation_order(self) -> Option<RotationOrder> {
        match self {
            OperationKind::RotateXYZ => Some(RotationOrder::XYZ),
            OperationKind::RotateXZY => Some(RotationOrder::XZY),
            OperationKind::RotateYXZ => Some(RotationOrder::YXZ),
            OperationKind::RotateYZX => Some(RotationOrder::YZX),
            OperationKind::RotateZXY => Some(RotationOrder::ZXY),
            OperationKind::RotateZYX => Some(RotationOrder::ZYX),
            _ => None,
        }
    }

    /// The three-axis rotation kind for an order.
    pub fn from_order(order: RotationOrder) -> Self {
        match order {
            RotationOrder::XYZ => OperationKind::RotateXYZ,
            RotationOrder::XZY => OperationKind::RotateXZY,
            RotationOrder::YXZ => OperationKind::RotateYXZ,
            RotationOrder::YZX => OperationKind::RotateYZX,
            RotationOrder::ZXY => OperationKind::RotateZXY,
            RotationOrder::ZYX => OperationKind::RotateZYX,
        }
    }

    /// True for single-axis, three-axis and orient kinds.
    pub fn is_rotation(self) -> bool {
        self.rotation_axis().is_some()
            || self.rotation_order().is_some()
            || self == OperationKind::Orient
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// =============================================================================
// TRANSFORM OPERATION
// =============================================================================

/// One entry in a node's ordered transform stack.
///
/// An inverse operation shares its name, and therefore its stored value,
/// with the forward operation it undoes.
///
/// # Examples
/// ```
/// use xform_ops::{OperationKind, Precision, TransformOperation};
/// let pivot = TransformOperation::new(OperationKind::Translate, Precision::Float, Some("pivot"));
/// assert_eq!(pivot.name(), "xformOp:translate:pivot");
/// let inverse = pivot.clone().inverted();
/// assert!(inverse.is_inverse());
/// assert_eq!(inverse.name(), pivot.name());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOperation {
    name: String,
    kind: OperationKind,
    precision: Precision,
    is_inverse: bool,
}

impl TransformOperation {
    /// Creates a forward operation named `xformOp:<token>[:<suffix>]`.
    ///
    /// Matrix operations are forced to double precision.
    pub fn new(kind: OperationKind, precision: Precision, suffix: Option<&str>) -> Self {
        let name = match suffix {
            Some(suffix) if !suffix.is_empty() => {
                format!("{OP_NAME_PREFIX}:{}:{suffix}", kind.token())
            }
            _ => format!("{OP_NAME_PREFIX}:{}", kind.token()),
        };
        let precision = if kind == OperationKind::Matrix {
            Precision::Double
        } else {
            precision
        };
        Self {
            name,
            kind,
            precision,
            is_inverse: false,
        }
    }

    /// Marks this operation as the inverse of its named partner.
    pub fn inverted(mut self) -> Self {
        self.is_inverse = true;
        self
    }

    /// Full operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Storage precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// True when this entry contributes the inverse of its value.
    pub fn is_inverse(&self) -> bool {
        self.is_inverse
    }

    /// The part of the name after `xformOp:<token>:`, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.name.splitn(3, ':').nth(2)
    }

    /// True when the name carries exactly this suffix.
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.suffix() == Some(suffix)
    }

    /// Resolves a stored value, substituting the kind's identity when the
    /// value is unset or of the wrong shape.
    pub fn resolve(&self, value: Option<&OpValue>) -> OpValue {
        match value {
            Some(v) if v.shape() == self.kind.value_shape() => *v,
            _ => self.kind.identity_value(),
        }
    }

    /// Translation contributed by a translate operation, inverse applied.
    pub fn translation(&self, value: Option<&OpValue>) -> DVec3 {
        let t = self.resolve(value).as_vec3().unwrap_or(DVec3::ZERO);
        if self.is_inverse {
            -t
        } else {
            t
        }
    }

    /// Scale contributed by a scale operation, inverse applied.
    ///
    /// The inverse of a zero component is zero so the frame stays finite.
    pub fn scale(&self, value: Option<&OpValue>) -> DVec3 {
        let s = self.resolve(value).as_vec3().unwrap_or(DVec3::ONE);
        if self.is_inverse {
            DVec3::new(recip_or_zero(s.x), recip_or_zero(s.y), recip_or_zero(s.z))
        } else {
            s
        }
    }

    /// Rotation contributed by a rotation kind, inverse applied.
    ///
    /// Returns `None` for translate, scale and matrix kinds.
    pub fn rotation(&self, value: Option<&OpValue>) -> Option<DQuat> {
        let resolved = self.resolve(value);
        let q = if let Some(axis) = self.kind.rotation_axis() {
            axis.quat(resolved.as_scalar().unwrap_or(0.0).to_radians())
        } else if let Some(order) = self.kind.rotation_order() {
            maths::euler_to_quat(order, resolved.as_vec3().unwrap_or(DVec3::ZERO))
        } else if self.kind == OperationKind::Orient {
            maths::normalize_quat(resolved.as_quat().unwrap_or(DQuat::IDENTITY))
        } else {
            return None;
        };
        Some(if self.is_inverse { q.conjugate() } else { q })
    }

    /// The per-operation 4x4 matrix, inverse applied.
    ///
    /// # Examples
    /// ```
    /// use glam::{DMat4, DVec3};
    /// use xform_ops::{OpValue, OperationKind, Precision, TransformOperation};
    /// let op = TransformOperation::new(OperationKind::Translate, Precision::Double, None);
    /// let op = op.inverted();
    /// let m = op.matrix(Some(&OpValue::Vec3(DVec3::new(1.0, 2.0, 3.0))));
    /// assert_eq!(m, DMat4::from_translation(DVec3::new(-1.0, -2.0, -3.0)));
    /// ```
    pub fn matrix(&self, value: Option<&OpValue>) -> DMat4 {
        match self.kind {
            OperationKind::Translate => DMat4::from_translation(self.translation(value)),
            OperationKind::Scale => DMat4::from_scale(self.scale(value)),
            OperationKind::Matrix => {
                let m = self
                    .resolve(value)
                    .as_matrix()
                    .unwrap_or(DMat4::IDENTITY);
                if self.is_inverse {
                    maths::affine_pseudo_inverse(m, config::constants::SINGULAR_EPSILON)
                } else {
                    m
                }
            }
            _ => self
                .rotation(value)
                .map(DMat4::from_quat)
                .unwrap_or(DMat4::IDENTITY),
        }
    }
}

fn recip_or_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        1.0 / v
    }
}
