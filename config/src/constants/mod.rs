//! Centralized tolerances shared by the transform-stack crates.
//!
//! Edit thresholds decide when a delta is a no-op. Degeneracy thresholds
//! decide when a basis is treated as singular.

use std::fmt;

// =============================================================================
// EDIT THRESHOLDS
// =============================================================================

/// Deltas whose components are all within this distance of the identity
/// element are treated as no-ops by the manipulator.
///
/// Applies to translation offsets (distance from zero), scale factors
/// (distance from one) and quaternion components (distance from identity).
///
/// # Examples
/// ```
/// use config::constants::ZERO_DELTA_EPSILON;
/// let delta = [1.0e-7, 0.0, -5.0e-7];
/// assert!(delta.iter().all(|d: &f64| d.abs() <= ZERO_DELTA_EPSILON));
/// ```
pub const ZERO_DELTA_EPSILON: f64 = 1.0e-6;

/// Tolerance used to decide whether a scale delta is uniform.
///
/// # Examples
/// ```
/// use config::constants::UNIFORM_SCALE_EPSILON;
/// let s: [f64; 3] = [4.0, 4.0 + 1.0e-8, 4.0];
/// assert!((s[0] - s[1]).abs() < UNIFORM_SCALE_EPSILON);
/// ```
pub const UNIFORM_SCALE_EPSILON: f64 = 1.0e-6;

/// How far a composed single-axis rotation may drift off its axis (as the
/// magnitude of the off-axis quaternion components) before the edit is
/// rejected.
///
/// # Examples
/// ```
/// use config::constants::AXIS_TWIST_TOLERANCE;
/// assert!(AXIS_TWIST_TOLERANCE < 1.0e-3);
/// ```
pub const AXIS_TWIST_TOLERANCE: f64 = 1.0e-6;

// =============================================================================
// DEGENERACY THRESHOLDS
// =============================================================================

/// Determinant magnitude below which a basis is treated as singular.
///
/// # Examples
/// ```
/// use config::constants::SINGULAR_EPSILON;
/// let det: f64 = 0.0;
/// assert!(det.abs() < SINGULAR_EPSILON);
/// ```
pub const SINGULAR_EPSILON: f64 = 1.0e-12;

/// Off-diagonal magnitude below which a basis counts as axis aligned.
///
/// # Examples
/// ```
/// use config::constants::AXIS_ALIGNMENT_EPSILON;
/// assert!(AXIS_ALIGNMENT_EPSILON > 0.0);
/// ```
pub const AXIS_ALIGNMENT_EPSILON: f64 = 1.0e-9;

/// Distance from ±1 at which Euler extraction switches to the gimbal-locked
/// branch.
///
/// # Examples
/// ```
/// use config::constants::GIMBAL_EPSILON;
/// let sin_middle: f64 = 1.0 - 1.0e-15;
/// assert!((sin_middle - 1.0).abs() < GIMBAL_EPSILON);
/// ```
pub const GIMBAL_EPSILON: f64 = 1.0e-12;

// =============================================================================
// PRECISION
// =============================================================================

/// Largest finite IEEE binary16 value. Half-precision writes saturate here.
///
/// # Examples
/// ```
/// use config::constants::HALF_MAX;
/// assert_eq!(HALF_MAX, 65504.0);
/// ```
pub const HALF_MAX: f64 = 65504.0;

/// Matrix comparison tolerance for float and double precision stacks.
///
/// # Examples
/// ```
/// use config::constants::FRAME_TOLERANCE;
/// assert!(FRAME_TOLERANCE <= 1.0e-5);
/// ```
pub const FRAME_TOLERANCE: f64 = 1.0e-5;

/// Matrix comparison tolerance for stacks containing half precision ops.
///
/// # Examples
/// ```
/// use config::constants::{FRAME_TOLERANCE, HALF_FRAME_TOLERANCE};
/// assert!(HALF_FRAME_TOLERANCE > FRAME_TOLERANCE);
/// ```
pub const HALF_FRAME_TOLERANCE: f64 = 5.0e-3;

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of the tolerances that can be shared between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Threshold below which an edit delta is ignored.
    pub tolerance: f64,
    /// Threshold used for uniform-scale checks.
    pub uniform_tolerance: f64,
    /// Determinant threshold for singular bases.
    pub singular_tolerance: f64,
}

impl GlobalConfig {
    /// Builds a configuration, rejecting non-positive or non-finite tolerances.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-5, 1.0e-6, 1.0e-12).expect("valid config");
    /// assert_eq!(cfg.tolerance, 1.0e-5);
    /// ```
    pub fn new(
        tolerance: f64,
        uniform_tolerance: f64,
        singular_tolerance: f64,
    ) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0 && tolerance.is_finite()) {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if !(uniform_tolerance > 0.0 && uniform_tolerance.is_finite()) {
            return Err(ConfigError::InvalidUniformTolerance(uniform_tolerance));
        }
        if !(singular_tolerance > 0.0 && singular_tolerance.is_finite()) {
            return Err(ConfigError::InvalidSingularTolerance(singular_tolerance));
        }
        Ok(Self {
            tolerance,
            uniform_tolerance,
            singular_tolerance,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: ZERO_DELTA_EPSILON,
            uniform_tolerance: UNIFORM_SCALE_EPSILON,
            singular_tolerance: SINGULAR_EPSILON,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the delta tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the uniform-scale tolerance is zero, negative or not finite.
    InvalidUniformTolerance(f64),
    /// Raised when the singular-basis tolerance is zero, negative or not finite.
    InvalidSingularTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive: {value}")
            }
            ConfigError::InvalidUniformTolerance(value) => {
                write!(f, "uniform_tolerance must be positive: {value}")
            }
            ConfigError::InvalidSingularTolerance(value) => {
                write!(f, "singular_tolerance must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
