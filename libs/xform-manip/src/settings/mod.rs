//! Manipulator-level tolerances building on the shared `config` crate.

use thiserror::Error;

use config::constants::{
    ConfigError, GlobalConfig, AXIS_ALIGNMENT_EPSILON, AXIS_TWIST_TOLERANCE,
};

/// Tolerances a manipulator applies to its edits.
///
/// # Examples
/// ```
/// use xform_manip::ManipulatorConfig;
/// let cfg = ManipulatorConfig::default();
/// assert!(cfg.tolerance > 0.0);
/// assert!(cfg.singular_tolerance < cfg.tolerance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManipulatorConfig {
    /// Deltas whose components all fall at or below this are ignored.
    pub tolerance: f64,
    /// Maximum component spread for a scale delta to count as uniform.
    pub uniform_tolerance: f64,
    /// Determinant below which a basis is treated as singular.
    pub singular_tolerance: f64,
    /// Maximum off-axis quaternion component for a single-axis result.
    pub twist_tolerance: f64,
    /// Maximum off-diagonal entry (relative) for an axis-aligned basis.
    pub alignment_tolerance: f64,
}

impl ManipulatorConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use xform_manip::ManipulatorConfig;
    /// let cfg = ManipulatorConfig::new(1.0e-4, 1.0e-6, 1.0e-12).unwrap();
    /// assert_eq!(cfg.tolerance, 1.0e-4);
    /// assert!(ManipulatorConfig::new(0.0, 1.0e-6, 1.0e-12).is_err());
    /// ```
    pub fn new(
        tolerance: f64,
        uniform_tolerance: f64,
        singular_tolerance: f64,
    ) -> Result<Self, ManipulatorConfigError> {
        GlobalConfig::new(tolerance, uniform_tolerance, singular_tolerance)
            .map(Self::from)
            .map_err(ManipulatorConfigError::from)
    }
}

impl From<GlobalConfig> for ManipulatorConfig {
    fn from(cfg: GlobalConfig) -> Self {
        Self {
            tolerance: cfg.tolerance,
            uniform_tolerance: cfg.uniform_tolerance,
            singular_tolerance: cfg.singular_tolerance,
            twist_tolerance: AXIS_TWIST_TOLERANCE,
            alignment_tolerance: AXIS_ALIGNMENT_EPSILON,
        }
    }
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self::from(GlobalConfig::default())
    }
}

/// Error wrapper for invalid manipulator configuration.
#[derive(Error, Debug, PartialEq)]
#[error(transparent)]
pub struct ManipulatorConfigError(#[from] ConfigError);
