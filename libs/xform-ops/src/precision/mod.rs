//! Storage precision of operation values.
//!
//! All maths runs in `f64`. Values are only truncated when written back, which
//! is what [`Precision::quantize`] models.

use glam::{DVec3, DVec4};
use serde::{Deserialize, Serialize};

use config::constants::{FRAME_TOLERANCE, HALF_FRAME_TOLERANCE, HALF_MAX};

/// Numeric width of a stored operation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    /// IEEE binary16
    Half,
    /// IEEE binary32
    Float,
    /// IEEE binary64
    Double,
}

impl Precision {
    /// Rounds `value` to the nearest value representable at this precision.
    ///
    /// Half precision rounds ties to even and saturates at ±65504 instead of
    /// overflowing to infinity.
    ///
    /// # Examples
    /// ```
    /// use xform_ops::Precision;
    /// assert_eq!(Precision::Double.quantize(0.1), 0.1);
    /// assert_eq!(Precision::Half.quantize(1.0 + 1.0 / 4096.0), 1.0);
    /// assert_eq!(Precision::Half.quantize(1.0e6), 65504.0);
    /// ```
    pub fn quantize(self, value: f64) -> f64 {
        match self {
            Precision::Double => value,
            Precision::Float => value as f32 as f64,
            Precision::Half => round_to_half(value),
        }
    }

    /// Quantizes each component of a vector3.
    pub fn quantize_vec3(self, v: DVec3) -> DVec3 {
        DVec3::new(self.quantize(v.x), self.quantize(v.y), self.quantize(v.z))
    }

    /// Quantizes each component of a vector4.
    pub fn quantize_vec4(self, v: DVec4) -> DVec4 {
        DVec4::new(
            self.quantize(v.x),
            self.quantize(v.y),
            self.quantize(v.z),
            self.quantize(v.w),
        )
    }

    /// Matrix comparison tolerance appropriate for values stored at this precision.
    pub fn frame_tolerance(self) -> f64 {
        match self {
            Precision::Half => HALF_FRAME_TOLERANCE,
            Precision::Float | Precision::Double => FRAME_TOLERANCE,
        }
    }
}

/// Rounds through `f32` and then to the binary16 grid.
fn round_to_half(value: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    let v = value as f32 as f64;
    if v == 0.0 || v.is_infinite() || v.abs() >= HALF_MAX {
        return if v == 0.0 { v } else { HALF_MAX.copysign(v) };
    }
    // unbiased binary exponent of a normal f64
    let exponent = ((v.to_bits() >> 52) & 0x7ff) as i32 - 1023;
    // 10 mantissa bits; below 2^-14 the spacing stays at the subnormal step 2^-24
    let step = 2f64.powi(exponent.max(-14) - 10);
    let rounded = (v / step).round_ties_even() * step;
    rounded.clamp(-HALF_MAX, HALF_MAX)
}
