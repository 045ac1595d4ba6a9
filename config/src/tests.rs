//! # Tests for Config Constants
//!
//! Unit tests verifying the relationships between tolerances.

use crate::constants::*;

// =============================================================================
// EDIT THRESHOLD TESTS
// =============================================================================

#[test]
fn test_zero_delta_epsilon_is_positive() {
    assert!(ZERO_DELTA_EPSILON > 0.0, "ZERO_DELTA_EPSILON must be positive");
}

#[test]
fn test_zero_delta_epsilon_is_below_frame_tolerance() {
    assert!(
        ZERO_DELTA_EPSILON < FRAME_TOLERANCE,
        "ignored deltas must not be visible at comparison tolerance"
    );
}

#[test]
fn test_axis_twist_tolerance_is_small() {
    assert!(AXIS_TWIST_TOLERANCE <= 1e-5);
}

// =============================================================================
// DEGENERACY TESTS
// =============================================================================

#[test]
fn test_singular_epsilon_below_edit_epsilon() {
    assert!(
        SINGULAR_EPSILON < ZERO_DELTA_EPSILON,
        "SINGULAR_EPSILON should be far below edit thresholds"
    );
}

#[test]
fn test_gimbal_epsilon_is_tight() {
    assert!(GIMBAL_EPSILON <= 1e-9);
}

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_half_tolerance_wider_than_frame_tolerance() {
    assert!(HALF_FRAME_TOLERANCE > FRAME_TOLERANCE);
    assert!(HALF_FRAME_TOLERANCE <= 5e-2);
}

#[test]
fn test_half_max_is_binary16_limit() {
    assert_eq!(HALF_MAX, 65504.0);
}
