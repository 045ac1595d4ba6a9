//! # Config Crate
//!
//! Centralized tolerances for the transform-stack evaluator and manipulator.
//! Every threshold that decides whether an edit is ignored, rejected or
//! treated as degenerate is defined here so both library crates agree.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ZERO_DELTA_EPSILON, UNIFORM_SCALE_EPSILON};
//!
//! // A translation this small is not worth writing back
//! let delta: [f64; 3] = [1.0e-7, 0.0, 0.0];
//! assert!(delta.iter().all(|d| d.abs() <= ZERO_DELTA_EPSILON));
//!
//! // A scale delta is uniform when its components agree
//! let scale: [f64; 3] = [4.0, 4.0, 4.0];
//! assert!((scale[0] - scale[2]).abs() < UNIFORM_SCALE_EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All tolerances defined once, used everywhere
//! - **No Dependencies**: Pure constants and a validated snapshot type
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
