//! Rust implementation of forward and inverse kinematics for three-legged
//! detector stands, with pose estimation from motor encoders and motor
//! planning for rigid-body moves of the platform.
//!
//! A detector platform rests on three ball joints (cone, flat and vee), each
//! actuated by one or two linear motors whose lifts are tilted by a fixed
//! angle. The forward map from motor positions to the platform pose has no
//! closed-form inverse for this geometry, so the orientation is recovered by
//! a linearized iterative estimator that compares predicted and actual
//! encoder readbacks.
//!
//! # Features
//!
//! - Per-joint forward and inverse kinematics, with the unreachable cases of
//!   the slideless flat joint reported as typed errors.
//! - The rest → stand → room coordinate transform, recomputed from the
//!   current orientation belief on every access.
//! - The iterative orientation estimator [`Stand::find_angles`], reporting
//!   success and give-up distinguishably.
//! - Compound planning operations — [`Stand::translate`], [`Stand::rotate`]
//!   and the two-point [`Stand::align`] — that explore on an independent
//!   simulated model and only then commit motor moves.
//! - Actuators behind a small capability trait, so the same kinematics run
//!   against hardware drivers and against the in-memory [`SoftActuator`].
//! - Stand geometry presets and optional YAML geometry files.
//!
//! # Example
//!
//! The demo binary (`src/main.rs`) walks a complete session: estimate the
//! orientation, rotate, re-estimate, translate and align, all on a simulated
//! bench stand.
//!
//! [`Stand::find_angles`]: stand::Stand::find_angles
//! [`Stand::translate`]: stand::Stand::translate
//! [`Stand::rotate`]: stand::Stand::rotate
//! [`Stand::align`]: stand::Stand::align
//! [`SoftActuator`]: actuator::SoftActuator

pub mod actuator;
pub mod joints;
pub mod points;
pub mod stand;
pub mod stand_error;

pub mod geometry;
pub mod geometry_stands;

#[cfg(feature = "allow_filesystem")]
pub mod geometry_from_file;

pub mod utils;

#[cfg(test)]
mod tests;
