//! Error handling for joint kinematics, stand motion and geometry loading

use std::io;
use std::time::Duration;

/// Unified error to report failures from inverse kinematics, actuator motion
/// and geometry file parsing.
#[derive(Debug)]
pub enum StandError {
    /// A joint without a slide was asked for a horizontal position it cannot
    /// drive. Carries the lift motor name and the offending x component.
    UnreachablePosition { joint: String, x: f64 },
    /// A value could not be read as a 3-component point.
    TypeMismatch(String),
    /// A move target lies outside the actuator soft limits.
    LimitViolation {
        name: String,
        target: f64,
        low: f64,
        high: f64,
    },
    /// A waited move did not finish within the timeout.
    MoveTimeout { name: String, timeout: Duration },
    /// The actuator reported a fault while moving.
    MoveFailed { name: String, reason: String },
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
}

impl std::fmt::Display for StandError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            StandError::UnreachablePosition { ref joint, x } =>
                write!(f, "Unable to reach x = {} because the joint of {} has no slide", x, joint),
            StandError::TypeMismatch(ref msg) =>
                write!(f, "Type Mismatch: {}", msg),
            StandError::LimitViolation { ref name, target, low, high } =>
                write!(f, "Target {} for {} is outside the soft limits ({}, {})",
                       target, name, low, high),
            StandError::MoveTimeout { ref name, timeout } =>
                write!(f, "Move of {} did not complete within {:?}", name, timeout),
            StandError::MoveFailed { ref name, ref reason } =>
                write!(f, "Move of {} failed: {}", name, reason),
            StandError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            StandError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            StandError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
        }
    }
}

impl std::error::Error for StandError {}

impl From<io::Error> for StandError {
    fn from(err: io::Error) -> Self {
        StandError::IoError(err)
    }
}
