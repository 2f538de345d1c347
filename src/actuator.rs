//! The actuator capability the joints are built on.
//!
//! A stand joint does not care whether its motors are real hardware behind a
//! control system or an in-memory simulation: it only needs a position
//! readback, a non-blocking move returning a waitable handle, a stop, a name
//! and soft limits. The real driver lives outside this crate; the simulated
//! [`SoftActuator`] lives here because [`model`](crate::stand::Stand::model)
//! planning and the test suite are built on it.

use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::stand_error::StandError;

/// Waitable handle returned by a (non-blocking) actuator move.
pub type MoveHandle = Box<dyn MoveStatus>;

/// Status of one issued move.
pub trait MoveStatus {
    /// True once the move has finished, successfully or not.
    fn done(&self) -> bool;

    /// Block until the move finishes or the timeout elapses.
    fn wait(&self, timeout: Duration) -> Result<(), StandError>;
}

/// One linear motor axis.
///
/// Limits follow the soft-positioner convention: `(0.0, 0.0)` means the axis
/// is unlimited.
pub trait Actuator {
    /// Current encoder readback.
    fn position(&self) -> f64;

    /// Begin moving to `target` without blocking. The returned handle is
    /// waited on by the stand when a whole operation is waited.
    fn move_to(&self, target: f64) -> Result<MoveHandle, StandError>;

    /// Best-effort halt of any in-flight motion.
    fn stop(&self);

    fn name(&self) -> &str;

    fn limits(&self) -> (f64, f64);
}

/// In-memory actuator: every move completes instantly, soft limits are
/// enforced, and `stop` is remembered so tests can observe the abort path.
pub struct SoftActuator {
    name: String,
    limits: (f64, f64),
    position: Mutex<f64>,
    stopped: Mutex<bool>,
}

impl SoftActuator {
    /// Unlimited soft actuator starting at `position`.
    pub fn new(name: &str, position: f64) -> Self {
        SoftActuator {
            name: name.to_string(),
            limits: (0.0, 0.0),
            position: Mutex::new(position),
            stopped: Mutex::new(false),
        }
    }

    pub fn with_limits(name: &str, position: f64, low: f64, high: f64) -> Self {
        SoftActuator {
            limits: (low, high),
            ..Self::new(name, position)
        }
    }

    /// A copy of another actuator: same name and limits, seeded to its
    /// current position. This is what joint models are made of.
    pub fn mirror(source: &dyn Actuator) -> Self {
        let (low, high) = source.limits();
        SoftActuator::with_limits(source.name(), source.position(), low, high)
    }

    /// True if `stop` was called since the last move.
    pub fn stopped(&self) -> bool {
        *self.stopped.lock().unwrap()
    }
}

impl Actuator for SoftActuator {
    fn position(&self) -> f64 {
        *self.position.lock().unwrap()
    }

    fn move_to(&self, target: f64) -> Result<MoveHandle, StandError> {
        let (low, high) = self.limits;
        if low != high && (target < low || target > high) {
            return Err(StandError::LimitViolation {
                name: self.name.clone(),
                target,
                low,
                high,
            });
        }
        debug!(name = %self.name, target, "soft actuator move");
        *self.position.lock().unwrap() = target;
        *self.stopped.lock().unwrap() = false;
        Ok(Box::new(CompletedMove))
    }

    fn stop(&self) {
        *self.stopped.lock().unwrap() = true;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn limits(&self) -> (f64, f64) {
        self.limits
    }
}

/// A soft actuator move is already over when the handle is handed out.
struct CompletedMove;

impl MoveStatus for CompletedMove {
    fn done(&self) -> bool {
        true
    }

    fn wait(&self, _timeout: Duration) -> Result<(), StandError> {
        Ok(())
    }
}
