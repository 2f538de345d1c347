//! The stand as a rigid body: orientation estimation and motion planning.
//!
//! A [`Stand`] ties the three leg joints and the internal detector stage
//! together with the platform's believed orientation. The belief is exactly
//! that: pitch, yaw and roll are correct right after a successful
//! [`find_angles`](Stand::find_angles) and go stale as soon as motors move
//! outside the stand's own planning methods, which is why the estimate
//! carries an explicit staleness flag.
//!
//! Multi-step plans never touch hardware while exploring. They run on a
//! [`model`](Stand::model) — an independent copy of the stand whose motors
//! are soft actuators — and only [`from_model`](Stand::from_model) commits
//! the final displacements to the real joints.

use std::time::Duration;

use nalgebra::{Rotation3, Vector3};
use tracing::{debug, info, warn};

use crate::actuator::MoveHandle;
use crate::joints::{AngledJoint, ConeJoint, Detector, Displacement};
use crate::points::Point;
use crate::stand_error::StandError;

/// Default precision for the estimated motor positions, in motor units.
pub const DEFAULT_PRECISION: f64 = 0.001;

/// Default minimum number of estimator iterations before exit is considered.
pub const DEFAULT_MIN_ITERATIONS: usize = 30;

/// Result of one [`Stand::find_angles`] run.
///
/// Success and give-up both report the best current estimate; `converged`
/// tells them apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleEstimate {
    /// Rotation about the X axis in radians.
    pub pitch: f64,
    /// Rotation about the Y axis in radians.
    pub yaw: f64,
    /// Rotation about the Z axis in radians.
    pub roll: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// A three-legged detector stand.
///
/// The `cone` joint is the apex the platform pivots about; `flat` is the rear
/// joint whose ball rides a flat receptacle (no slide); `vee` is the rear
/// joint with both motors. The detector stage rides the platform along z.
pub struct Stand {
    pub cone: ConeJoint,
    pub flat: AngledJoint,
    pub vee: AngledJoint,
    pub detector: Detector,

    /// Believed rotation about the X axis in radians.
    pub pitch: f64,
    /// Believed rotation about the Y axis in radians.
    pub yaw: f64,
    /// Believed rotation about the Z axis in radians.
    pub roll: f64,

    angles_stale: bool,
}

impl Stand {
    /// A stand with joints already bound to their actuators. The orientation
    /// belief starts at zero and stale; run [`find_angles`](Stand::find_angles)
    /// before trusting it.
    pub fn new(cone: ConeJoint, flat: AngledJoint, vee: AngledJoint, detector: Detector) -> Self {
        Stand {
            cone,
            flat,
            vee,
            detector,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            angles_stale: true,
        }
    }

    /// True until the next [`find_angles`](Stand::find_angles) whenever the
    /// stand knows its own operations invalidated the orientation belief.
    /// Motion commanded outside this stand cannot be observed, so a false
    /// value is only as good as the caller's discipline.
    pub fn angles_stale(&self) -> bool {
        self.angles_stale
    }

    /// Coordinates of a rest-frame point in the stand frame: x and y are
    /// shifted into the frame centered at the cone joint ball.
    pub fn stand_coordinates(&self, offset: Point) -> Point {
        let cone = self.cone.joint();
        Point::new(offset.x + cone.x, offset.y + cone.y, offset.z)
    }

    /// Coordinates of a rest-frame point in the reference frame of the room,
    /// under the current orientation belief. Recomputed on every call.
    pub fn room_coordinates(&self, offset: Point) -> Point {
        // nalgebra names its Euler angles roll/pitch/yaw about x/y/z; the
        // stand's pitch/yaw/roll rotate about x/y/z respectively, so the
        // arguments line up positionally, not by name.
        let rotation = Rotation3::from_euler_angles(self.pitch, self.yaw, self.roll);
        let stand: Vector3<f64> = self.stand_coordinates(offset).into();
        (rotation * stand).into()
    }

    /// Estimate pitch, yaw and roll with the defaults of
    /// [`DEFAULT_PRECISION`] and [`DEFAULT_MIN_ITERATIONS`].
    pub fn find_angles(&mut self) -> AngleEstimate {
        self.find_angles_with(DEFAULT_PRECISION, DEFAULT_MIN_ITERATIONS)
    }

    /// Estimate the orientation by iteratively comparing predicted and actual
    /// motor positions.
    ///
    /// The forward map from angles to motor positions has no closed-form
    /// inverse for this geometry. Instead, the current angle estimate
    /// predicts where the flat and vee balls sit in the room, the joint
    /// inverse kinematics turn those predictions into motor positions, and
    /// the mismatch against the actual encoder readbacks drives a linearized
    /// correction of the estimate.
    ///
    /// Iteration ends successfully once at least `min_iterations` passed and
    /// every motor error is below `precision`; it gives up without raising
    /// after twice `min_iterations`. Either way the belief holds the best
    /// estimate found and the returned [`AngleEstimate`] reports which exit
    /// was taken.
    pub fn find_angles_with(&mut self, precision: f64, min_iterations: usize) -> AngleEstimate {
        debug!("finding angles of the stand");
        let flat_offset = self.flat.offset;
        let vee_offset = self.vee.offset;

        let mut iteration = 0;
        let converged = loop {
            // Error in the predicted flat motor position from the current angles.
            let flat_room = self.room_coordinates(flat_offset);
            let fl_e = self.flat.invert_driven(flat_room, true).lift()
                - self.flat.displacement().lift();
            debug!(error = fl_e, "flat lift prediction error");

            // Same for both motors of the vee joint.
            let vee_room = self.room_coordinates(vee_offset);
            let (predicted_slide, predicted_lift) =
                self.vee.invert_driven(vee_room, true).pair();
            let (actual_slide, actual_lift) = self.vee.displacement().pair();
            let (vs_e, vl_e) = (predicted_slide - actual_slide, predicted_lift - actual_lift);
            debug!(slide = vs_e, lift = vl_e, "vee prediction errors");

            if iteration > min_iterations
                && precision > fl_e.abs().max(vl_e.abs()).max(vs_e.abs())
            {
                info!(iteration, "successfully found stand angles");
                break true;
            }
            if iteration > 2 * min_iterations {
                warn!("unable to converge on angles for the stand");
                break false;
            }

            self.pitch += (vl_e + vs_e) / (3.0 * vee_offset.z);
            self.yaw += vs_e / (-3.0 * vee_offset.z);
            self.roll += (fl_e - vl_e)
                / (3.0 * (self.vee.alpha.sin() + vee_offset.x - flat_offset.x));

            debug!(
                pitch = self.pitch,
                yaw = self.yaw,
                roll = self.roll,
                "angle estimate adjusted"
            );
            iteration += 1;
        };

        self.angles_stale = false;
        AngleEstimate {
            pitch: self.pitch,
            yaw: self.yaw,
            roll: self.roll,
            converged,
            iterations: iteration,
        }
    }

    /// Translate the entire stand by a room-frame (dx, dy).
    ///
    /// The motors act in the rest frame, so the request maps back through the
    /// inverse of the current rotation before it becomes relative joint
    /// moves. The orientation belief is unaffected.
    pub fn translate(
        &self,
        dx: f64,
        dy: f64,
        wait: Option<Duration>,
    ) -> Result<Vec<MoveHandle>, StandError> {
        debug!(dx, dy, "translating stand");

        let rotation = Rotation3::from_euler_angles(self.pitch, self.yaw, self.roll);
        let rest = rotation.transpose() * Vector3::new(dx, dy, 0.0);
        let demand = Point::new(rest.x, rest.y, 0.0);

        self.set_displacement(
            Some(self.cone.invert(demand, false)),
            Some(self.flat.invert_driven(demand, false)),
            Some(self.vee.invert(demand, false)?),
            true,
            wait,
        )
    }

    /// Rotate the stand while keeping the cone joint stationary.
    ///
    /// The requested deltas are applied to a model, the flat and vee room
    /// positions are recomputed under the model's angles, and the real rear
    /// joints are sent to match. The cone is untouched by construction. The
    /// orientation belief is not updated; it is stale until the next
    /// [`find_angles`](Stand::find_angles).
    pub fn rotate(
        &mut self,
        dpitch: f64,
        dyaw: f64,
        droll: f64,
        wait: Option<Duration>,
    ) -> Result<Vec<MoveHandle>, StandError> {
        debug!(dpitch, dyaw, droll, "rotating stand about the cone joint");

        let mut model = self.model();
        model.pitch += dpitch;
        model.yaw += dyaw;
        model.roll += droll;

        // Where the rear joints must sit for the model's orientation.
        let flat_room = model.room_coordinates(self.flat.offset);
        let vee_room = model.room_coordinates(self.vee.offset);

        let handles = self.set_displacement(
            None,
            Some(self.flat.invert_driven(flat_room, true)),
            Some(self.vee.invert(vee_room, true)?),
            false,
            wait,
        )?;
        self.angles_stale = true;
        Ok(handles)
    }

    /// Keep the detector-axis point at `origin` stationary in the room while
    /// moving the point at `z` by (dx, dy).
    ///
    /// A small-angle rotation moves the mobile point, then `retries`
    /// corrective translations pull the fixed point back to where it started;
    /// each pass runs entirely on a model and only the final displacements
    /// are committed. Accuracy is controlled by `retries` alone; the method
    /// never fails on residual error.
    pub fn align(
        &mut self,
        z: f64,
        origin: f64,
        dx: f64,
        dy: f64,
        retries: usize,
        wait: Option<Duration>,
    ) -> Result<Vec<MoveHandle>, StandError> {
        debug!(z, origin, "rotating a detector-axis point about a fixed origin");

        let mut model = self.model();
        let fixed = Point::new(
            model.detector.position().x,
            model.detector.position().y,
            origin,
        );
        let initial = model.room_coordinates(fixed);

        // Small-angle approximation of the rotation that shifts the mobile
        // point by the requested amount.
        let dpitch = -dy / (z - origin);
        let dyaw = -dx / (origin - z);
        debug!(dpitch, dyaw, "small angle approximation");

        model.rotate(dpitch, dyaw, 0.0, None)?;
        model.find_angles();

        for _ in 0..retries {
            let drift = model.room_coordinates(fixed) - initial;
            debug!(x = drift.x, y = drift.y, z = drift.z, "fixed point drift");

            // The fixed point also sank or rose with the rotation; its z
            // drift couples back into x/y through the model's current angles.
            let xslope = drift.z * (model.pitch * model.roll + model.yaw);
            let yslope = drift.z * (model.pitch + model.yaw * model.roll);

            model.translate(-drift.x + xslope, -drift.y - yslope, None)?;
        }

        self.from_model(&model, wait)
    }

    /// An independent copy for planning: every joint and the detector are
    /// cloned onto soft actuators seeded to the current readbacks, and the
    /// orientation belief is copied verbatim. The copy shares no mutable
    /// state with this stand.
    pub fn model(&self) -> Stand {
        Stand {
            cone: self.cone.model(),
            flat: self.flat.model(),
            vee: self.vee.model(),
            detector: self.detector.model(),
            pitch: self.pitch,
            yaw: self.yaw,
            roll: self.roll,
            angles_stale: self.angles_stale,
        }
    }

    /// Commit a planned model: send the real joints to the model's final
    /// displacements with absolute moves.
    pub fn from_model(
        &mut self,
        model: &Stand,
        wait: Option<Duration>,
    ) -> Result<Vec<MoveHandle>, StandError> {
        let handles = self.set_displacement(
            Some(model.cone.displacement()),
            Some(model.flat.displacement()),
            Some(model.vee.displacement()),
            false,
            wait,
        )?;
        self.angles_stale = true;
        Ok(handles)
    }

    /// Order moves on any subset of the joints.
    ///
    /// All moves are issued without blocking. With a `wait` timeout the call
    /// then blocks on every handle; the first timeout or fault stops all
    /// joints best-effort (already completed partial motion is not rolled
    /// back) and the original error is returned unchanged.
    pub fn set_displacement(
        &self,
        cone: Option<Displacement>,
        flat: Option<Displacement>,
        vee: Option<Displacement>,
        relative: bool,
        wait: Option<Duration>,
    ) -> Result<Vec<MoveHandle>, StandError> {
        let mut handles = Vec::new();
        if let Some(target) = cone {
            handles.extend(self.cone.set_displacement(target, relative)?);
        }
        if let Some(target) = flat {
            handles.extend(self.flat.set_displacement(target, relative)?);
        }
        if let Some(target) = vee {
            handles.extend(self.vee.set_displacement(target, relative)?);
        }

        if let Some(timeout) = wait {
            debug!("waiting for stand motion to complete");
            for handle in &handles {
                if let Err(fault) = handle.wait(timeout) {
                    warn!("stopping all stand motors after a failed move");
                    self.stop();
                    return Err(fault);
                }
            }
        }
        Ok(handles)
    }

    /// Stop every joint of the stand.
    pub fn stop(&self) {
        self.cone.stop();
        self.flat.stop();
        self.vee.stop();
    }
}
