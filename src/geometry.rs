//! Defines the static stand geometry data structure

use std::sync::Arc;

use crate::actuator::Actuator;
use crate::joints::{AngledJoint, ConeJoint, Detector, DEFAULT_ALPHA};
use crate::points::Point;
use crate::stand::Stand;
use crate::utils::deg;

/// Static geometry of one stand: the lift tilt angle and the rest-frame
/// offsets of the three leg joints and the detector stage. See
/// [geometry_stands.rs](crate::geometry_stands) for concrete stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandGeometry {
    /// Tilt of the lift motors from the horizontal plane, radians.
    pub alpha: f64,

    /// Rest-frame position of the cone joint ball at nominal motor zero.
    pub cone: Point,

    /// Rest-frame position of the flat joint ball at nominal motor zero.
    pub flat: Point,

    /// Rest-frame position of the vee joint ball at nominal motor zero.
    pub vee: Point,

    /// Rest-frame position of the detector stage at nominal motor zero.
    pub detector: Point,
}

impl StandGeometry {
    /// Provides default values: zeroed offsets at the standard tilt.
    pub fn new() -> Self {
        StandGeometry {
            alpha: DEFAULT_ALPHA,
            cone: Point::ORIGIN,
            flat: Point::ORIGIN,
            vee: Point::ORIGIN,
            detector: Point::ORIGIN,
        }
    }

    /// Wire six actuator handles into a [`Stand`] with this geometry.
    pub fn build(
        &self,
        cone_lift: Arc<dyn Actuator>,
        cone_slide: Arc<dyn Actuator>,
        flat_lift: Arc<dyn Actuator>,
        vee_lift: Arc<dyn Actuator>,
        vee_slide: Arc<dyn Actuator>,
        detector_slide: Arc<dyn Actuator>,
    ) -> Stand {
        let mut cone = ConeJoint::new(cone_lift, cone_slide, self.cone);
        cone.alpha = self.alpha;

        let mut flat = AngledJoint::new(flat_lift, None, self.flat);
        flat.alpha = self.alpha;

        let mut vee = AngledJoint::new(vee_lift, Some(vee_slide), self.vee);
        vee.alpha = self.alpha;

        Stand::new(cone, flat, vee, Detector::new(detector_slide, self.detector))
    }

    /// Convert to string yaml representation (quick viewing, etc).
    pub fn to_yaml(&self) -> String {
        format!(
            "stand_geometry:\n  \
              alpha: {}\n  \
              cone_offset: [{}, {}, {}]\n  \
              flat_offset: [{}, {}, {}]\n  \
              vee_offset: [{}, {}, {}]\n  \
              detector_offset: [{}, {}, {}]\n",
            deg(&self.alpha),
            self.cone.x, self.cone.y, self.cone.z,
            self.flat.x, self.flat.y, self.flat.z,
            self.vee.x, self.vee.y, self.vee.z,
            self.detector.x, self.detector.y, self.detector.z,
        )
    }
}

impl Default for StandGeometry {
    fn default() -> Self {
        Self::new()
    }
}
