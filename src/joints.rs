//! Per-joint forward and inverse kinematics.
//!
//! Each leg of the stand couples one or two motors to a ball joint. The
//! forward direction maps encoder readbacks to the ball position in the rest
//! frame; [`invert`](AngledJoint::invert) runs the other way and yields the
//! motor targets that would put the ball at a requested (x, y).

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::actuator::{Actuator, MoveHandle, SoftActuator};
use crate::points::Point;
use crate::stand_error::StandError;

/// Tilt of the lift motors from the horizontal plane, 15 degrees in radians.
/// Fixed per joint type; overridden only by tests probing degenerate angles.
pub const DEFAULT_ALPHA: f64 = 0.261799387;

/// Motor-space target or readback of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Displacement {
    /// Joint with a single lift motor.
    Lift(f64),
    /// Joint with both a slide and a lift motor.
    SlideLift { slide: f64, lift: f64 },
}

impl Displacement {
    /// The lift component, whichever shape the joint has.
    pub fn lift(&self) -> f64 {
        match *self {
            Displacement::Lift(lift) => lift,
            Displacement::SlideLift { lift, .. } => lift,
        }
    }

    /// (slide, lift) with a missing slide read as zero.
    pub fn pair(&self) -> (f64, f64) {
        match *self {
            Displacement::Lift(lift) => (0.0, lift),
            Displacement::SlideLift { slide, lift } => (slide, lift),
        }
    }
}

/// Two angled joint motors acting as a single axis.
///
/// The lift motor is tilted by `alpha` from the horizontal; the optional
/// slide carries the ball along x. A joint without a slide rests its ball on
/// a flat receptacle, so the x axis is free rather than driven.
pub struct AngledJoint {
    /// Tilted vertical motor.
    pub lift: Arc<dyn Actuator>,
    /// Horizontal motor, absent on the flat joint.
    pub slide: Option<Arc<dyn Actuator>>,
    /// Ball position in the rest frame when all motors are at nominal zero.
    pub offset: Point,
    pub alpha: f64,
}

impl AngledJoint {
    pub fn new(lift: Arc<dyn Actuator>, slide: Option<Arc<dyn Actuator>>, offset: Point) -> Self {
        AngledJoint {
            lift,
            slide,
            offset,
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Displacement of the joint motors from the nominal zero.
    pub fn displacement(&self) -> Displacement {
        match &self.slide {
            None => Displacement::Lift(self.lift.position()),
            Some(slide) => Displacement::SlideLift {
                slide: slide.position(),
                lift: self.lift.position(),
            },
        }
    }

    /// Displacement of the ball joint from nominal zero as a [`Point`].
    ///
    /// The lift tilts out of the vertical towards negative z: a positive lift
    /// move raises the ball and pulls it back by `lift * cos(alpha)`.
    pub fn joint(&self) -> Point {
        let (slide, lift) = self.displacement().pair();
        Point::new(
            slide,
            lift * self.alpha.sin(),
            -lift * self.alpha.cos(),
        )
    }

    /// Position of the ball joint in rest coordinates.
    pub fn position(&self) -> Point {
        self.joint() + self.offset
    }

    /// Motor positions that put the ball at the requested (x, y) rest
    /// coordinate. When `offset` is true the joint offset is subtracted from
    /// the request first.
    ///
    /// A joint without a slide can only satisfy the vertical component; a
    /// nonzero x demand on such a joint is a [`StandError::UnreachablePosition`].
    pub fn invert(&self, point: Point, offset: bool) -> Result<Displacement, StandError> {
        if self.slide.is_none() {
            let x = if offset { point.x - self.offset.x } else { point.x };
            if x != 0.0 {
                return Err(StandError::UnreachablePosition {
                    joint: self.lift.name().to_string(),
                    x,
                });
            }
        }
        Ok(self.invert_driven(point, offset))
    }

    /// Like [`invert`](AngledJoint::invert), but only for the axes this joint
    /// actually drives: without a slide the ball rides the flat receptacle in
    /// x, so the horizontal component of the request is masked instead of
    /// rejected. This is the form the stand planning uses.
    pub fn invert_driven(&self, point: Point, offset: bool) -> Displacement {
        let (x, y) = if offset {
            (point.x - self.offset.x, point.y - self.offset.y)
        } else {
            (point.x, point.y)
        };
        match &self.slide {
            None => Displacement::Lift(y / self.alpha.sin()),
            Some(_) => Displacement::SlideLift {
                slide: x,
                lift: y / self.alpha.sin(),
            },
        }
    }

    /// Issue non-blocking moves taking the motors to `target`; with
    /// `relative` the target is added to the current readbacks.
    pub fn set_displacement(
        &self,
        target: Displacement,
        relative: bool,
    ) -> Result<Vec<MoveHandle>, StandError> {
        debug!(joint = self.lift.name(), ?target, relative, "joint move");
        match (target, &self.slide) {
            (Displacement::Lift(lift), _) => {
                let goal = if relative { self.lift.position() + lift } else { lift };
                Ok(vec![self.lift.move_to(goal)?])
            }
            (Displacement::SlideLift { slide, lift }, Some(slide_motor)) => {
                let slide_goal = if relative {
                    slide_motor.position() + slide
                } else {
                    slide
                };
                let lift_goal = if relative { self.lift.position() + lift } else { lift };
                Ok(vec![
                    slide_motor.move_to(slide_goal)?,
                    self.lift.move_to(lift_goal)?,
                ])
            }
            (Displacement::SlideLift { slide, .. }, None) => {
                Err(StandError::UnreachablePosition {
                    joint: self.lift.name().to_string(),
                    x: slide,
                })
            }
        }
    }

    /// Move the ball joint to the requested rest coordinate.
    pub fn set_joint(&self, point: Point, offset: bool) -> Result<Vec<MoveHandle>, StandError> {
        self.set_displacement(self.invert(point, offset)?, false)
    }

    /// Stop every motor owned by the joint.
    pub fn stop(&self) {
        if let Some(slide) = &self.slide {
            slide.stop();
        }
        self.lift.stop();
    }

    /// Structural copy whose motors are soft actuators seeded to the current
    /// readbacks, so planning code can run the same kinematics without
    /// touching hardware.
    pub fn model(&self) -> AngledJoint {
        AngledJoint {
            lift: Arc::new(SoftActuator::mirror(self.lift.as_ref())),
            slide: self
                .slide
                .as_ref()
                .map(|slide| Arc::new(SoftActuator::mirror(slide.as_ref())) as Arc<dyn Actuator>),
            offset: self.offset,
            alpha: self.alpha,
        }
    }
}

impl fmt::Display for AngledJoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AngledJoint at {}", self.joint())
    }
}

/// Joints are the same joint when they share the same actuators, regardless
/// of where the motors currently stand. (Comparing a joint against any other
/// type does not compile, so the mismatch case of the source system cannot
/// arise here.)
impl PartialEq for AngledJoint {
    fn eq(&self, other: &Self) -> bool {
        let slides = match (&self.slide, &other.slide) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        slides && Arc::ptr_eq(&self.lift, &other.lift)
    }
}

/// The apex joint the stand pivots about. Both motors are always present and
/// the lift leans along x instead of pulling back along z.
pub struct ConeJoint {
    pub lift: Arc<dyn Actuator>,
    pub slide: Arc<dyn Actuator>,
    /// Ball position in the rest frame when all motors are at nominal zero.
    pub offset: Point,
    pub alpha: f64,
}

impl ConeJoint {
    pub fn new(lift: Arc<dyn Actuator>, slide: Arc<dyn Actuator>, offset: Point) -> Self {
        ConeJoint {
            lift,
            slide,
            offset,
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Displacement of the joint motors from the nominal zero.
    pub fn displacement(&self) -> Displacement {
        Displacement::SlideLift {
            slide: self.slide.position(),
            lift: self.lift.position(),
        }
    }

    /// Displacement of the cone joint from nominal zero as a [`Point`].
    pub fn joint(&self) -> Point {
        let (slide, lift) = self.displacement().pair();
        Point::new(
            lift * self.alpha.cos() + slide,
            lift * self.alpha.sin(),
            0.0,
        )
    }

    /// Position of the ball joint in rest coordinates.
    pub fn position(&self) -> Point {
        self.joint() + self.offset
    }

    /// Motor positions that put the ball at the requested (x, y) rest
    /// coordinate. The lift contributes to x here, so the slide compensates
    /// with `y / tan(alpha)` and the inversion never fails.
    pub fn invert(&self, point: Point, offset: bool) -> Displacement {
        let (x, y) = if offset {
            (point.x - self.offset.x, point.y - self.offset.y)
        } else {
            (point.x, point.y)
        };
        Displacement::SlideLift {
            slide: x - y / self.alpha.tan(),
            lift: y / self.alpha.sin(),
        }
    }

    /// Issue non-blocking moves taking the motors to `target`; with
    /// `relative` the target is added to the current readbacks.
    pub fn set_displacement(
        &self,
        target: Displacement,
        relative: bool,
    ) -> Result<Vec<MoveHandle>, StandError> {
        debug!(joint = self.lift.name(), ?target, relative, "joint move");
        let (slide, lift) = match target {
            Displacement::SlideLift { slide, lift } => (Some(slide), lift),
            Displacement::Lift(lift) => (None, lift),
        };
        let mut handles = Vec::new();
        if let Some(slide) = slide {
            let goal = if relative { self.slide.position() + slide } else { slide };
            handles.push(self.slide.move_to(goal)?);
        }
        let goal = if relative { self.lift.position() + lift } else { lift };
        handles.push(self.lift.move_to(goal)?);
        Ok(handles)
    }

    /// Move the ball joint to the requested rest coordinate.
    pub fn set_joint(&self, point: Point, offset: bool) -> Result<Vec<MoveHandle>, StandError> {
        self.set_displacement(self.invert(point, offset), false)
    }

    /// Stop every motor owned by the joint.
    pub fn stop(&self) {
        self.slide.stop();
        self.lift.stop();
    }

    /// Structural copy on soft actuators seeded to the current readbacks.
    pub fn model(&self) -> ConeJoint {
        ConeJoint {
            lift: Arc::new(SoftActuator::mirror(self.lift.as_ref())),
            slide: Arc::new(SoftActuator::mirror(self.slide.as_ref())),
            offset: self.offset,
            alpha: self.alpha,
        }
    }
}

impl fmt::Display for ConeJoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConeJoint at {}", self.joint())
    }
}

impl PartialEq for ConeJoint {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slide, &other.slide) && Arc::ptr_eq(&self.lift, &other.lift)
    }
}

/// Single-axis internal stage riding the platform along the detector axis.
pub struct Detector {
    pub slide: Arc<dyn Actuator>,
    /// Stage position in the rest frame when the motor is at nominal zero.
    pub offset: Point,
}

impl Detector {
    pub fn new(slide: Arc<dyn Actuator>, offset: Point) -> Self {
        Detector { slide, offset }
    }

    /// Displacement of the stage motor from the nominal zero.
    pub fn displacement(&self) -> f64 {
        self.slide.position()
    }

    /// Position of the stage in rest coordinates; the motor travels along z.
    pub fn position(&self) -> Point {
        Point::new(
            self.offset.x,
            self.offset.y,
            self.displacement() + self.offset.z,
        )
    }

    pub fn stop(&self) {
        self.slide.stop();
    }

    /// Structural copy on a soft actuator seeded to the current readback.
    pub fn model(&self) -> Detector {
        Detector {
            slide: Arc::new(SoftActuator::mirror(self.slide.as_ref())),
            offset: self.offset,
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Detector at {}", self.position())
    }
}
