//! Points and the reference frames they live in.
//!
//! The stand is viewed through three frames. The *rest frame* ignores any
//! rotation or translation: every motor sits at nominal zero and all joints
//! point vertically upwards. Shifting the origin to the current position of
//! the cone joint ball (the apex the rigid body pivots about) gives the
//! *stand frame*. Rotating the stand frame by the platform's pitch, yaw and
//! roll gives the *room frame*, the coordinates of the surrounding hutch.
//!
//! [`StandPoint`] walks a rest-frame point through these frames: seed it with
//! an offset relative to the cone joint, then read
//! [`stand_coordinates`](StandPoint::stand_coordinates) or
//! [`room_coordinates`](StandPoint::room_coordinates) to see where the point
//! sits as the stand moves. Both views are recomputed from the stand's
//! current state on every read, never cached.

use std::fmt;
use std::ops::{Add, Sub};

use nalgebra::Vector3;

use crate::stand::Stand;
use crate::stand_error::StandError;

/// Location or displacement as an immutable (x, y, z) triple.
///
/// Whether a `Point` is a position or a displacement depends on context; all
/// joint math treats it as a plain value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x,y,z -> {},{},{})", self.x, self.y, self.z)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl From<Point> for Vector3<f64> {
    fn from(point: Point) -> Self {
        Vector3::new(point.x, point.y, point.z)
    }
}

impl From<Vector3<f64>> for Point {
    fn from(vector: Vector3<f64>) -> Self {
        Point::new(vector.x, vector.y, vector.z)
    }
}

impl TryFrom<&[f64]> for Point {
    type Error = StandError;

    /// Strict conversion from a slice; anything but exactly three components
    /// is a type mismatch.
    fn try_from(components: &[f64]) -> Result<Self, StandError> {
        match components {
            [x, y, z] => Ok(Point::new(*x, *y, *z)),
            _ => Err(StandError::TypeMismatch(format!(
                "expected 3 point components, found {}",
                components.len()
            ))),
        }
    }
}

/// A rest-frame point tied to a [`Stand`].
///
/// The derived views are only valid for the stand's current angle estimate
/// and actuator positions at the moment of access.
pub struct StandPoint<'a> {
    /// Location of the point in the rest frame.
    pub offset: Point,
    pub stand: &'a Stand,
}

impl<'a> StandPoint<'a> {
    pub fn new(offset: Point, stand: &'a Stand) -> Self {
        StandPoint { offset, stand }
    }

    /// The coordinates of the point in the stand reference frame.
    pub fn stand_coordinates(&self) -> Point {
        self.stand.stand_coordinates(self.offset)
    }

    /// The coordinates of the point in the reference frame of the room.
    pub fn room_coordinates(&self) -> Point {
        self.stand.room_coordinates(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_access_and_equality() {
        let point = Point::new(1.0, 2.0, 3.0);
        assert_eq!(point.x, 1.0);
        assert_eq!(point.y, 2.0);
        assert_eq!(point.z, 3.0);
        assert_eq!(point, Point::new(1.0, 2.0, 3.0));
        assert!(point < Point::new(1.0, 2.5, 0.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Point::new(1.0, 2.0, 3.0);
        let b = Point::new(0.5, -2.0, 1.0);
        assert_eq!(a + b, Point::new(1.5, 0.0, 4.0));
        assert_eq!(a - b, Point::new(0.5, 4.0, 2.0));
    }

    #[test]
    fn test_display() {
        let point = Point::new(1.0, 2.0, 3.0);
        assert_eq!(format!("{}", point), "(x,y,z -> 1,2,3)");
    }

    #[test]
    fn test_try_from_slice() {
        let point = Point::try_from([1.0, 2.0, 3.0].as_slice())
            .expect("three components must convert");
        assert_eq!(point, Point::new(1.0, 2.0, 3.0));

        let short = Point::try_from([1.0, 2.0].as_slice());
        assert!(matches!(short, Err(StandError::TypeMismatch(_))));
    }

    #[test]
    fn test_vector_round_trip() {
        let point = Point::new(4.0, -5.0, 6.0);
        let vector: Vector3<f64> = point.into();
        assert_eq!(Point::from(vector), point);
    }
}
