//! Hardcoded geometries for a few stands

use crate::geometry::StandGeometry;
use crate::points::Point;

#[allow(dead_code)]
impl StandGeometry {
    /// Full-size hutch detector stand: rear joints 343 mm either side of the
    /// cone and 610 mm behind it, detector stage riding below the platform.
    /// All dimensions in mm.
    pub fn hutch_detector_stand() -> Self {
        StandGeometry {
            cone: Point::new(0.0, 0.0, 0.0),
            flat: Point::new(-342.9, 361.404, -609.6508),
            vee: Point::new(342.9, 361.404, -609.6508),
            detector: Point::new(0.0, 480.0346, -914.5524),
            ..Self::new()
        }
    }

    /// Compact bench rig: rear joints 10 mm either side of the cone and
    /// 20 mm behind it. Small enough that the angles from modest motor moves
    /// are large and easy to eyeball, which is what the demo binary and the
    /// test suite want.
    pub fn bench_stand() -> Self {
        StandGeometry {
            cone: Point::new(0.0, 0.0, 0.0),
            flat: Point::new(-10.0, 0.0, -20.0),
            vee: Point::new(10.0, 0.0, -20.0),
            detector: Point::new(0.0, 1.0, 0.0),
            ..Self::new()
        }
    }
}
