use std::f64::consts::PI;
use std::time::Duration;

use crate::actuator::{Actuator, MoveHandle, MoveStatus};
use crate::joints::Displacement;
use crate::points::Point;
use crate::stand_error::StandError;
use crate::tests::test_utils::bench_stand;

const DEGREE: f64 = PI / 180.0;

#[test]
fn test_translate_round_trip() {
    let bench = bench_stand();
    let stand = &bench.stand;

    stand.translate(1.0, 2.0, None).unwrap();
    assert!((stand.cone.position().x - 1.0).abs() < 1.0e-4);
    assert!((stand.cone.position().y - 2.0).abs() < 1.0e-4);
    assert!((stand.vee.position().x - 11.0).abs() < 1.0e-4);
    assert!((stand.vee.position().y - 2.0).abs() < 1.0e-4);
    assert!((stand.flat.position().y - 2.0).abs() < 1.0e-4);

    stand.translate(4.0, 1.0, None).unwrap();
    assert!((stand.cone.position().x - 5.0).abs() < 1.0e-4);
    assert!((stand.cone.position().y - 3.0).abs() < 1.0e-4);

    // The displacements are additive: the inverse request restores every
    // joint to where it started.
    stand.translate(-5.0, -3.0, None).unwrap();
    assert!(stand.cone.position().x.abs() < 1.0e-4);
    assert!(stand.cone.position().y.abs() < 1.0e-4);
    assert!((stand.vee.position().x - 10.0).abs() < 1.0e-4);
    assert!(stand.vee.position().y.abs() < 1.0e-4);
    assert!((stand.vee.position().z + 20.0).abs() < 1.0e-4);
    assert!((stand.flat.position().x + 10.0).abs() < 1.0e-4);
    assert!(stand.flat.position().y.abs() < 1.0e-4);
    assert!((stand.flat.position().z + 20.0).abs() < 1.0e-4);
}

#[test]
fn test_translate_keeps_the_belief() {
    let mut bench = bench_stand();
    bench.stand.find_angles();
    bench.stand.translate(1.0, 2.0, None).unwrap();
    // A pure translation does not turn the platform.
    assert!(!bench.stand.angles_stale());
}

#[test]
fn test_rotate_recovers_angles() {
    let mut bench = bench_stand();
    let stand = &mut bench.stand;
    stand.find_angles();

    stand
        .rotate(PI / 180.0, PI / 60.0, PI / 90.0, None)
        .unwrap();
    assert!(stand.angles_stale());

    stand.find_angles();
    assert!((stand.pitch - PI / 180.0).abs() < DEGREE);
    assert!((stand.yaw - PI / 60.0).abs() < DEGREE);
    assert!((stand.roll - PI / 90.0).abs() < DEGREE);

    // Cross-check the pitch against the raw joint heights.
    let rear_height =
        (stand.flat.position().y + stand.vee.position().y) / 2.0 - stand.cone.position().y;
    assert!((stand.pitch.tan() - rear_height / 20.0).abs() < 0.01);

    stand
        .rotate(-PI / 180.0, -PI / 60.0, -PI / 90.0, None)
        .unwrap();
    stand.find_angles();
    assert!(stand.pitch.abs() < DEGREE);
    assert!(stand.yaw.abs() < DEGREE);
    assert!(stand.roll.abs() < DEGREE);
}

#[test]
fn test_align_two_points() {
    let mut bench = bench_stand();
    let stand = &mut bench.stand;
    stand.find_angles();

    // Watch one point near the detector origin and one far down the axis.
    let fixed = Point::new(0.0, 1.0, -1.0);
    let mobile = Point::new(0.0, 1.0, -150.0);
    let origin = stand.room_coordinates(fixed);
    let start = stand.room_coordinates(mobile);

    stand.align(-150.0, -1.0, 2.0, 3.0, 2, None).unwrap();
    assert!(stand.angles_stale());
    stand.find_angles();

    let held = stand.room_coordinates(fixed);
    let moved = stand.room_coordinates(mobile);
    assert!((held.x - origin.x).abs() < 0.01);
    assert!((held.y - origin.y).abs() < 0.01);
    assert!((moved.x - (start.x + 2.0)).abs() < 0.01);
    assert!((moved.y - (start.y + 3.0)).abs() < 0.01);

    // A second alignment composes on top of the first.
    stand.align(-150.0, -1.0, -4.0, 6.0, 2, None).unwrap();
    stand.find_angles();

    let held = stand.room_coordinates(fixed);
    let moved = stand.room_coordinates(mobile);
    assert!((held.x - origin.x).abs() < 0.1);
    assert!((held.y - origin.y).abs() < 0.1);
    assert!((moved.x - (start.x - 2.0)).abs() < 0.1);
    assert!((moved.y - (start.y + 9.0)).abs() < 0.1);
}

#[test]
fn test_model_shares_no_state() {
    let mut bench = bench_stand();
    bench.vee_lift.move_to(3.0).unwrap();
    bench.stand.pitch = 0.25;

    let model = bench.stand.model();
    assert_eq!(model.pitch, 0.25);
    assert_eq!(
        model.vee.displacement(),
        Displacement::SlideLift { slide: 0.0, lift: 3.0 }
    );

    // Driving the model leaves the real motors where they stand.
    model
        .vee
        .set_displacement(Displacement::SlideLift { slide: 1.0, lift: -1.0 }, false)
        .unwrap();
    model.translate(5.0, 5.0, None).unwrap();
    assert_eq!(bench.vee_lift.position(), 3.0);
    assert_eq!(bench.vee_slide.position(), 0.0);
    assert_eq!(bench.cone_lift.position(), 0.0);
}

#[test]
fn test_from_model_commits_displacements() {
    let mut bench = bench_stand();
    bench.stand.find_angles();

    let model = bench.stand.model();
    model.translate(1.0, 2.0, None).unwrap();

    bench.stand.from_model(&model, None).unwrap();
    assert_eq!(bench.stand.cone.displacement(), model.cone.displacement());
    assert_eq!(bench.stand.flat.displacement(), model.flat.displacement());
    assert_eq!(bench.stand.vee.displacement(), model.vee.displacement());
    // Committing moved motors the belief knows nothing about.
    assert!(bench.stand.angles_stale());
}

/// Actuator whose moves never finish, to drive the waited-operation abort.
struct StuckActuator {
    name: String,
}

struct StuckMove {
    name: String,
}

impl Actuator for StuckActuator {
    fn position(&self) -> f64 {
        0.0
    }

    fn move_to(&self, _target: f64) -> Result<MoveHandle, StandError> {
        Ok(Box::new(StuckMove {
            name: self.name.clone(),
        }))
    }

    fn stop(&self) {}

    fn name(&self) -> &str {
        &self.name
    }

    fn limits(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}

impl MoveStatus for StuckMove {
    fn done(&self) -> bool {
        false
    }

    fn wait(&self, timeout: Duration) -> Result<(), StandError> {
        Err(StandError::MoveTimeout {
            name: self.name.clone(),
            timeout,
        })
    }
}

#[test]
fn test_failed_wait_stops_every_joint() {
    use std::sync::Arc;
    use crate::actuator::SoftActuator;
    use crate::geometry::StandGeometry;

    let cone_lift = Arc::new(SoftActuator::new("cone:lift", 0.0));
    let cone_slide = Arc::new(SoftActuator::new("cone:slide", 0.0));
    let flat_lift = Arc::new(SoftActuator::new("flat:lift", 0.0));
    let vee_slide = Arc::new(SoftActuator::new("vee:slide", 0.0));
    let stand = StandGeometry::bench_stand().build(
        cone_lift.clone(),
        cone_slide.clone(),
        flat_lift.clone(),
        Arc::new(StuckActuator { name: "vee:lift".to_string() }),
        vee_slide.clone(),
        Arc::new(SoftActuator::new("detector", 0.0)),
    );

    let fault = stand.translate(1.0, 2.0, Some(Duration::from_millis(100)));
    assert!(matches!(fault, Err(StandError::MoveTimeout { .. })));

    // Best-effort halt: every joint of the stand was told to stop.
    assert!(cone_lift.stopped());
    assert!(cone_slide.stopped());
    assert!(flat_lift.stopped());
    assert!(vee_slide.stopped());
}
