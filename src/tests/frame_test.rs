use std::f64::consts::PI;
use std::sync::Arc;

use crate::actuator::SoftActuator;
use crate::geometry::StandGeometry;
use crate::points::{Point, StandPoint};
use crate::stand::Stand;

/// A stand whose cone ball sits at (4, 5): vertical lifts so the cone slide
/// and lift read back as x and y directly.
fn stand_with_cone_at_4_5() -> Stand {
    let geometry = StandGeometry {
        alpha: PI / 2.0,
        ..StandGeometry::new()
    };
    geometry.build(
        Arc::new(SoftActuator::new("cone:lift", 5.0)),
        Arc::new(SoftActuator::new("cone:slide", 4.0)),
        Arc::new(SoftActuator::new("flat:lift", 0.0)),
        Arc::new(SoftActuator::new("vee:lift", 0.0)),
        Arc::new(SoftActuator::new("vee:slide", 0.0)),
        Arc::new(SoftActuator::new("detector", 0.0)),
    )
}

#[test]
fn test_stand_coordinates() {
    let stand = stand_with_cone_at_4_5();
    let point = StandPoint::new(Point::new(1.0, 2.0, 3.0), &stand);
    let coordinates = point.stand_coordinates();
    assert!((coordinates.x - 5.0).abs() < 1.0e-9);
    assert!((coordinates.y - 7.0).abs() < 1.0e-9);
    assert_eq!(coordinates.z, 3.0);
}

#[test]
fn test_room_coordinates_without_rotation() {
    let stand = stand_with_cone_at_4_5();
    let point = StandPoint::new(Point::new(1.0, 2.0, 3.0), &stand);
    let room = point.room_coordinates();
    let expected = point.stand_coordinates();
    assert!((room.x - expected.x).abs() < 1.0e-9);
    assert!((room.y - expected.y).abs() < 1.0e-9);
    assert!((room.z - expected.z).abs() < 1.0e-9);
}

#[test]
fn test_room_coordinates_90_degree_pitch() {
    let mut stand = stand_with_cone_at_4_5();
    stand.pitch = PI / 2.0;

    let room = stand.room_coordinates(Point::new(1.0, 2.0, 3.0));
    assert!((room.x - 5.0).abs() < 1.0e-9);
    assert!((room.y - -3.0).abs() < 1.0e-9);
    assert!((room.z - 7.0).abs() < 1.0e-9);
}

#[test]
fn test_room_coordinates_90_degree_yaw() {
    let mut stand = stand_with_cone_at_4_5();
    stand.yaw = PI / 2.0;

    let room = stand.room_coordinates(Point::new(1.0, 2.0, 3.0));
    assert!((room.x - 3.0).abs() < 1.0e-9);
    assert!((room.y - 7.0).abs() < 1.0e-9);
    assert!((room.z - -5.0).abs() < 1.0e-9);
}

#[test]
fn test_room_coordinates_90_degree_roll() {
    let mut stand = stand_with_cone_at_4_5();
    stand.roll = PI / 2.0;

    let room = stand.room_coordinates(Point::new(1.0, 2.0, 3.0));
    assert!((room.x - -7.0).abs() < 1.0e-9);
    assert!((room.y - 5.0).abs() < 1.0e-9);
    assert!((room.z - 3.0).abs() < 1.0e-9);
}

#[test]
fn test_room_coordinates_follow_the_current_belief() {
    let mut stand = stand_with_cone_at_4_5();
    let offset = Point::new(1.0, 2.0, 3.0);

    let before = stand.room_coordinates(offset);
    stand.roll = PI / 2.0;
    let after = stand.room_coordinates(offset);

    // Nothing is cached across an angle change.
    assert!((before.x - 5.0).abs() < 1.0e-9);
    assert!((after.x - -7.0).abs() < 1.0e-9);
}
