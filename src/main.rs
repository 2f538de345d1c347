use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use rs_stand_kinematics::actuator::{Actuator, SoftActuator};
use rs_stand_kinematics::geometry::StandGeometry;
use rs_stand_kinematics::points::{Point, StandPoint};
use rs_stand_kinematics::utils::dump_angles;

/// Usage example on a simulated bench stand.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let geometry = StandGeometry::bench_stand();
    println!("Bench stand geometry:\n{}", geometry.to_yaml());

    // Six soft motors stand in for the hardware driver.
    let flat_lift = Arc::new(SoftActuator::new("flat:lift", 0.0));
    let vee_lift = Arc::new(SoftActuator::new("vee:lift", 0.0));
    let mut stand = geometry.build(
        Arc::new(SoftActuator::new("cone:lift", 0.0)),
        Arc::new(SoftActuator::new("cone:slide", 0.0)),
        flat_lift.clone(),
        vee_lift.clone(),
        Arc::new(SoftActuator::new("vee:slide", 0.0)),
        Arc::new(SoftActuator::new("detector", 0.0)),
    );

    // Tilt the platform by hand: opposite lift moves roll it about z.
    flat_lift.move_to(-10.0)?;
    vee_lift.move_to(10.0)?;

    println!("Angles recovered from the encoder readbacks (about 15 degrees of roll):");
    let estimate = stand.find_angles();
    dump_angles(estimate.pitch, estimate.yaw, estimate.roll);
    println!("Converged: {} after {} iterations", estimate.converged, estimate.iterations);

    println!("Rotating back; the belief is stale until the next estimate:");
    stand.rotate(0.0, 0.0, -estimate.roll, Some(Duration::from_secs(5)))?;
    println!("Belief stale after rotate: {}", stand.angles_stale());
    let estimate = stand.find_angles();
    dump_angles(estimate.pitch, estimate.yaw, estimate.roll);

    println!("Translating the whole platform by (1, 2) in room coordinates:");
    stand.translate(1.0, 2.0, Some(Duration::from_secs(5)))?;
    let cone = stand.cone.position();
    println!("Cone ball now at {}", cone);

    println!("Two-point align: hold z = -1 fixed, move z = -150 by (2, 3):");
    stand.align(-150.0, -1.0, 2.0, 3.0, 2, Some(Duration::from_secs(5)))?;
    stand.find_angles();

    let mobile = StandPoint::new(Point::new(0.0, 1.0, -150.0), &stand);
    println!("Mobile point now at {}", mobile.room_coordinates());

    Ok(())
}
