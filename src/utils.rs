//! Helper functions

/// Print pitch, yaw and roll, converting radians to degrees.
#[allow(dead_code)]
pub fn dump_angles(pitch: f64, yaw: f64, roll: f64) {
    println!(
        "[pitch {:6.2}  yaw {:6.2}  roll {:6.2}]",
        pitch.to_degrees(),
        yaw.to_degrees(),
        roll.to_degrees()
    );
}

/// formatting for YAML output
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("deg({:.4})", x.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg_formatting() {
        assert_eq!(deg(&0.0), "0");
        assert_eq!(deg(&std::f64::consts::FRAC_PI_2), "deg(90.0000)");
    }
}
