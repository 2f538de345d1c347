//! Supports reading the stand geometry from YAML file (optional)

use std::path::Path;

use tracing::warn;
use yaml_rust2::{Yaml, YamlLoader};

use crate::geometry::StandGeometry;
use crate::points::Point;
use crate::stand_error::StandError;

impl StandGeometry {
    /// Read the stand geometry from a YAML file. YAML file like this is
    /// supported:
    /// ```yaml
    /// stand_geometry:
    ///   alpha: deg(15.0)
    ///   cone_offset: [0.0, 0.0, 0.0]
    ///   flat_offset: [-342.9, 361.404, -609.6508]
    ///   vee_offset: [342.9, 361.404, -609.6508]
    ///   detector_offset: [0.0, 480.0346, -914.5524]
    /// ```
    /// All keys under `stand_geometry` are optional and default to
    /// [`StandGeometry::new`]. The angle is radians when numeric; the
    /// `deg(angle)` form is degrees. An offset that is not a 3-component
    /// numeric array is not an error: a warning is logged and the origin is
    /// substituted.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, StandError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Read the stand geometry from a YAML string; see
    /// [`from_yaml_file`](StandGeometry::from_yaml_file) for the format.
    pub fn from_yaml(contents: &str) -> Result<Self, StandError> {
        let documents = YamlLoader::load_from_str(contents)
            .map_err(|err| StandError::ParseError(format!("{}", err)))?;
        let root = documents
            .first()
            .ok_or_else(|| StandError::ParseError("empty YAML document".to_string()))?;

        let geometry = &root["stand_geometry"];
        if geometry.is_badvalue() {
            return Err(StandError::MissingField("stand_geometry".to_string()));
        }

        let mut result = StandGeometry::new();
        if !geometry["alpha"].is_badvalue() {
            result.alpha = angle(&geometry["alpha"])?;
        }
        if !geometry["cone_offset"].is_badvalue() {
            result.cone = offset_or_origin(&geometry["cone_offset"], "cone_offset");
        }
        if !geometry["flat_offset"].is_badvalue() {
            result.flat = offset_or_origin(&geometry["flat_offset"], "flat_offset");
        }
        if !geometry["vee_offset"].is_badvalue() {
            result.vee = offset_or_origin(&geometry["vee_offset"], "vee_offset");
        }
        if !geometry["detector_offset"].is_badvalue() {
            result.detector = offset_or_origin(&geometry["detector_offset"], "detector_offset");
        }
        Ok(result)
    }
}

/// Numeric scalar, whether the YAML parser saw a real or an integer.
fn number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Real(_) => value.as_f64(),
        Yaml::Integer(whole) => Some(*whole as f64),
        _ => None,
    }
}

/// An angle is radians when numeric, or degrees in the `deg(angle)` form.
fn angle(value: &Yaml) -> Result<f64, StandError> {
    if let Some(radians) = number(value) {
        return Ok(radians);
    }
    if let Some(text) = value.as_str() {
        if let Some(body) = text
            .trim()
            .strip_prefix("deg(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return body
                .trim()
                .parse::<f64>()
                .map(f64::to_radians)
                .map_err(|err| StandError::ParseError(format!("bad angle '{}': {}", text, err)));
        }
    }
    Err(StandError::ParseError(format!(
        "cannot read an angle from {:?}",
        value
    )))
}

/// Lenient offset reading: anything that is not a 3-component numeric array
/// logs a warning and falls back to the origin.
fn offset_or_origin(value: &Yaml, field: &str) -> Point {
    let components: Vec<f64> = value
        .as_vec()
        .map(|items| items.iter().filter_map(number).collect())
        .unwrap_or_default();
    match Point::try_from(components.as_slice()) {
        Ok(point) => point,
        Err(fault) => {
            warn!(field, %fault, "substituting the origin for a malformed offset");
            Point::ORIGIN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_geometry() {
        let geometry = StandGeometry::from_yaml(
            "stand_geometry:\n\
            \x20 alpha: deg(15.0)\n\
            \x20 cone_offset: [0.0, 0.0, 0.0]\n\
            \x20 flat_offset: [-342.9, 361.404, -609.6508]\n\
            \x20 vee_offset: [342.9, 361.404, -609.6508]\n\
            \x20 detector_offset: [0, 480.0346, -914.5524]\n",
        )
        .expect("well-formed geometry must parse");

        assert!((geometry.alpha - 15.0_f64.to_radians()).abs() < 1.0e-9);
        assert_eq!(geometry.flat, Point::new(-342.9, 361.404, -609.6508));
        assert_eq!(geometry.vee, Point::new(342.9, 361.404, -609.6508));
        // The integer zero must read like the float zero.
        assert_eq!(geometry.detector.x, 0.0);
    }

    #[test]
    fn test_defaults_apply_when_keys_are_missing() {
        let geometry = StandGeometry::from_yaml("stand_geometry:\n  alpha: 0.3\n")
            .expect("partial geometry must parse");
        assert_eq!(geometry.alpha, 0.3);
        assert_eq!(geometry.cone, Point::ORIGIN);
    }

    #[test]
    fn test_missing_root_key() {
        let fault = StandGeometry::from_yaml("something_else: 1\n");
        assert!(matches!(fault, Err(StandError::MissingField(_))));
    }

    #[test]
    fn test_malformed_offset_falls_back_to_origin() {
        let geometry = StandGeometry::from_yaml(
            "stand_geometry:\n\
            \x20 vee_offset: [1.0, 2.0]\n\
            \x20 flat_offset: [1.0, fast, 3.0]\n",
        )
        .expect("malformed offsets are lenient, not fatal");
        assert_eq!(geometry.vee, Point::ORIGIN);
        assert_eq!(geometry.flat, Point::ORIGIN);
    }

    #[test]
    fn test_bad_angle_is_fatal() {
        let fault = StandGeometry::from_yaml("stand_geometry:\n  alpha: steep\n");
        assert!(matches!(fault, Err(StandError::ParseError(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let source = StandGeometry::hutch_detector_stand();
        let restored = StandGeometry::from_yaml(&source.to_yaml())
            .expect("rendered geometry must parse back");
        assert!((restored.alpha - source.alpha).abs() < 1.0e-6);
        assert_eq!(restored.flat, source.flat);
        assert_eq!(restored.vee, source.vee);
        assert_eq!(restored.detector, source.detector);
    }
}
