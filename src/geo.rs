//! Great-circle geometry on a spherical Earth.
//!
//! Coordinates are validated once on construction so the distance
//! function never sees out-of-range or non-finite input.

use crate::proximity::ProximityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting latitudes outside [-90, 90],
    /// longitudes outside [-180, 180], and NaN/infinite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ProximityError> {
        if !is_valid(latitude, longitude) {
            return Err(ProximityError::InvalidCoordinate { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Great-circle distance to `other`, in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coords(self.latitude, self.longitude))
    }
}

/// True when both components are finite and within their geographic range.
pub fn is_valid(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Haversine great-circle distance between two points, in meters.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    // Rounding can push `h` a hair outside [0, 1] for near-antipodal points.
    let h = ((dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Format coordinates with hemisphere letters, e.g. "50.8503°N, 4.3517°E".
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_distance_symmetric() {
        let pairs = [
            (coord(50.8503, 4.3517), coord(51.2194, 4.4025)),
            (coord(-33.8688, 151.2093), coord(40.7128, -74.0060)),
            (coord(0.0, 179.9), coord(0.0, -179.9)),
            (coord(89.9, 0.0), coord(-89.9, 180.0)),
        ];
        for (a, b) in pairs {
            assert_abs_diff_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for c in [coord(50.8503, 4.3517), coord(-90.0, 180.0), coord(0.0, 0.0)] {
            assert_abs_diff_eq!(c.distance_to(&c), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let d = haversine_distance(&coord(0.0, 0.0), &coord(0.0, 1.0));
        assert_relative_eq!(d, 111_195.0, max_relative = 0.01);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine_distance(&coord(0.0, 0.0), &coord(0.0, 180.0));
        assert!(d.is_finite());
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_M, max_relative = 1e-9);
    }

    #[test]
    fn test_brussels_antwerp() {
        // Grand-Place to Antwerp Central, roughly 41 km as the crow flies.
        let d = haversine_distance(&coord(50.8467, 4.3525), &coord(51.2172, 4.4211));
        assert!(d > 40_000.0 && d < 42_500.0, "got {d}");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(91.0, 0.0),
            Err(ProximityError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::new(0.0, -181.0).is_err());
        assert!(Coordinate::new(f64::NAN, 4.0).is_err());
        assert!(Coordinate::new(50.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(50.8503, 4.3517), "50.8503\u{00B0}N, 4.3517\u{00B0}E");
        assert_eq!(format_coords(-33.8688, -70.5), "33.8688\u{00B0}S, 70.5000\u{00B0}W");
    }
}
