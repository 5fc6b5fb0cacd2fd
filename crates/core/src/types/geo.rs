//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers (IUGG).
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A latitude/longitude pair in decimal degrees.
///
/// Latitude comes first everywhere in this codebase; provider payloads that
/// use `lon lat` ordering are swapped at the parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometers (haversine formula).
    ///
    /// Accurate to ~0.5% against a geodesic model, which is ample for
    /// ranking delivery candidates within one city.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinates::new(55.753_93, 37.620_795);
        assert!((p.distance_km(&p)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(55.753_93, 37.620_795);
        let b = Coordinates::new(59.938_78, 30.314_4);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_moscow_to_saint_petersburg() {
        // Red Square to Palace Square, roughly 635 km
        let moscow = Coordinates::new(55.753_93, 37.620_795);
        let petersburg = Coordinates::new(59.938_78, 30.314_4);
        let km = moscow.distance_km(&petersburg);
        assert!((km - 635.0).abs() < 5.0, "got {km} km");
    }

    #[test]
    fn test_short_distance() {
        // ~1.11 km per 0.01 degree of latitude
        let a = Coordinates::new(55.75, 37.62);
        let b = Coordinates::new(55.76, 37.62);
        let km = a.distance_km(&b);
        assert!((km - 1.11).abs() < 0.02, "got {km} km");
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = Coordinates::new(55.75, 37.62);
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Coordinates = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
