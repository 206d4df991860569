use serde::{Deserialize, Serialize};

use crate::planet::PlanetModel;
use crate::MINIMUM_RESOLUTION;

/// A point lying on the planet surface.
///
/// Points are produced by the plane-intersection and sampling routines, or
/// from latitude/longitude; they are never mutated afterwards. Coordinates
/// are planet-centered, in the same units as the planet's semi-axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Construct an on-surface point from latitude and longitude (radians).
    ///
    /// Uses the parametric form of the ellipsoid, so the result satisfies
    /// the surface equation exactly up to rounding.
    pub fn from_lat_lon(planet: &PlanetModel, lat: f64, lon: f64) -> Self {
        let cos_lat = lat.cos();
        Self {
            x: planet.ab * cos_lat * lon.cos(),
            y: planet.ab * cos_lat * lon.sin(),
            z: planet.c * lat.sin(),
        }
    }

    /// Parametric latitude in radians, inverting [`GeoPoint::from_lat_lon`].
    pub fn latitude(&self, planet: &PlanetModel) -> f64 {
        let equatorial = (self.x * self.x + self.y * self.y).sqrt();
        (self.z * planet.inverse_c).atan2(equatorial * planet.inverse_ab)
    }

    /// Longitude in radians.
    pub fn longitude(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// True if both points are coincident within the minimum resolution.
    pub fn is_identical(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < MINIMUM_RESOLUTION
            && (self.y - other.y).abs() < MINIMUM_RESOLUTION
            && (self.z - other.z).abs() < MINIMUM_RESOLUTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_from_lat_lon_on_sphere_surface() {
        let planet = PlanetModel::SPHERE;
        let p = GeoPoint::from_lat_lon(&planet, 0.3, -1.2);
        assert!(planet.is_on_surface(p.x, p.y, p.z));
    }

    #[test]
    fn test_from_lat_lon_on_wgs84_surface() {
        let planet = PlanetModel::wgs84();
        let p = GeoPoint::from_lat_lon(&planet, -0.7, 2.1);
        assert!(planet.is_on_surface(p.x, p.y, p.z));
    }

    #[test]
    fn test_lat_lon_round_trip() {
        let planet = PlanetModel::wgs84();
        let p = GeoPoint::from_lat_lon(&planet, FRAC_PI_4, -0.9);
        assert_abs_diff_eq!(p.latitude(&planet), FRAC_PI_4, epsilon = 1e-12);
        assert_abs_diff_eq!(p.longitude(), -0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_equator_prime_meridian() {
        let planet = PlanetModel::SPHERE;
        let p = GeoPoint::from_lat_lon(&planet, 0.0, 0.0);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_identical() {
        let a = GeoPoint::new(0.5, 0.25, 0.1);
        let b = GeoPoint::new(0.5 + 1e-13, 0.25, 0.1 - 1e-13);
        let c = GeoPoint::new(0.5 + 1e-9, 0.25, 0.1);
        assert!(a.is_identical(&b));
        assert!(!a.is_identical(&c));
    }
}
