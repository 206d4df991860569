use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::geometry::vector::Axis;
use crate::MINIMUM_RESOLUTION;

/// The ellipsoid (or sphere) all geo-points and bounding solids live on.
///
/// The model is an ellipsoid of revolution: `ab` is the semi-axis along x
/// and y, `c` the semi-axis along z. A point (x, y, z) is on the surface
/// when `x²/ab² + y²/ab² + z²/c² = 1`. Inverses are precomputed because the
/// intersection solver evaluates the quadratic form repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetModel {
    pub ab: f64,
    pub c: f64,
    pub inverse_ab: f64,
    pub inverse_c: f64,
    pub inverse_ab_squared: f64,
    pub inverse_c_squared: f64,
}

impl PlanetModel {
    /// Unit sphere.
    pub const SPHERE: Self = Self {
        ab: 1.0,
        c: 1.0,
        inverse_ab: 1.0,
        inverse_c: 1.0,
        inverse_ab_squared: 1.0,
        inverse_c_squared: 1.0,
    };

    pub fn new(ab: f64, c: f64) -> Self {
        let inverse_ab = 1.0 / ab;
        let inverse_c = 1.0 / c;
        Self {
            ab,
            c,
            inverse_ab,
            inverse_c,
            inverse_ab_squared: inverse_ab * inverse_ab,
            inverse_c_squared: inverse_c * inverse_c,
        }
    }

    /// WGS84 ellipsoid, normalized to mean-radius units.
    pub fn wgs84() -> Self {
        Self::new(1.0011188539924791, 0.9977622920221051)
    }

    /// Smallest coordinate value the surface reaches along `axis`.
    pub fn minimum_value(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X | Axis::Y => -self.ab,
            Axis::Z => -self.c,
        }
    }

    /// Largest coordinate value the surface reaches along `axis`.
    pub fn maximum_value(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X | Axis::Y => self.ab,
            Axis::Z => self.c,
        }
    }

    /// Evaluate the surface quadratic form at (x, y, z); zero on the surface.
    pub fn surface_evaluation(&self, x: f64, y: f64, z: f64) -> f64 {
        x * x * self.inverse_ab_squared
            + y * y * self.inverse_ab_squared
            + z * z * self.inverse_c_squared
            - 1.0
    }

    /// True if (x, y, z) lies on the surface within the minimum resolution.
    pub fn is_on_surface(&self, x: f64, y: f64, z: f64) -> bool {
        self.surface_evaluation(x, y, z).abs() < MINIMUM_RESOLUTION
    }
}

impl Eq for PlanetModel {}

impl Hash for PlanetModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // The inverses are derived from ab and c; hashing the semi-axes is
        // consistent with PartialEq over all fields.
        self.ab.to_bits().hash(state);
        self.c.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sphere_bounds() {
        let planet = PlanetModel::SPHERE;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert_eq!(planet.minimum_value(axis), -1.0);
            assert_eq!(planet.maximum_value(axis), 1.0);
        }
    }

    #[test]
    fn test_wgs84_is_oblate() {
        let planet = PlanetModel::wgs84();
        assert!(planet.ab > 1.0);
        assert!(planet.c < 1.0);
        assert!(planet.maximum_value(Axis::Z) < planet.maximum_value(Axis::X));
        assert_abs_diff_eq!(planet.inverse_ab * planet.ab, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(planet.inverse_c * planet.c, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_surface_membership() {
        let planet = PlanetModel::SPHERE;
        assert!(planet.is_on_surface(1.0, 0.0, 0.0));
        assert!(planet.is_on_surface(0.0, 0.5, -(0.75f64.sqrt())));
        assert!(!planet.is_on_surface(0.0, 0.0, 0.0));
        assert!(!planet.is_on_surface(1.0, 1.0, 1.0));

        let wgs84 = PlanetModel::wgs84();
        assert!(wgs84.is_on_surface(wgs84.ab, 0.0, 0.0));
        assert!(wgs84.is_on_surface(0.0, 0.0, wgs84.c));
        assert!(!wgs84.is_on_surface(1.0, 0.0, 0.01));
    }
}
