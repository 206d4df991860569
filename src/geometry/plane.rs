use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::point::GeoPoint;
use super::vector::Vec3;
use crate::planet::PlanetModel;
use crate::{MINIMUM_RESOLUTION, MINIMUM_RESOLUTION_SQUARED};

/// Closed point-set membership, used to filter intersection candidates.
///
/// A sided plane contains its closed half-space; a plain plane contains only
/// the points lying on it (within resolution). Bounding solids pass their
/// remaining constraints through this trait so that an intersection point
/// which is mathematically valid but outside the solid is discarded.
pub trait Membership {
    fn contains(&self, x: f64, y: f64, z: f64) -> bool;

    fn contains_point(&self, point: &GeoPoint) -> bool {
        self.contains(point.x, point.y, point.z)
    }
}

/// An infinite plane in planet-centered space: the set `normal·p + d = 0`.
///
/// The normal is unit length by construction. Equality and hashing are exact
/// over the coordinate bits; coordinates are finite by construction, so the
/// manual `Eq` is sound. Geometric coincidence checks go through
/// [`Plane::coincides_with`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f64,
}

impl Plane {
    pub fn new(normal: Vec3, d: f64) -> Self {
        Self { normal, d }
    }

    /// Signed evaluation of the plane equation at (x, y, z).
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.normal.x * x + self.normal.y * y + self.normal.z * z + self.d
    }

    /// True if (x, y, z) lies on the plane within the minimum resolution.
    pub fn evaluate_is_zero(&self, x: f64, y: f64, z: f64) -> bool {
        self.evaluate(x, y, z).abs() < MINIMUM_RESOLUTION
    }

    /// True if both planes describe the same point set with the same
    /// orientation, within the minimum resolution.
    pub fn coincides_with(&self, other: &Plane) -> bool {
        (self.normal.x - other.normal.x).abs() < MINIMUM_RESOLUTION
            && (self.normal.y - other.normal.y).abs() < MINIMUM_RESOLUTION
            && (self.normal.z - other.normal.z).abs() < MINIMUM_RESOLUTION
            && (self.d - other.d).abs() < MINIMUM_RESOLUTION
    }

    /// Points lying simultaneously on this plane, on `other`, and on the
    /// planet surface, restricted to those satisfying every bound.
    ///
    /// The two planes intersect in a line; the line meets the quadratic
    /// surface in at most two points, so this returns 0, 1, or 2 points.
    /// Parallel or coincident planes, and lines missing the surface, yield
    /// an empty result rather than an error.
    pub fn find_intersections(
        &self,
        planet: &PlanetModel,
        other: &Plane,
        bounds: &[&dyn Membership],
    ) -> Vec<GeoPoint> {
        let direction = self.normal.cross(&other.normal);
        if direction.length() < MINIMUM_RESOLUTION {
            // Parallel or coincident; no line of intersection.
            return Vec::new();
        }

        // Closed-form point on both planes. With unit normals n1, n2 and
        // right-hand sides r1, r2, the point c1*n1 + c2*n2 satisfies both
        // plane equations.
        let k = self.normal.dot(&other.normal);
        let denom = 1.0 - k * k;
        if denom.abs() < MINIMUM_RESOLUTION_SQUARED {
            return Vec::new();
        }
        let r1 = -self.d;
        let r2 = -other.d;
        let c1 = (r1 - r2 * k) / denom;
        let c2 = (r2 - r1 * k) / denom;
        let origin = self.normal * c1 + other.normal * c2;

        // Substitute origin + t*direction into the ellipsoid equation.
        let a = direction.x * direction.x * planet.inverse_ab_squared
            + direction.y * direction.y * planet.inverse_ab_squared
            + direction.z * direction.z * planet.inverse_c_squared;
        let b = 2.0
            * (origin.x * direction.x * planet.inverse_ab_squared
                + origin.y * direction.y * planet.inverse_ab_squared
                + origin.z * direction.z * planet.inverse_c_squared);
        let c = planet.surface_evaluation(origin.x, origin.y, origin.z);

        let discriminant = b * b - 4.0 * a * c;
        let roots: [Option<f64>; 2] = if discriminant.abs() < MINIMUM_RESOLUTION_SQUARED {
            // Tangent line: a repeated root, one candidate point.
            [Some(-b / (2.0 * a)), None]
        } else if discriminant > 0.0 {
            let sqrt_disc = discriminant.sqrt();
            [
                Some((-b + sqrt_disc) / (2.0 * a)),
                Some((-b - sqrt_disc) / (2.0 * a)),
            ]
        } else {
            [None, None]
        };

        let mut points = Vec::new();
        for t in roots.into_iter().flatten() {
            let position = origin + direction * t;
            let candidate = GeoPoint::new(position.x, position.y, position.z);
            if bounds.iter().all(|m| m.contains_point(&candidate)) {
                points.push(candidate);
            }
        }
        points
    }

    /// One deterministic point on this plane's intersection with the
    /// surface, disambiguated by a perpendicular construction plane.
    ///
    /// Used when a single bounding plane slices all the way through the
    /// world without any other bounding plane cutting the surface. Returns
    /// `None` only if the plane misses the surface entirely.
    pub fn sample_intersection_point(
        &self,
        planet: &PlanetModel,
        perpendicular: &Plane,
    ) -> Option<GeoPoint> {
        self.find_intersections(planet, perpendicular, &[])
            .into_iter()
            .next()
    }
}

impl Eq for Plane {}

impl Hash for Plane {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normal.x.to_bits().hash(state);
        self.normal.y.to_bits().hash(state);
        self.normal.z.to_bits().hash(state);
        self.d.to_bits().hash(state);
    }
}

impl Membership for Plane {
    // A plain plane acts as a zero-thickness constraint.
    fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        self.evaluate_is_zero(x, y, z)
    }
}

/// A plane that knows which of its half-spaces is "inside".
///
/// The inside half-space is closed: points on the plane within resolution
/// are members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidedPlane {
    pub plane: Plane,
    signum: f64,
}

impl SidedPlane {
    /// Build a sided plane whose inside half-space contains `inside`.
    ///
    /// `inside` must not lie on the plane itself.
    pub fn new(inside: Vec3, normal: Vec3, d: f64) -> Self {
        let plane = Plane::new(normal, d);
        let signum = plane.evaluate(inside.x, inside.y, inside.z).signum();
        Self { plane, signum }
    }

    /// Closed half-space membership: inside, or on the boundary within
    /// resolution.
    pub fn is_within(&self, x: f64, y: f64, z: f64) -> bool {
        let evaluation = self.plane.evaluate(x, y, z);
        if evaluation.abs() < MINIMUM_RESOLUTION {
            return true;
        }
        evaluation.signum() == self.signum
    }
}

impl Eq for SidedPlane {}

impl Hash for SidedPlane {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plane.hash(state);
        self.signum.to_bits().hash(state);
    }
}

impl Membership for SidedPlane {
    fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        self.is_within(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn x_plane(at: f64) -> Plane {
        Plane::new(Vec3::X, -at)
    }

    fn y_plane(at: f64) -> Plane {
        Plane::new(Vec3::Y, -at)
    }

    #[test]
    fn test_evaluate_and_is_zero() {
        let plane = y_plane(0.25);
        assert_abs_diff_eq!(plane.evaluate(3.0, 0.25, -7.0), 0.0, epsilon = 1e-15);
        assert!(plane.evaluate_is_zero(0.0, 0.25, 0.0));
        assert!(!plane.evaluate_is_zero(0.0, 0.26, 0.0));
        assert!((plane.evaluate(0.0, 1.25, 0.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_sided_plane_membership() {
        // x >= 0.25 half-space, inside reference at x = 1.
        let side = SidedPlane::new(Vec3::X, Vec3::X, -0.25);
        assert!(side.is_within(0.5, 0.0, 0.0));
        assert!(side.is_within(0.25, 9.0, -9.0)); // boundary is closed
        assert!(side.is_within(0.25 - 1e-13, 0.0, 0.0)); // within resolution
        assert!(!side.is_within(0.2, 0.0, 0.0));
    }

    #[test]
    fn test_find_intersections_two_points() {
        let planet = PlanetModel::SPHERE;
        let points = x_plane(0.5).find_intersections(&planet, &y_plane(0.0), &[]);
        assert_eq!(points.len(), 2);
        let expected_z = 0.75f64.sqrt();
        for p in &points {
            assert!(planet.is_on_surface(p.x, p.y, p.z));
            assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(p.z.abs(), expected_z, epsilon = 1e-12);
        }
        assert!(!points[0].is_identical(&points[1]));
    }

    #[test]
    fn test_find_intersections_bounds_filter() {
        let planet = PlanetModel::SPHERE;
        // Keep only the z >= 0 solution.
        let upper = SidedPlane::new(Vec3::Z, Vec3::Z, 0.0);
        let points = x_plane(0.5).find_intersections(&planet, &y_plane(0.0), &[&upper]);
        assert_eq!(points.len(), 1);
        assert!(points[0].z > 0.0);
    }

    #[test]
    fn test_find_intersections_parallel_planes() {
        let planet = PlanetModel::SPHERE;
        let points = y_plane(0.0).find_intersections(&planet, &y_plane(0.5), &[]);
        assert!(points.is_empty());
    }

    #[test]
    fn test_find_intersections_coincident_planes() {
        let planet = PlanetModel::SPHERE;
        let points = y_plane(0.25).find_intersections(&planet, &y_plane(0.25), &[]);
        assert!(points.is_empty());
    }

    #[test]
    fn test_find_intersections_tangent_line() {
        let planet = PlanetModel::SPHERE;
        // The line x = 1, y = 0 touches the unit sphere at exactly (1, 0, 0).
        let points = x_plane(1.0).find_intersections(&planet, &y_plane(0.0), &[]);
        assert_eq!(points.len(), 1);
        assert!(points[0].is_identical(&GeoPoint::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_find_intersections_line_misses_surface() {
        let planet = PlanetModel::SPHERE;
        let points = x_plane(2.0).find_intersections(&planet, &y_plane(0.0), &[]);
        assert!(points.is_empty());
    }

    #[test]
    fn test_sample_intersection_point() {
        let planet = PlanetModel::SPHERE;
        let plane = y_plane(0.0);
        let sample = plane
            .sample_intersection_point(&planet, &x_plane(0.0))
            .unwrap();
        assert!(planet.is_on_surface(sample.x, sample.y, sample.z));
        assert!(plane.evaluate_is_zero(sample.x, sample.y, sample.z));
    }

    #[test]
    fn test_sample_intersection_point_plane_off_world() {
        let planet = PlanetModel::SPHERE;
        let plane = y_plane(1.5);
        assert!(plane.sample_intersection_point(&planet, &x_plane(0.0)).is_none());
    }

    #[test]
    fn test_coincides_with() {
        let a = y_plane(0.25);
        let b = Plane::new(Vec3::Y, -0.25 + 1e-14);
        let c = y_plane(0.3);
        assert!(a.coincides_with(&b));
        assert!(!a.coincides_with(&c));
    }

    #[test]
    fn test_plane_membership_is_on_plane_only() {
        let plane = y_plane(0.0);
        assert!(Membership::contains(&plane, 5.0, 0.0, -2.0));
        assert!(!Membership::contains(&plane, 0.0, 0.1, 0.0));
    }

    #[test]
    fn test_membership_by_point() {
        let plane = y_plane(0.0);
        let side = SidedPlane::new(Vec3::X, Vec3::X, -0.25);
        assert!(plane.contains_point(&GeoPoint::new(5.0, 0.0, -2.0)));
        assert!(!plane.contains_point(&GeoPoint::new(0.0, 0.1, 0.0)));
        assert!(side.contains_point(&GeoPoint::new(0.5, 0.0, 0.0)));
        assert!(!side.contains_point(&GeoPoint::new(0.2, 0.0, 0.0)));
    }
}
