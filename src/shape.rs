//! The capability surface a shape must expose to take part in relationship
//! classification.
//!
//! The classifier never needs to know what kind of shape it is comparing
//! against; it only needs a membership predicate, the shape's boundary
//! witness points, and a boundary-intersection test against an arbitrary
//! plane. Every shape variant implements this one trait, avoiding a
//! per-pair explosion of comparison routines.

use crate::geometry::plane::{Plane, SidedPlane};
use crate::geometry::point::GeoPoint;

pub trait GeoShape {
    /// True if (x, y, z) belongs to the shape (closed boundaries).
    fn is_within(&self, x: f64, y: f64, z: f64) -> bool;

    fn is_within_point(&self, point: &GeoPoint) -> bool {
        self.is_within(point.x, point.y, point.z)
    }

    /// Witness points touching every disjoint connected component of the
    /// shape's surface boundary. May be empty for shapes with no boundary
    /// on the surface (all-of-the-world, or entirely off-world).
    fn edge_points(&self) -> &[GeoPoint];

    /// True if the shape's boundary intersects `plane` within `bounds`.
    ///
    /// `notable_points` are known boundary-intersection points on `plane`,
    /// supplied by the caller as candidate witnesses; implementations may
    /// consult or ignore them.
    fn intersects(&self, plane: &Plane, notable_points: &[GeoPoint], bounds: &[&SidedPlane])
        -> bool;
}
