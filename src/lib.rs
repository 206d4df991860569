pub mod geometry;
pub mod planet;
pub mod shape;
pub mod solid;

// Re-export key types at crate root for convenience.
pub use geometry::plane::{Membership, Plane, SidedPlane};
pub use geometry::point::GeoPoint;
pub use geometry::vector::{Axis, Vec3};
pub use planet::PlanetModel;
pub use shape::GeoShape;
pub use solid::classify::Relationship;
pub use solid::patch::{Extent, PatchSolid, SolidError};

/// Minimum resolution for all geometric comparisons.
///
/// Two coordinates closer than this are indistinguishable; a plane evaluation
/// smaller than this in magnitude means the point lies on the plane. Bounds
/// along a non-collapsed axis must differ by at least this amount.
pub const MINIMUM_RESOLUTION: f64 = 1e-12;

/// Squared form of [`MINIMUM_RESOLUTION`], used for discriminant windows.
pub const MINIMUM_RESOLUTION_SQUARED: f64 = MINIMUM_RESOLUTION * MINIMUM_RESOLUTION;
