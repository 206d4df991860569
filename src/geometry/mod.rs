pub mod plane;
pub mod point;
pub mod vector;

pub use plane::{Membership, Plane, SidedPlane};
pub use point::GeoPoint;
pub use vector::{Axis, Vec3};
