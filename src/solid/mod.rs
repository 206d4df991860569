pub mod classify;
pub mod patch;

pub use classify::Relationship;
pub use patch::{Extent, PatchSolid, SolidError};
