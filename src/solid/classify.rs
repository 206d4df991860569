use serde::{Deserialize, Serialize};
use tracing::trace;

use super::patch::PatchSolid;
use crate::geometry::plane::SidedPlane;
use crate::geometry::point::GeoPoint;
use crate::shape::GeoShape;

/// Topological relationship between a bounding solid and another shape,
/// reported from the solid's `relate` call.
///
/// `Within` means the other shape lies entirely within this solid;
/// `Contains` means the other shape contains this solid. Swapping the
/// operands of a `relate` call swaps these two outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Disjoint,
    Within,
    Contains,
    Overlaps,
}

/// How a set of boundary points sits relative to a membership predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Containment {
    AllInside,
    SomeInside,
    NoneInside,
}

/// Classify `points` against `is_inside`. An empty set counts as
/// `NoneInside`: with no witnesses there is no evidence of containment.
fn classify_containment(
    points: &[GeoPoint],
    mut is_inside: impl FnMut(&GeoPoint) -> bool,
) -> Containment {
    let mut found_inside = false;
    let mut found_outside = false;
    for point in points {
        if is_inside(point) {
            found_inside = true;
        } else {
            found_outside = true;
        }
        if found_inside && found_outside {
            return Containment::SomeInside;
        }
    }
    if found_inside {
        Containment::AllInside
    } else {
        Containment::NoneInside
    }
}

impl PatchSolid {
    /// Classify the relationship between this solid and another shape.
    ///
    /// The check order is load-bearing: the cheap boundary-point tests run
    /// first, and the general plane-intersection test only runs when they
    /// are inconclusive. Mutual full boundary containment is reported as
    /// `Overlaps` — coincident or mutually enclosing boundaries cannot be
    /// told apart from true overlap by boundary points alone, and
    /// `Overlaps` is the classification that never mis-reports disjoint.
    pub fn relate<S: GeoShape + ?Sized>(&self, shape: &S) -> Relationship {
        let shape_inside_solid =
            classify_containment(shape.edge_points(), |p| self.is_within_point(p));
        if shape_inside_solid == Containment::SomeInside {
            trace!("shape boundary partially inside the solid");
            return Relationship::Overlaps;
        }

        let solid_inside_shape =
            classify_containment(self.edge_points(), |p| shape.is_within_point(p));
        if solid_inside_shape == Containment::SomeInside {
            trace!("solid boundary partially inside the shape");
            return Relationship::Overlaps;
        }

        if shape_inside_solid == Containment::AllInside
            && solid_inside_shape == Containment::AllInside
        {
            trace!("boundaries mutually contained");
            return Relationship::Overlaps;
        }

        let sides = self.sides();
        let side_refs: [&SidedPlane; 4] = [&sides[0], &sides[1], &sides[2], &sides[3]];
        if shape.intersects(self.collapsed_plane(), self.notable_points(), &side_refs) {
            trace!("shape boundary crosses a bounding plane");
            return Relationship::Overlaps;
        }

        if shape_inside_solid == Containment::AllInside {
            trace!("shape entirely inside the solid");
            return Relationship::Within;
        }

        if solid_inside_shape == Containment::AllInside {
            trace!("solid entirely inside the shape");
            return Relationship::Contains;
        }

        trace!("disjoint");
        Relationship::Disjoint
    }
}
