use std::hash::{Hash, Hasher};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::geometry::plane::{Membership, Plane, SidedPlane};
use crate::geometry::point::GeoPoint;
use crate::geometry::vector::Axis;
use crate::planet::PlanetModel;
use crate::shape::GeoShape;
use crate::MINIMUM_RESOLUTION;

/// Extent of a bounding solid along one coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// A proper interval; `max - min` must exceed the minimum resolution.
    Range { min: f64, max: f64 },
    /// The axis collapsed to a single value (zero thickness).
    Degenerate(f64),
}

/// Structured failure information for solid construction.
#[derive(Debug, Error)]
pub enum SolidError {
    #[error("{axis:?} bounds inverted or identical: min={min}, max={max}")]
    BoundsOutOfOrder { axis: Axis, min: f64, max: f64 },

    #[error("expected exactly one collapsed axis, found {found}")]
    CollapsedAxisCount { found: usize },
}

/// An axis-aligned bounding solid with one axis collapsed to a single value:
/// a zero-thickness rectangular patch of the planet surface.
///
/// Five bounding constraints define it — two closed half-spaces per
/// non-collapsed axis, facing each other, and one plain plane for the
/// collapsed axis. The boundary witness caches (edge points, notable
/// points) are computed once at construction; the solid is immutable
/// afterwards and safe to share across threads.
#[derive(Debug, Clone)]
pub struct PatchSolid {
    planet: PlanetModel,
    collapsed_axis: Axis,
    collapsed_plane: Plane,
    /// [min_a, max_a, min_b, max_b], where (a, b) are the two non-collapsed
    /// axes in X < Y < Z order.
    sides: [SidedPlane; 4],
    edge_points: Vec<GeoPoint>,
    notable_points: Vec<GeoPoint>,
}

impl PatchSolid {
    /// Construct a patch solid from per-axis extents.
    ///
    /// Exactly one extent must be [`Extent::Degenerate`]; every
    /// [`Extent::Range`] must be wider than the minimum resolution. Both
    /// conditions are checked before any plane is built, so no partial
    /// solid is ever observable.
    #[instrument(skip(planet))]
    pub fn new(planet: PlanetModel, x: Extent, y: Extent, z: Extent) -> Result<Self, SolidError> {
        let extents = [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)];

        for (axis, extent) in extents {
            if let Extent::Range { min, max } = extent {
                if max - min < MINIMUM_RESOLUTION {
                    return Err(SolidError::BoundsOutOfOrder { axis, min, max });
                }
            }
        }

        let mut collapsed = None;
        let mut found = 0usize;
        let mut ranged = Vec::with_capacity(2);
        for (axis, extent) in extents {
            match extent {
                Extent::Degenerate(value) => {
                    collapsed = Some((axis, value));
                    found += 1;
                }
                Extent::Range { min, max } => ranged.push((axis, min, max)),
            }
        }
        if found != 1 {
            return Err(SolidError::CollapsedAxisCount { found });
        }
        let (collapsed_axis, collapsed_value) = collapsed.unwrap();

        let collapsed_plane = Plane::new(collapsed_axis.unit(), -collapsed_value);

        // Two facing half-spaces per ranged axis: the min plane's inside
        // reference sits at the max bound and vice versa.
        let (axis_a, min_a, max_a) = ranged[0];
        let (axis_b, min_b, max_b) = ranged[1];
        let sides = [
            SidedPlane::new(axis_a.unit() * max_a, axis_a.unit(), -min_a),
            SidedPlane::new(axis_a.unit() * min_a, axis_a.unit(), -max_a),
            SidedPlane::new(axis_b.unit() * max_b, axis_b.unit(), -min_b),
            SidedPlane::new(axis_b.unit() * min_b, axis_b.unit(), -max_b),
        ];

        // At least one point is needed on each disjoint patch of the
        // boundary; there can be up to two, on opposite sides of the world.
        // Four adjacent-plane queries cover all the ways the boundary can
        // meet the surface, each filtered by the remaining three bounds.
        let solutions = [
            sides[0].plane.find_intersections(
                &planet,
                &collapsed_plane,
                &[&sides[1] as &dyn Membership, &sides[2], &sides[3]],
            ),
            sides[1].plane.find_intersections(
                &planet,
                &collapsed_plane,
                &[&sides[0] as &dyn Membership, &sides[2], &sides[3]],
            ),
            collapsed_plane.find_intersections(
                &planet,
                &sides[2].plane,
                &[&sides[3] as &dyn Membership, &sides[0], &sides[1]],
            ),
            collapsed_plane.find_intersections(
                &planet,
                &sides[3].plane,
                &[&sides[2] as &dyn Membership, &sides[0], &sides[1]],
            ),
        ];

        let notable_points: Vec<GeoPoint> = solutions.iter().flatten().copied().collect();
        let mut edge_points = largest_solution(&solutions);

        if edge_points.is_empty() {
            // No bounding-plane pair cuts the surface. If the collapsed
            // plane alone slices all the way through the world while both
            // ranges straddle it entirely, the boundary is the full
            // surface curve of the collapsed plane; sample one point on it.
            let within_world = collapsed_value - planet.minimum_value(collapsed_axis)
                >= -MINIMUM_RESOLUTION
                && collapsed_value - planet.maximum_value(collapsed_axis) <= MINIMUM_RESOLUTION;
            let straddles = |axis: Axis, min: f64, max: f64| {
                min - planet.minimum_value(axis) < -MINIMUM_RESOLUTION
                    && max - planet.maximum_value(axis) > MINIMUM_RESOLUTION
            };
            if within_world && straddles(axis_a, min_a, max_a) && straddles(axis_b, min_b, max_b) {
                let construction_plane = Plane::new(axis_a.unit(), 0.0);
                if let Some(sample) =
                    collapsed_plane.sample_intersection_point(&planet, &construction_plane)
                {
                    edge_points.push(sample);
                }
            }
        }

        debug!(
            ?collapsed_axis,
            edge_points = edge_points.len(),
            notable_points = notable_points.len(),
            "constructed patch solid"
        );

        Ok(Self {
            planet,
            collapsed_axis,
            collapsed_plane,
            sides,
            edge_points,
            notable_points,
        })
    }

    /// Patch collapsed in X: a single X value with Y and Z ranges.
    pub fn degenerate_x(
        planet: PlanetModel,
        x: f64,
        min_y: f64,
        max_y: f64,
        min_z: f64,
        max_z: f64,
    ) -> Result<Self, SolidError> {
        Self::new(
            planet,
            Extent::Degenerate(x),
            Extent::Range {
                min: min_y,
                max: max_y,
            },
            Extent::Range {
                min: min_z,
                max: max_z,
            },
        )
    }

    /// Patch collapsed in Y: a single Y value with X and Z ranges.
    pub fn degenerate_y(
        planet: PlanetModel,
        min_x: f64,
        max_x: f64,
        y: f64,
        min_z: f64,
        max_z: f64,
    ) -> Result<Self, SolidError> {
        Self::new(
            planet,
            Extent::Range {
                min: min_x,
                max: max_x,
            },
            Extent::Degenerate(y),
            Extent::Range {
                min: min_z,
                max: max_z,
            },
        )
    }

    /// Patch collapsed in Z: a single Z value with X and Y ranges.
    pub fn degenerate_z(
        planet: PlanetModel,
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        z: f64,
    ) -> Result<Self, SolidError> {
        Self::new(
            planet,
            Extent::Range {
                min: min_x,
                max: max_x,
            },
            Extent::Range {
                min: min_y,
                max: max_y,
            },
            Extent::Degenerate(z),
        )
    }

    pub fn planet(&self) -> &PlanetModel {
        &self.planet
    }

    pub fn collapsed_axis(&self) -> Axis {
        self.collapsed_axis
    }

    pub fn collapsed_plane(&self) -> &Plane {
        &self.collapsed_plane
    }

    pub fn sides(&self) -> &[SidedPlane; 4] {
        &self.sides
    }

    /// Witness points touching every disjoint connected component of the
    /// patch boundary. Empty only when the solid misses the surface
    /// entirely.
    pub fn edge_points(&self) -> &[GeoPoint] {
        &self.edge_points
    }

    /// Boundary-intersection points of the collapsed plane, used when
    /// testing intersection against that plane alone.
    pub fn notable_points(&self) -> &[GeoPoint] {
        &self.notable_points
    }

    /// Conjunctive membership over all five bounding constraints: closed
    /// half-space membership for each sided plane, on-plane (within
    /// resolution) for the collapsed plane.
    pub fn is_within(&self, x: f64, y: f64, z: f64) -> bool {
        self.sides[0].is_within(x, y, z)
            && self.sides[1].is_within(x, y, z)
            && self.collapsed_plane.evaluate_is_zero(x, y, z)
            && self.sides[2].is_within(x, y, z)
            && self.sides[3].is_within(x, y, z)
    }
}

/// Pick the query result with the most points; the first one encountered
/// with the maximum non-zero count wins, keeping edge-point selection
/// deterministic.
fn largest_solution(solutions: &[Vec<GeoPoint>]) -> Vec<GeoPoint> {
    let mut best: &[GeoPoint] = &[];
    for solution in solutions {
        if solution.len() > best.len() {
            best = solution;
        }
    }
    best.to_vec()
}

impl GeoShape for PatchSolid {
    fn is_within(&self, x: f64, y: f64, z: f64) -> bool {
        PatchSolid::is_within(self, x, y, z)
    }

    fn edge_points(&self) -> &[GeoPoint] {
        &self.edge_points
    }

    fn intersects(
        &self,
        plane: &Plane,
        _notable_points: &[GeoPoint],
        bounds: &[&SidedPlane],
    ) -> bool {
        // The patch boundary lies on each bounding constraint, restricted
        // by all the others; the supplied plane crosses the boundary iff it
        // meets one of those restricted curves within the caller's bounds.
        for (i, side) in self.sides.iter().enumerate() {
            let mut filters: Vec<&dyn Membership> = Vec::with_capacity(bounds.len() + 4);
            for (j, other) in self.sides.iter().enumerate() {
                if j != i {
                    filters.push(other);
                }
            }
            filters.push(&self.collapsed_plane);
            filters.extend(bounds.iter().map(|b| *b as &dyn Membership));
            if !side
                .plane
                .find_intersections(&self.planet, plane, &filters)
                .is_empty()
            {
                return true;
            }
        }

        let mut filters: Vec<&dyn Membership> = Vec::with_capacity(bounds.len() + 4);
        filters.extend(self.sides.iter().map(|s| s as &dyn Membership));
        filters.extend(bounds.iter().map(|b| *b as &dyn Membership));
        !self
            .collapsed_plane
            .find_intersections(&self.planet, plane, &filters)
            .is_empty()
    }
}

// Equality and hashing are structural over the planet model and the
// constituent planes; the point caches are derived deterministically from
// those fields and are excluded.
impl PartialEq for PatchSolid {
    fn eq(&self, other: &Self) -> bool {
        self.planet == other.planet
            && self.collapsed_plane == other.collapsed_plane
            && self.sides == other.sides
    }
}

impl Eq for PatchSolid {}

impl Hash for PatchSolid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.planet.hash(state);
        self.collapsed_plane.hash(state);
        self.sides.hash(state);
    }
}
