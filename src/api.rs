use crate::geom::{Bounds, Coord};
use crate::types::*;

/// Public contract for the per-tick spatial index over robot positions.
///
/// The index stores `RobotId` handles only; the population owns the robots.
/// A tick inserts every robot, runs read-only queries, then flushes.
pub trait SpatialIndexApi {
    /// Construct an index over `bounds` holding up to `max_leaves` handles
    /// per node before subdividing.
    fn new(bounds: Bounds, max_leaves: usize) -> Self
    where
        Self: Sized;

    // --- Mutation ----------------------------------------------------------

    /// Index a robot at `position`. Returns `false` if the position is not
    /// strictly inside the index bounds.
    fn insert(&mut self, id: RobotId, position: Coord) -> bool;

    /// Drop every handle and every child node.
    fn clear(&mut self);

    /// Drop every handle but keep the node structure for the next tick.
    fn flush(&mut self);

    // --- Queries -----------------------------------------------------------

    /// Robots whose position lies strictly inside `query` (no wrapping).
    fn query_overlap(&self, query: &Bounds) -> Vec<RobotId>;

    /// Robots inside `query` on the unit torus; parts of the query that
    /// cross an edge of `[0,1] x [0,1]` are wrapped to the opposite side.
    fn find_in_range(&self, query: &Bounds) -> Vec<RobotId>;

    /// Convenience: torus query over the `2 * range` square around `center`.
    fn find_in_range_at(&self, center: Coord, range: f64) -> Vec<RobotId> {
        self.find_in_range(&Bounds::around(center, range))
    }
}

/// Per-robot control hook run after sensing, once per tick.
pub trait Controller {
    fn control(&mut self, id: RobotId, robot: &mut Robot);
}

impl<F> Controller for F
where
    F: FnMut(RobotId, &mut Robot),
{
    fn control(&mut self, id: RobotId, robot: &mut Robot) {
        self(id, robot)
    }
}

/// Controller that leaves every robot untouched.
#[derive(Copy, Clone, Debug, Default)]
pub struct Idle;

impl Controller for Idle {
    fn control(&mut self, _id: RobotId, _robot: &mut Robot) {}
}
