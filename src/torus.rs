//! Torus-aware range queries over a unit-square index.
//!
//! A query box that sticks out of `[0,1] x [0,1]` is answered by the base
//! overlap query plus one wrapped copy per crossed axis (left or right,
//! bottom or top) and at most one corner copy. Each copy is centered on the
//! opposite edge and sized to twice the overflow, so only its inner half
//! reaches into the world.

use std::collections::HashSet;

use crate::api::SpatialIndexApi;
use crate::geom::Bounds;
use crate::types::RobotId;

/// Which side of the unit square a query crosses on one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Overflow {
    /// Past the low edge by the given amount; wraps to coordinate 1.
    Low(f64),
    /// Past the high edge by the given amount; wraps to coordinate 0.
    High(f64),
}

impl Overflow {
    fn of(min: f64, max: f64) -> Option<Self> {
        if min < 0.0 {
            Some(Overflow::Low(-min))
        } else if max > 1.0 {
            Some(Overflow::High(max - 1.0))
        } else {
            None
        }
    }

    fn opposite_edge(self) -> f64 {
        match self {
            Overflow::Low(_) => 1.0,
            Overflow::High(_) => 0.0,
        }
    }

    fn extent(self) -> f64 {
        match self {
            Overflow::Low(d) | Overflow::High(d) => d * 2.0,
        }
    }
}

/// Wrapped query boxes for `query`: horizontal edge wrap, vertical edge wrap,
/// then the corner wrap, each present only when its edge(s) are crossed.
pub fn wrap_queries(query: &Bounds) -> Vec<Bounds> {
    let mut out = Vec::with_capacity(3);
    if !query.is_set() || query.inside_unit() {
        return out;
    }
    let c = query.center;
    let ox = Overflow::of(query.min_x(), query.max_x());
    let oy = Overflow::of(query.min_y(), query.max_y());

    if let Some(ox) = ox {
        out.push(Bounds::from_xy(ox.opposite_edge(), c.y, ox.extent(), query.height()));
    }
    if let Some(oy) = oy {
        out.push(Bounds::from_xy(c.x, oy.opposite_edge(), query.width(), oy.extent()));
    }
    if let (Some(ox), Some(oy)) = (ox, oy) {
        out.push(Bounds::from_xy(ox.opposite_edge(), oy.opposite_edge(), ox.extent(), oy.extent()));
    }
    out
}

/// Robots inside `query` on the unit torus, each reported once, in the order
/// they are first found (base query first, then the wrapped copies).
pub fn find_in_range<I: SpatialIndexApi + ?Sized>(index: &I, query: &Bounds) -> Vec<RobotId> {
    let mut found = index.query_overlap(query);
    let wraps = wrap_queries(query);
    if wraps.is_empty() {
        return found;
    }

    let mut seen: HashSet<RobotId> = found.iter().copied().collect();
    for wrapped in &wraps {
        for id in index.query_overlap(wrapped) {
            if seen.insert(id) {
                found.push(id);
            }
        }
    }
    found
}
