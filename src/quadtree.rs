use tracing::warn;

use crate::api::SpatialIndexApi;
use crate::geom::{Bounds, Coord};
use crate::types::*;

/// Capacity floor applied to every node.
pub const DEFAULT_MAX_LEAVES: usize = 10;

/// A robot handle stored at a node, with the position it was indexed at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Leaf {
    pub id: RobotId,
    pub position: Coord,
}

/// Four-way spatial partition over robot positions.
///
/// Subdivision is lazy and one-shot: a node splits the first time an insert
/// would exceed its capacity, and the handles it already holds stay at its
/// level. Children are ordered NW, NE, SW, SE.
#[derive(Debug)]
pub struct QuadTree {
    bounds: Bounds,
    max_leaves: usize,
    leaves: Vec<Leaf>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl SpatialIndexApi for QuadTree {
    fn new(bounds: Bounds, max_leaves: usize) -> Self {
        Self {
            bounds,
            max_leaves: max_leaves.max(DEFAULT_MAX_LEAVES),
            leaves: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, id: RobotId, position: Coord) -> bool {
        if !self.bounds.contains(position) {
            return false;
        }

        if self.leaves.len() < self.max_leaves {
            self.leaves.push(Leaf { id, position });
            return true;
        }

        if self.children.is_none() {
            self.subdivide();
        }
        if let Some(children) = self.children.as_mut() {
            if children.iter_mut().any(|child| child.insert(id, position)) {
                return true;
            }
        }

        // Contained here but by no quadrant: the point sits on a quadrant seam.
        warn!(
            robot = id.0,
            x = position.x,
            y = position.y,
            "position rejected by every quadrant"
        );
        false
    }

    fn clear(&mut self) {
        self.leaves = Vec::new();
        self.children = None;
    }

    fn flush(&mut self) {
        self.leaves.clear();
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.flush();
            }
        }
    }

    fn query_overlap(&self, query: &Bounds) -> Vec<RobotId> {
        let mut found = Vec::new();
        self.collect_overlap(query, &mut found);
        found
    }

    fn find_in_range(&self, query: &Bounds) -> Vec<RobotId> {
        crate::torus::find_in_range(self, query)
    }
}

impl QuadTree {
    /// Index rooted at the unit square, as used by the simulation.
    pub fn unit(max_leaves: usize) -> Self {
        <Self as SpatialIndexApi>::new(Bounds::unit(), max_leaves)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn max_leaves(&self) -> usize {
        self.max_leaves
    }

    /// Handles held directly at this node.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn children(&self) -> Option<&[QuadTree; 4]> {
        self.children.as_deref()
    }

    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Number of handles stored in this subtree.
    pub fn len(&self) -> usize {
        self.leaves.len()
            + self
                .children
                .as_ref()
                .map_or(0, |c| c.iter().map(QuadTree::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the subtree and summarize its shape.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.accumulate_stats(0, &mut stats);
        stats
    }

    fn accumulate_stats(&self, depth: usize, stats: &mut TreeStats) {
        stats.nodes += 1;
        stats.robots += self.leaves.len();
        stats.max_depth = stats.max_depth.max(depth);
        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.accumulate_stats(depth + 1, stats);
                }
            }
            None => stats.leaf_nodes += 1,
        }
    }

    /// Split into four equal quadrants sharing this node's capacity.
    fn subdivide(&mut self) {
        let max_leaves = self.max_leaves;
        self.children = Some(Box::new(
            self.bounds.quadrants().map(|q| <Self as SpatialIndexApi>::new(q, max_leaves)),
        ));
    }

    fn collect_overlap(&self, query: &Bounds, found: &mut Vec<RobotId>) {
        if !self.bounds.overlaps(query) {
            return;
        }
        found.extend(
            self.leaves
                .iter()
                .filter(|leaf| query.contains(leaf.position))
                .map(|leaf| leaf.id),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_overlap(query, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(max_leaves: usize) -> QuadTree {
        QuadTree::unit(max_leaves)
    }

    #[test]
    fn test_capacity_floor() {
        assert_eq!(tree(0).max_leaves(), DEFAULT_MAX_LEAVES);
        assert_eq!(tree(3).max_leaves(), DEFAULT_MAX_LEAVES);
        assert_eq!(tree(32).max_leaves(), 32);
    }

    #[test]
    fn test_insert_rejects_outside_and_boundary() {
        let mut t = tree(10);
        assert!(!t.insert(RobotId(0), Coord::new(1.5, 0.5)));
        assert!(!t.insert(RobotId(1), Coord::new(0.0, 0.5)));
        assert!(!t.insert(RobotId(2), Coord::new(0.5, 1.0)));
        assert!(t.insert(RobotId(3), Coord::new(0.5, 0.5)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_unset_bounds_reject_everything() {
        let mut t = QuadTree::new(Bounds::from_xy(0.5, 0.5, 0.0, 0.0), 10);
        assert!(!t.insert(RobotId(0), Coord::new(0.5, 0.5)));
        assert!(t.query_overlap(&Bounds::unit()).is_empty());
        assert!(t.is_empty());
    }

    #[test]
    fn test_subdivides_once_past_capacity() {
        let mut t = tree(10);
        // eleven distinct points in the SW quadrant
        for i in 0..11 {
            let p = Coord::new(0.1 + i as f64 * 0.01, 0.2);
            assert!(t.insert(RobotId(i), p));
        }
        assert!(t.is_subdivided());
        assert_eq!(t.leaves().len(), 10);
        let children = t.children().unwrap();
        assert_eq!(children.len(), 4);
        assert_eq!(children[2].leaves().len(), 1);
        assert!(children.iter().all(|c| !c.is_subdivided()));

        let found = t.query_overlap(&Bounds::unit());
        assert_eq!(found.len(), 11);
        for i in 0..11 {
            assert!(found.contains(&RobotId(i)));
        }
    }

    #[test]
    fn test_existing_leaves_not_redistributed() {
        let mut t = tree(10);
        for i in 0..10 {
            t.insert(RobotId(i), Coord::new(0.9, 0.9));
        }
        assert!(!t.is_subdivided());
        t.insert(RobotId(10), Coord::new(0.1, 0.9));
        assert_eq!(t.leaves().len(), 10);
        let [nw, ne, sw, se] = t.children().unwrap();
        assert_eq!(nw.leaves(), &[Leaf { id: RobotId(10), position: Coord::new(0.1, 0.9) }]);
        assert!(ne.leaves().is_empty());
        assert!(sw.leaves().is_empty());
        assert!(se.leaves().is_empty());
    }

    #[test]
    fn test_seam_point_is_defensive_failure() {
        let mut t = tree(10);
        for i in 0..10 {
            assert!(t.insert(RobotId(i), Coord::new(0.3, 0.3)));
        }
        // on the vertical seam x = 0.5: inside the root, outside every quadrant
        assert!(!t.insert(RobotId(10), Coord::new(0.5, 0.3)));
        assert!(t.is_subdivided());
        assert_eq!(t.len(), 10);
    }

    #[test]
    fn test_query_order_own_leaves_then_quadrants() {
        let mut t = tree(10);
        for i in 0..10 {
            t.insert(RobotId(i), Coord::new(0.6, 0.4));
        }
        t.insert(RobotId(10), Coord::new(0.8, 0.2)); // SE
        t.insert(RobotId(11), Coord::new(0.2, 0.8)); // NW
        let found = t.query_overlap(&Bounds::unit());
        let expected: Vec<RobotId> = (0..10).chain([11, 10]).map(RobotId).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_query_skips_far_quadrants() {
        let mut t = tree(10);
        for i in 0..12 {
            t.insert(RobotId(i), Coord::new(0.05 + i as f64 * 0.07, 0.75));
        }
        let query = Bounds::from_xy(0.1, 0.75, 0.16, 0.1);
        let found = t.query_overlap(&query);
        assert_eq!(found, vec![RobotId(0), RobotId(1)]);
    }

    #[test]
    fn test_cluster_queries_return_only_their_cluster() {
        // three clusters of 8 at distinct coordinates
        let clusters = [
            Coord::new(101.064 / 600.0, 337.218 / 600.0),
            Coord::new(472.319 / 600.0, 487.395 / 600.0),
            Coord::new(390.668 / 600.0, 47.9782 / 600.0),
        ];
        let mut t = tree(8);
        let mut id = 0;
        for c in clusters {
            for _ in 0..8 {
                assert!(t.insert(RobotId(id), c));
                id += 1;
            }
        }
        for (k, c) in clusters.iter().enumerate() {
            let mut found = t.query_overlap(&Bounds::around(*c, 0.01));
            found.sort();
            let expected: Vec<RobotId> = (k as u32 * 8..k as u32 * 8 + 8).map(RobotId).collect();
            assert_eq!(found, expected);
        }
        assert!(t.query_overlap(&Bounds::around(Coord::new(0.0, 0.0), 0.1)).is_empty());
    }

    #[test]
    fn test_all_robots_at_one_point_found() {
        let mut t = tree(8);
        let p = Coord::new(1.0 / 6.0, 1.0 / 6.0);
        for i in 0..24 {
            assert!(t.insert(RobotId(i), p));
        }
        assert_eq!(t.query_overlap(&Bounds::around(p, 0.1)).len(), 24);
        assert_eq!(t.stats().max_depth, 2);
    }

    #[test]
    fn test_flush_keeps_shape_and_reinsert_matches() {
        let mut t = tree(10);
        let points: Vec<Coord> = (0..40)
            .map(|i| Coord::new(0.02 + (i % 8) as f64 * 0.11, 0.03 + (i / 8) as f64 * 0.19))
            .collect();
        for (i, p) in points.iter().enumerate() {
            assert!(t.insert(RobotId(i as u32), *p));
        }
        let query = Bounds::from_xy(0.4, 0.4, 0.5, 0.5);
        let mut before = t.query_overlap(&query);
        before.sort();
        let shape = t.stats();

        t.flush();
        let flushed = t.stats();
        assert_eq!(flushed.robots, 0);
        assert_eq!(flushed.nodes, shape.nodes);
        assert!(t.is_subdivided());
        assert!(t.is_empty());

        for (i, p) in points.iter().enumerate() {
            assert!(t.insert(RobotId(i as u32), *p));
        }
        let mut after = t.query_overlap(&query);
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_clear_collapses_tree() {
        let mut t = tree(10);
        for i in 0..30 {
            t.insert(RobotId(i), Coord::new(0.01 + i as f64 * 0.03, 0.6));
        }
        assert!(t.is_subdivided());
        t.clear();
        assert!(!t.is_subdivided());
        assert!(t.leaves().is_empty());
        assert_eq!(
            t.stats(),
            TreeStats { nodes: 1, leaf_nodes: 1, robots: 0, max_depth: 0 }
        );
        assert_eq!(t.max_leaves(), 10);
        assert_eq!(t.bounds(), Bounds::unit());
    }
}
