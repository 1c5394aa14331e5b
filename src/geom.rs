use glam::DVec2;

/// Plain `(x, y)` world coordinate.
pub type Coord = DVec2;

/// Axis-aligned box described by its center and full extent.
///
/// A box is either *unset* (zero width and height) or has strictly positive
/// width and height. Unset boxes contain nothing and overlap nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    pub center: Coord,
    width: f64,
    height: f64,
}

impl Bounds {
    /// Build a box; a non-positive width or height yields the unset box.
    pub fn new(center: Coord, width: f64, height: f64) -> Self {
        if width > 0.0 && height > 0.0 {
            Self { center, width, height }
        } else {
            Self { center, width: 0.0, height: 0.0 }
        }
    }

    /// Convenience: box from scalar center components.
    pub fn from_xy(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Coord::new(x, y), width, height)
    }

    /// Square box of side `2 * range` centered on `center`.
    pub fn around(center: Coord, range: f64) -> Self {
        Self::new(center, range * 2.0, range * 2.0)
    }

    /// The unit square `[0,1] x [0,1]` the index operates in.
    pub fn unit() -> Self {
        Self::from_xy(0.5, 0.5, 1.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_set(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn min_x(&self) -> f64 {
        if self.is_set() {
            self.center.x - self.width / 2.0
        } else {
            0.0
        }
    }

    pub fn max_x(&self) -> f64 {
        if self.is_set() {
            self.center.x + self.width / 2.0
        } else {
            0.0
        }
    }

    pub fn min_y(&self) -> f64 {
        if self.is_set() {
            self.center.y - self.height / 2.0
        } else {
            0.0
        }
    }

    pub fn max_y(&self) -> f64 {
        if self.is_set() {
            self.center.y + self.height / 2.0
        } else {
            0.0
        }
    }

    /// Strict containment: points on the boundary are outside.
    pub fn contains(&self, p: Coord) -> bool {
        self.is_set()
            && strictly_between(p.x, self.min_x(), self.max_x())
            && strictly_between(p.y, self.min_y(), self.max_y())
    }

    /// Inclusive overlap test; boxes sharing an edge overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        if !(self.is_set() && other.is_set()) {
            return false;
        }
        let overlap_x = within(self.min_x(), other.min_x(), other.max_x())
            || within(other.min_x(), self.min_x(), self.max_x());
        let overlap_y = within(self.min_y(), other.min_y(), other.max_y())
            || within(other.min_y(), self.min_y(), self.max_y());
        overlap_x && overlap_y
    }

    /// True if the box lies inside the unit square (edges may touch).
    pub fn inside_unit(&self) -> bool {
        self.min_x() >= 0.0 && self.min_y() >= 0.0 && self.max_x() <= 1.0 && self.max_y() <= 1.0
    }

    /// Split into four equal quadrants, ordered NW, NE, SW, SE (+y is up).
    pub fn quadrants(&self) -> [Bounds; 4] {
        let w = self.width / 2.0;
        let h = self.height / 2.0;
        let (qx, qy) = (w / 2.0, h / 2.0);
        let c = self.center;
        [
            Bounds::from_xy(c.x - qx, c.y + qy, w, h),
            Bounds::from_xy(c.x + qx, c.y + qy, w, h),
            Bounds::from_xy(c.x - qx, c.y - qy, w, h),
            Bounds::from_xy(c.x + qx, c.y - qy, w, h),
        ]
    }
}

#[inline]
fn within(v: f64, min: f64, max: f64) -> bool {
    v >= min && v <= max
}

#[inline]
fn strictly_between(v: f64, min: f64, max: f64) -> bool {
    v > min && v < max
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contains_is_strict() {
        // bounds [0.5, 3.5] x [0.5, 3.5]
        let grid = Bounds::from_xy(2.0, 2.0, 3.0, 3.0);
        for x in 0..5 {
            for y in 0..5 {
                let p = Coord::new(x as f64, y as f64);
                let expected = x > 0 && x < 4 && y > 0 && y < 4;
                assert_eq!(grid.contains(p), expected, "point {p:?}");
            }
        }
        assert!(grid.contains(Coord::new(1.0, 1.0)));
        assert!(!grid.contains(Coord::new(0.5, 2.0)));
        assert!(!grid.contains(Coord::new(3.5, 3.5)));
        assert!(!grid.contains(Coord::new(4.0, 4.0)));
    }

    #[test]
    fn test_degenerate_box_is_unset() {
        let b = Bounds::from_xy(1.0, 1.0, 0.0, 2.0);
        assert!(!b.is_set());
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 0.0);
        assert_eq!(b.min_x(), 0.0);
        assert_eq!(b.max_y(), 0.0);
        assert!(!b.contains(Coord::new(1.0, 1.0)));
        assert!(!b.overlaps(&Bounds::unit()));
        assert!(!Bounds::unit().overlaps(&b));
        assert!(!Bounds::from_xy(1.0, 1.0, -1.0, 1.0).is_set());
    }

    #[test]
    fn test_overlap_touching_edges() {
        let stationary = Bounds::from_xy(20.0, 20.0, 10.0, 10.0);
        let mut moving = Bounds::from_xy(10.0, 10.0, 10.0, 10.0);
        // corners touch
        assert!(stationary.overlaps(&moving));
        assert!(moving.overlaps(&stationary));

        moving.center.x = 9.0;
        assert!(!stationary.overlaps(&moving));
        assert!(!moving.overlaps(&stationary));

        moving.center = Coord::new(10.0, 20.0);
        assert!(stationary.overlaps(&moving));
        moving.center.x = 9.0;
        assert!(!moving.overlaps(&stationary));
    }

    #[test]
    fn test_overlap_partial_and_separated() {
        let stationary = Bounds::from_xy(20.0, 20.0, 10.0, 10.0);
        let mut moving = Bounds::from_xy(12.0, 10.0, 10.0, 10.0);
        assert!(stationary.overlaps(&moving));
        assert!(moving.overlaps(&stationary));
        moving.center.x = 29.0;
        assert!(stationary.overlaps(&moving));
        moving.center.x = 32.0;
        assert!(!stationary.overlaps(&moving));
        assert!(!moving.overlaps(&stationary));
    }

    #[test]
    fn test_nested_boxes_overlap() {
        let outer = Bounds::unit();
        let inner = Bounds::from_xy(0.5, 0.5, 0.1, 0.1);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_quadrants_layout() {
        let [nw, ne, sw, se] = Bounds::unit().quadrants();
        assert_eq!(nw.center, Coord::new(0.25, 0.75));
        assert_eq!(ne.center, Coord::new(0.75, 0.75));
        assert_eq!(sw.center, Coord::new(0.25, 0.25));
        assert_eq!(se.center, Coord::new(0.75, 0.25));
        for q in [nw, ne, sw, se] {
            assert_eq!(q.width(), 0.5);
            assert_eq!(q.height(), 0.5);
        }
    }

    #[test]
    fn test_inside_unit() {
        assert!(Bounds::unit().inside_unit());
        assert!(Bounds::around(Coord::new(0.5, 0.5), 0.1).inside_unit());
        assert!(!Bounds::around(Coord::new(0.05, 0.5), 0.1).inside_unit());
        assert!(!Bounds::around(Coord::new(0.5, 0.95), 0.1).inside_unit());
    }

    fn any_box() -> impl Strategy<Value = Bounds> {
        (-5.0f64..5.0, -5.0f64..5.0, 0.0f64..4.0, 0.0f64..4.0)
            .prop_map(|(x, y, w, h)| Bounds::from_xy(x, y, w, h))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in any_box(), b in any_box()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn contained_point_lies_in_exactly_one_quadrant(
            x in 0.001f64..0.999,
            y in 0.001f64..0.999,
        ) {
            prop_assume!(x != 0.5 && y != 0.5);
            let p = Coord::new(x, y);
            let hits = Bounds::unit().quadrants().iter().filter(|q| q.contains(p)).count();
            prop_assert_eq!(hits, 1);
        }
    }
}
