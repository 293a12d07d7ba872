//! Rectangular bounding boxes and the [`BoundBox`] trait.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{Point, Rect, Shape};

/// An axis-aligned, possibly empty rectangular bounding box.
///
/// Unlike [`Rect`], a [`Bbox`] may be empty, in which case `p0` lies to the
/// upper right of `p1`.
#[derive(Debug, Default, Copy, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Bbox {
    pub p0: Point,
    pub p1: Point,
}

impl Bbox {
    /// Creates a new [`Bbox`] from two [`Point`]s, in either order.
    #[inline]
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Creates a zero-area [`Bbox`] comprising a single point.
    pub fn from_point(pt: Point) -> Self {
        Self { p0: pt, p1: pt }
    }

    /// Creates an empty bounding box.
    pub fn empty() -> Self {
        Self {
            p0: Point::new(i64::MAX, i64::MAX),
            p1: Point::new(i64::MIN, i64::MIN),
        }
    }

    /// Returns `true` if the bounding box is empty.
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// Returns `true` if [`Point`] `pt` lies inside the bounding box.
    pub fn contains(&self, pt: Point) -> bool {
        self.p0.x <= pt.x && self.p1.x >= pt.x && self.p0.y <= pt.y && self.p1.y >= pt.y
    }

    /// The center of the bounding box.
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }

    /// The intersection with `bbox`; empty if the two are disjoint.
    pub fn intersection(&self, bbox: Bbox) -> Bbox {
        let pmin = Point::new(self.p0.x.max(bbox.p0.x), self.p0.y.max(bbox.p0.y));
        let pmax = Point::new(self.p1.x.min(bbox.p1.x), self.p1.y.min(bbox.p1.y));
        if pmin.x > pmax.x || pmin.y > pmax.y {
            return Bbox::empty();
        }
        Bbox::new(pmin, pmax)
    }

    /// The union with `bbox`.
    pub fn union(&self, bbox: Bbox) -> Bbox {
        if bbox.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return bbox;
        }
        Bbox::new(
            Point::new(self.p0.x.min(bbox.p0.x), self.p0.y.min(bbox.p0.y)),
            Point::new(self.p1.x.max(bbox.p1.x), self.p1.y.max(bbox.p1.y)),
        )
    }

    /// Converts a non-empty bounding box into a [`Rect`].
    #[inline]
    pub fn into_rect(self) -> Rect {
        debug_assert!(!self.is_empty());
        Rect {
            p0: self.p0,
            p1: self.p1,
        }
    }
}

impl From<Rect> for Bbox {
    fn from(r: Rect) -> Self {
        Self { p0: r.p0, p1: r.p1 }
    }
}

/// Functions available for objects with a bounding box.
#[enum_dispatch]
pub trait BoundBox {
    /// Computes a rectangular bounding box around the implementing type.
    fn bbox(&self) -> Bbox;
    /// Computes the bounding box and converts it to a [`Rect`].
    ///
    /// # Panics
    ///
    /// May panic if the bounding box is empty.
    fn brect(&self) -> Rect {
        self.bbox().into_rect()
    }
}

impl<T> BoundBox for &T
where
    T: BoundBox,
{
    fn bbox(&self) -> Bbox {
        T::bbox(*self)
    }
}

impl BoundBox for Bbox {
    fn bbox(&self) -> Bbox {
        *self
    }
}

impl BoundBox for Point {
    fn bbox(&self) -> Bbox {
        Bbox::from_point(*self)
    }
}

impl BoundBox for Rect {
    fn bbox(&self) -> Bbox {
        Bbox {
            p0: self.p0,
            p1: self.p1,
        }
    }
}

impl BoundBox for Vec<Point> {
    fn bbox(&self) -> Bbox {
        let mut bbox = Bbox::empty();
        for pt in self {
            bbox = bbox.union(pt.bbox());
        }
        bbox
    }
}

impl BoundBox for Shape {
    fn bbox(&self) -> Bbox {
        match self {
            Shape::Rect(r) => r.bbox(),
            Shape::Polygon(p) => p.points.bbox(),
            Shape::Path(p) => {
                let mut b = p.points.bbox();
                if !b.is_empty() {
                    // Widen by the half-width of the traced path.
                    b.p0.x -= p.width / 2;
                    b.p0.y -= p.width / 2;
                    b.p1.x += p.width / 2;
                    b.p1.y += p.width / 2;
                }
                b
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_intersection() {
        let a = Bbox::new(Point::new(0, 0), Point::new(4, 4));
        let b = Bbox::new(Point::new(2, 2), Point::new(8, 8));
        assert_eq!(a.union(b), Bbox::new(Point::new(0, 0), Point::new(8, 8)));
        assert_eq!(
            a.intersection(b),
            Bbox::new(Point::new(2, 2), Point::new(4, 4))
        );
        let c = Bbox::new(Point::new(10, 10), Point::new(12, 12));
        assert!(a.intersection(c).is_empty());
    }

    #[test]
    fn test_empty_union_identity() {
        let a = Bbox::new(Point::new(-3, 1), Point::new(5, 2));
        assert_eq!(a.union(Bbox::empty()), a);
        assert_eq!(Bbox::empty().union(a), a);
    }
}
