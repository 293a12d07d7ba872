//! Core geometric types for mask-layout generation.
//!
//! All coordinates are integer database units. Every operation that could
//! introduce fractional coordinates (rotation by arbitrary angles, arc
//! sampling) rounds exactly once, at the point where a [`Point`] is produced,
//! so chained transforms cannot accumulate floating-point drift.

use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

use array_map::{ArrayMap, Indexable};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::bbox::BoundBox;
use self::transform::{Transform, Transformation, Translate};

pub mod bbox;
pub mod transform;

/// Snaps `pos` to the nearest multiple of `grid`.
pub fn snap_to_grid(pos: i64, grid: i64) -> i64 {
    assert!(grid > 0);

    let rem = pos.rem_euclid(grid);
    if rem <= grid / 2 {
        pos - rem
    } else {
        pos + grid - rem
    }
}

/// A point in two-dimensional layout space, in database units.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Creates a new [`Point`] from (x, y) coordinates.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, (0, 0).
    #[inline]
    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Creates an offset of `val` along direction `dir`.
    pub fn offset(val: i64, dir: Dir) -> Self {
        match dir {
            Dir::Horiz => Self { x: val, y: 0 },
            Dir::Vert => Self { x: 0, y: val },
        }
    }

    /// Gets the coordinate associated with direction `dir`.
    pub fn coord(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }

    /// Returns a new [`Point`] shifted by `p`.
    #[inline]
    pub fn translated(&self, p: Point) -> Self {
        let mut pt = *self;
        pt.translate(p);
        pt
    }

    /// Snaps both coordinates to the nearest multiple of `grid`.
    #[inline]
    pub fn snap_to_grid(&self, grid: i64) -> Self {
        Self {
            x: snap_to_grid(self.x, grid),
            y: snap_to_grid(self.y, grid),
        }
    }

    /// The Manhattan (L1) distance to `other`.
    pub fn manhattan_distance(&self, other: Point) -> i64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::ops::Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from(value: (i64, i64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// A one-dimensional closed interval.
#[derive(
    Debug, Default, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, PartialEq, Eq,
)]
pub struct Span {
    start: i64,
    stop: i64,
}

impl Span {
    /// Creates a new [`Span`] between two coordinates, in either order.
    pub fn new(start: i64, stop: i64) -> Self {
        Self {
            start: start.min(stop),
            stop: start.max(stop),
        }
    }

    /// Creates a span centered at `center` with total length `span`.
    ///
    /// `span` must be non-negative and even.
    pub fn from_center_span(center: i64, span: i64) -> Self {
        assert!(span >= 0);
        assert_eq!(span % 2, 0);
        Self::new(center - span / 2, center + span / 2)
    }

    /// Creates a span starting at `start` with the given length.
    pub fn with_start_and_length(start: i64, length: i64) -> Self {
        Self::new(start, start + length)
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> i64 {
        self.stop
    }

    #[inline]
    pub fn center(&self) -> i64 {
        (self.start + self.stop) / 2
    }

    #[inline]
    pub fn length(&self) -> i64 {
        self.stop - self.start
    }

    /// Checks whether this span overlaps `other`, endpoints inclusive.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.stop < self.start || self.stop < other.start)
    }

    /// Grows the span by `amount` on both ends.
    pub fn expand_all(self, amount: i64) -> Self {
        Self {
            start: self.start - amount,
            stop: self.stop + amount,
        }
    }

    /// The union with `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            stop: self.stop.max(other.stop),
        }
    }

    /// Returns `true` if this span entirely contains `other`.
    pub fn contains(self, other: Self) -> bool {
        self.union(other) == self
    }
}

impl From<(i64, i64)> for Span {
    #[inline]
    fn from(tup: (i64, i64)) -> Self {
        Self::new(tup.0, tup.1)
    }
}

/// An enumeration of axis-aligned directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Dir {
    /// The horizontal, or x-aligned, direction.
    Horiz,
    /// The vertical, or y-aligned, direction.
    Vert,
}

impl Dir {
    /// Returns the perpendicular direction.
    pub fn other(self) -> Self {
        match self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown direction `{original}`; expected horizontal or vertical")]
pub struct DirParseError {
    original: String,
}

impl FromStr for Dir {
    type Err = DirParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "horizontal" | "horiz" | "h" | "x" => Ok(Self::Horiz),
            "vertical" | "vert" | "v" | "y" => Ok(Self::Vert),
            _ => Err(DirParseError {
                original: s.to_string(),
            }),
        }
    }
}

impl Default for Dir {
    #[inline]
    fn default() -> Self {
        Self::Horiz
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Horiz => write!(f, "horizontal"),
            Self::Vert => write!(f, "vertical"),
        }
    }
}

impl std::ops::Not for Dir {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.other()
    }
}

/// Enumeration over possible signs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Sign {
    Pos,
    Neg,
}

impl Sign {
    #[inline]
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Pos => 1,
            Self::Neg => -1,
        }
    }
}

impl std::ops::Not for Sign {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Pos => Self::Neg,
            Self::Neg => Self::Pos,
        }
    }
}

/// An enumeration of the sides of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Side {
    Top,
    Right,
    Bot,
    Left,
}

impl Side {
    /// The direction of the coordinate corresponding to this side.
    ///
    /// Top/bottom edges are y-coordinates, left/right edges x-coordinates.
    pub fn coord_dir(&self) -> Dir {
        match self {
            Side::Top | Side::Bot => Dir::Vert,
            Side::Left | Side::Right => Dir::Horiz,
        }
    }

    /// The direction of the edge segment corresponding to this side.
    pub fn edge_dir(&self) -> Dir {
        self.coord_dir().other()
    }

    /// Returns the opposite side.
    pub fn other(&self) -> Self {
        match self {
            Side::Top => Side::Bot,
            Side::Right => Side::Left,
            Side::Bot => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// The sign of motion toward this side.
    pub fn sign(&self) -> Sign {
        match self {
            Side::Top | Side::Right => Sign::Pos,
            Side::Bot | Side::Left => Sign::Neg,
        }
    }

    /// A unit offset pointing out of this side.
    pub fn outward(&self) -> Point {
        match self {
            Side::Top => Point::new(0, 1),
            Side::Bot => Point::new(0, -1),
            Side::Right => Point::new(1, 0),
            Side::Left => Point::new(-1, 0),
        }
    }
}

impl std::ops::Not for Side {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.other()
    }
}

/// An association of a value of type `T` with each of the four [`Side`]s.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Sides<T> {
    inner: ArrayMap<Side, T, 4>,
}

impl<T> Sides<T>
where
    T: Copy,
{
    /// Creates a new [`Sides`] with `value` associated with all sides.
    pub const fn uniform(value: T) -> Self {
        Self {
            inner: ArrayMap::new([value; 4]),
        }
    }
}

impl<T> Sides<T> {
    /// Creates a new [`Sides`] with the provided values for each side.
    ///
    /// Argument order matches the [`Side`] variant order.
    pub const fn new(top: T, right: T, bot: T, left: T) -> Self {
        Self {
            inner: ArrayMap::new([top, right, bot, left]),
        }
    }
}

impl<T> std::ops::Index<Side> for Sides<T> {
    type Output = T;
    fn index(&self, index: Side) -> &Self::Output {
        self.inner.index(index)
    }
}

impl<T> std::ops::IndexMut<Side> for Sides<T> {
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        self.inner.index_mut(index)
    }
}

/// An enumeration of the corners of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Corner {
    LowerLeft,
    LowerRight,
    UpperLeft,
    UpperRight,
}

/// A rectangular dimension (width x height) with no location.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct Dims {
    w: i64,
    h: i64,
}

impl Dims {
    /// Creates a new [`Dims`] from a width and height.
    pub fn new(w: i64, h: i64) -> Self {
        Self { w, h }
    }

    /// Creates a new square [`Dims`].
    pub fn square(value: i64) -> Self {
        Self { w: value, h: value }
    }

    #[inline]
    pub fn w(&self) -> i64 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> i64 {
        self.h
    }

    /// The length of the shorter side.
    #[inline]
    pub fn shorter(&self) -> i64 {
        self.w.min(self.h)
    }

    /// The length of the dimension along `dir`.
    pub fn dim(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.w,
            Dir::Vert => self.h,
        }
    }

    /// Returns a new [`Dims`] with width and height exchanged.
    pub fn transpose(self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }
}

impl std::ops::Mul<i64> for Dims {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self::Output {
        Self {
            w: self.w * rhs,
            h: self.h * rhs,
        }
    }
}

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rect {
    /// The lower-left corner.
    pub p0: Point,
    /// The upper-right corner.
    pub p1: Point,
}

impl Rect {
    /// Creates a new rectangle from two opposite corners, in either order.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Creates a rectangle centered at `center` with the given dimensions.
    ///
    /// Odd dimensions round the half-size down toward the lower-left.
    pub fn centered(center: Point, dims: Dims) -> Self {
        let ll = Point::new(center.x - dims.w() / 2, center.y - dims.h() / 2);
        Self::new(ll, Point::new(ll.x + dims.w(), ll.y + dims.h()))
    }

    /// Creates a rectangle from horizontal and vertical [`Span`]s.
    pub fn from_spans(h: Span, v: Span) -> Self {
        Self {
            p0: Point::new(h.start(), v.start()),
            p1: Point::new(h.stop(), v.stop()),
        }
    }

    /// Creates an empty rectangle containing the given point.
    pub fn from_point(p: Point) -> Self {
        Self { p0: p, p1: p }
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.p0.y
    }

    #[inline]
    pub fn top(&self) -> i64 {
        self.p1.y
    }

    #[inline]
    pub fn left(&self) -> i64 {
        self.p0.x
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.p1.x
    }

    /// The horizontal span of the rectangle.
    pub fn hspan(&self) -> Span {
        Span::new(self.p0.x, self.p1.x)
    }

    /// The vertical span of the rectangle.
    pub fn vspan(&self) -> Span {
        Span::new(self.p0.y, self.p1.y)
    }

    /// The span of the rectangle along `dir`.
    pub fn span(&self, dir: Dir) -> Span {
        match dir {
            Dir::Horiz => self.hspan(),
            Dir::Vert => self.vspan(),
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.hspan().length()
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.vspan().length()
    }

    /// The center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }

    /// The dimensions of the rectangle.
    #[inline]
    pub fn dims(&self) -> Dims {
        Dims::new(self.width(), self.height())
    }

    /// The coordinate of the given side.
    #[inline]
    pub fn side(&self, side: Side) -> i64 {
        match side {
            Side::Top => self.top(),
            Side::Bot => self.bottom(),
            Side::Right => self.right(),
            Side::Left => self.left(),
        }
    }

    /// The midpoint of the given edge.
    pub fn edge_center(&self, side: Side) -> Point {
        match side {
            Side::Top => Point::new(self.center().x, self.top()),
            Side::Bot => Point::new(self.center().x, self.bottom()),
            Side::Left => Point::new(self.left(), self.center().y),
            Side::Right => Point::new(self.right(), self.center().y),
        }
    }

    /// The desired corner of the rectangle.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::LowerLeft => self.p0,
            Corner::LowerRight => Point::new(self.p1.x, self.p0.y),
            Corner::UpperLeft => Point::new(self.p0.x, self.p1.y),
            Corner::UpperRight => self.p1,
        }
    }

    /// Expands the rectangle by `amount` on all sides.
    #[inline]
    pub fn expand(&self, amount: i64) -> Self {
        Self::new(
            Point::new(self.p0.x - amount, self.p0.y - amount),
            Point::new(self.p1.x + amount, self.p1.y + amount),
        )
    }

    /// Shrinks the rectangle by `amount` on all sides.
    ///
    /// # Panics
    ///
    /// Panics if shrinking would invert the rectangle.
    #[inline]
    pub fn shrink(&self, amount: i64) -> Self {
        assert!(2 * amount <= self.width());
        assert!(2 * amount <= self.height());
        Self::new(
            Point::new(self.p0.x + amount, self.p0.y + amount),
            Point::new(self.p1.x - amount, self.p1.y - amount),
        )
    }

    /// Expands the rectangle by `amount` on the given side only.
    pub fn expand_side(&self, side: Side, amount: i64) -> Self {
        let mut r = *self;
        match side {
            Side::Top => r.p1.y += amount,
            Side::Bot => r.p0.y -= amount,
            Side::Right => r.p1.x += amount,
            Side::Left => r.p0.x -= amount,
        }
        Self::new(r.p0, r.p1)
    }

    /// Returns `true` if the two rectangles overlap, boundaries inclusive.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.hspan().intersects(&other.hspan()) && self.vspan().intersects(&other.vspan())
    }

    /// The intersection of two rectangles, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let b = self.bbox().intersection(other.bbox());
        if b.is_empty() {
            None
        } else {
            Some(b.into_rect())
        }
    }

    /// Subtracts `clip` from this rectangle.
    ///
    /// Returns the (up to four) disjoint rectangles covering the part of
    /// `self` outside `clip`. Rectangles of zero area are omitted, so
    /// subtracting a non-overlapping clip returns `self` unchanged as a
    /// single piece. The result never self-intersects: every returned piece
    /// is an axis-aligned simple polygon.
    pub fn cutout(&self, clip: Rect) -> Vec<Rect> {
        let clip = match self.intersection(&clip) {
            Some(c) => c,
            None => return vec![*self],
        };
        let pieces = [
            // Below and above the clip, full width.
            Rect::from_spans(self.hspan(), Span::new(self.bottom(), clip.bottom())),
            Rect::from_spans(self.hspan(), Span::new(clip.top(), self.top())),
            // Left and right of the clip, clipped to its vertical extent.
            Rect::from_spans(Span::new(self.left(), clip.left()), clip.vspan()),
            Rect::from_spans(Span::new(clip.right(), self.right()), clip.vspan()),
        ];
        pieces
            .into_iter()
            .filter(|r| r.width() > 0 && r.height() > 0)
            .collect()
    }

    /// The boolean union with `other` as one simple rectilinear polygon,
    /// wound counterclockwise with collinear vertices elided.
    ///
    /// Returns `None` when the union is not a simple polygon: the
    /// rectangles are disjoint (the result is disconnected) or touch only
    /// at a corner (the boundary pinches to a point).
    pub fn union(&self, other: Rect) -> Option<Polygon> {
        let mut xs = vec![self.left(), self.right(), other.left(), other.right()];
        let mut ys = vec![self.bottom(), self.top(), other.bottom(), other.top()];
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();
        // The grid lines include every rectangle edge, so each cell lies
        // fully inside or fully outside each rectangle.
        let inside = |r: &Rect, xi: usize, yi: usize| {
            xs[xi] >= r.left()
                && xs[xi + 1] <= r.right()
                && ys[yi] >= r.bottom()
                && ys[yi + 1] <= r.top()
        };
        let covered = |xi: isize, yi: isize| {
            if xi < 0 || yi < 0 || xi as usize + 1 >= xs.len() || yi as usize + 1 >= ys.len() {
                return false;
            }
            inside(self, xi as usize, yi as usize) || inside(&other, xi as usize, yi as usize)
        };

        // Directed boundary edges, interior on the left.
        let mut edges: Vec<(Point, Point)> = Vec::new();
        for xi in 0..xs.len() {
            for yi in 0..ys.len() - 1 {
                let left = covered(xi as isize - 1, yi as isize);
                let right = covered(xi as isize, yi as isize);
                if left != right {
                    let a = Point::new(xs[xi], ys[yi]);
                    let b = Point::new(xs[xi], ys[yi + 1]);
                    edges.push(if left { (a, b) } else { (b, a) });
                }
            }
        }
        for yi in 0..ys.len() {
            for xi in 0..xs.len() - 1 {
                let below = covered(xi as isize, yi as isize - 1);
                let above = covered(xi as isize, yi as isize);
                if below != above {
                    let a = Point::new(xs[xi], ys[yi]);
                    let b = Point::new(xs[xi + 1], ys[yi]);
                    edges.push(if above { (a, b) } else { (b, a) });
                }
            }
        }

        if edges.is_empty() {
            return None;
        }
        // A vertex with two outgoing edges is a pinch point.
        for i in 0..edges.len() {
            for j in i + 1..edges.len() {
                if edges[i].0 == edges[j].0 {
                    return None;
                }
            }
        }

        // Chain the edges into a loop; leftover edges mean the union is
        // disconnected.
        let (start, mut at) = edges[0];
        let mut points = vec![start];
        while at != start {
            match edges.iter().find(|&&(a, _)| a == at) {
                Some(&(_, b)) => {
                    points.push(at);
                    at = b;
                }
                None => return None,
            }
        }
        if points.len() != edges.len() {
            return None;
        }

        let n = points.len();
        let simplified = (0..n)
            .filter(|&i| {
                let prev = points[(i + n - 1) % n];
                let next = points[(i + 1) % n];
                !((prev.x == points[i].x && points[i].x == next.x)
                    || (prev.y == points[i].y && points[i].y == next.y))
            })
            .map(|i| points[i])
            .collect();
        Some(Polygon::new(simplified))
    }

    /// Snaps all corners of this rectangle to the given grid.
    #[inline]
    pub fn snap_to_grid(&self, grid: i64) -> Self {
        Self::new(self.p0.snap_to_grid(grid), self.p1.snap_to_grid(grid))
    }
}

/// A closed n-sided polygon.
///
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from an ordered vertex sequence.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// An open-ended geometric path with non-zero width.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Path {
    pub points: Vec<Point>,
    pub width: i64,
}

/// The primary geometric primitive comprising emitted layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
    Path(Path),
}

impl Transform for Shape {
    fn transform(&self, trans: Transformation) -> Self {
        match self {
            Self::Rect(s) => Self::Rect(s.transform(trans)),
            Self::Polygon(s) => Self::Polygon(s.transform(trans)),
            Self::Path(s) => Self::Path(s.transform(trans)),
        }
    }
}

impl Translate for Shape {
    fn translate(&mut self, p: Point) {
        match self {
            Self::Rect(s) => s.translate(p),
            Self::Polygon(s) => s.translate(p),
            Self::Path(s) => s.translate(p),
        }
    }
}

/// Common shape operations, dispatched from the [`Shape`] enum to its
/// variants by [mod@enum_dispatch].
#[enum_dispatch]
pub trait ShapeTrait {
    /// Returns `true` if the shape contains [`Point`] `pt`.
    ///
    /// Containment is inclusive of the boundary.
    fn contains(&self, pt: Point) -> bool;
    /// Converts the shape to a [`Polygon`], the most general of shapes.
    fn to_poly(&self) -> Polygon;
}

impl ShapeTrait for Rect {
    fn contains(&self, pt: Point) -> bool {
        self.p0.x <= pt.x && self.p1.x >= pt.x && self.p0.y <= pt.y && self.p1.y >= pt.y
    }
    fn to_poly(&self) -> Polygon {
        Polygon {
            points: vec![
                self.p0,
                Point::new(self.p1.x, self.p0.y),
                self.p1,
                Point::new(self.p0.x, self.p1.y),
            ],
        }
    }
}

impl ShapeTrait for Polygon {
    fn contains(&self, pt: Point) -> bool {
        if !self.points.bbox().contains(pt) {
            return false;
        }

        // Winding-number test; handles all realistically useful
        // layout polygons, convex or not.
        let mut winding: isize = 0;
        for idx in 0..self.points.len() {
            let (past, next) = (
                &self.points[idx],
                &self.points[(idx + 1) % self.points.len()],
            );
            if past.y.min(next.y) <= pt.y && past.y.max(next.y) >= pt.y {
                if next.y == past.y {
                    // Horizontal segment on the point's y-level.
                    if past.x.min(next.x) <= pt.x && past.x.max(next.x) >= pt.x {
                        return true;
                    }
                } else {
                    let xsolve = (next.x - past.x) * (pt.y - past.y) / (next.y - past.y) + past.x;
                    match xsolve.cmp(&pt.x) {
                        Ordering::Equal => return true,
                        Ordering::Greater => {
                            if next.y > past.y {
                                winding += 1;
                            } else {
                                winding -= 1;
                            }
                        }
                        Ordering::Less => (),
                    }
                }
            }
        }
        winding != 0
    }
    fn to_poly(&self) -> Polygon {
        self.clone()
    }
}

impl ShapeTrait for Path {
    fn contains(&self, pt: Point) -> bool {
        // Segment-wise containment. Only Manhattan paths are supported.
        let half = self.width / 2;
        for k in 0..self.points.len().saturating_sub(1) {
            let (a, b) = (self.points[k], self.points[k + 1]);
            let rect = if a.x == b.x {
                Rect::new(Point::new(a.x - half, a.y), Point::new(a.x + half, b.y))
            } else if a.y == b.y {
                Rect::new(Point::new(a.x, a.y - half), Point::new(b.x, a.y + half))
            } else {
                unimplemented!("unsupported non-Manhattan path")
            };
            if rect.contains(pt) {
                return true;
            }
        }
        false
    }
    fn to_poly(&self) -> Polygon {
        // Trace down one side of the path and back up the other.
        let half = self.width / 2;
        let mut left = Vec::with_capacity(self.points.len() * 2);
        let mut right = Vec::with_capacity(self.points.len() * 2);
        for k in 0..self.points.len().saturating_sub(1) {
            let (a, b) = (self.points[k], self.points[k + 1]);
            if a.x == b.x {
                left.push(Point::new(a.x - half, a.y));
                left.push(Point::new(a.x - half, b.y));
                right.push(Point::new(a.x + half, a.y));
                right.push(Point::new(a.x + half, b.y));
            } else if a.y == b.y {
                left.push(Point::new(a.x, a.y + half));
                left.push(Point::new(b.x, a.y + half));
                right.push(Point::new(a.x, a.y - half));
                right.push(Point::new(b.x, a.y - half));
            } else {
                unimplemented!("unsupported non-Manhattan path")
            }
        }
        right.reverse();
        left.extend(right);
        Polygon { points: left }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(1, 500), 0);
        assert_eq!(snap_to_grid(999, 500), 1_000);
        assert_eq!(snap_to_grid(-260, 500), -500);
        assert_eq!(snap_to_grid(250, 500), 0);
    }

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(Point::new(10, 10), Dims::new(6, 4));
        assert_eq!(r, Rect::new(Point::new(7, 8), Point::new(13, 12)));
        assert_eq!(r.center(), Point::new(10, 10));
    }

    #[test]
    fn test_rect_cutout() {
        let outer = Rect::new(Point::new(0, 0), Point::new(10, 10));
        let clip = Rect::new(Point::new(4, 4), Point::new(6, 6));
        let pieces = outer.cutout(clip);
        assert_eq!(pieces.len(), 4);
        let total: i64 = pieces.iter().map(|r| r.width() * r.height()).sum();
        assert_eq!(total, 100 - 4);
        for (i, a) in pieces.iter().enumerate() {
            for b in pieces.iter().skip(i + 1) {
                assert!(a.intersection(b).map(|r| r.width() * r.height()).unwrap_or(0) == 0);
            }
        }
    }

    #[test]
    fn test_rect_cutout_disjoint() {
        let outer = Rect::new(Point::new(0, 0), Point::new(10, 10));
        let clip = Rect::new(Point::new(20, 20), Point::new(30, 30));
        assert_eq!(outer.cutout(clip), vec![outer]);
    }

    #[test]
    fn test_polygon_contains() {
        let triangle = Polygon {
            points: vec![Point::new(0, 0), Point::new(2, 0), Point::new(0, 2)],
        };
        assert!(triangle.contains(Point::new(0, 0)));
        assert!(triangle.contains(Point::new(1, 1)));
        assert!(!triangle.contains(Point::new(2, 2)));

        let u = Polygon {
            points: vec![
                Point::new(0, 0),
                Point::new(0, 10),
                Point::new(2, 10),
                Point::new(2, 2),
                Point::new(8, 2),
                Point::new(8, 10),
                Point::new(10, 10),
                Point::new(10, 0),
            ],
        };
        assert!(u.contains(Point::new(1, 9)));
        assert!(!u.contains(Point::new(5, 9)));
    }

    #[test]
    fn test_path_to_poly() {
        let path = Path {
            points: vec![Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)],
            width: 2,
        };
        let poly = path.to_poly();
        assert!(poly.contains(Point::new(5, 0)));
        assert!(poly.contains(Point::new(10, 5)));
        assert!(!poly.contains(Point::new(5, 5)));
    }

    #[test]
    fn test_sides_index() {
        let mut s = Sides::uniform(1i64);
        s[Side::Top] = 4;
        assert_eq!(s[Side::Top], 4);
        assert_eq!(s[Side::Bot], 1);
    }

    #[test]
    fn test_rect_union_overlapping() {
        let a = Rect::new(Point::new(0, 0), Point::new(10, 4));
        let b = Rect::new(Point::new(6, 2), Point::new(14, 8));
        let poly = a.union(b).unwrap();
        assert_eq!(poly.points.len(), 8);
        for p in [Point::new(1, 1), Point::new(7, 3), Point::new(13, 7)] {
            assert!(poly.contains(p));
        }
        assert!(!poly.contains(Point::new(1, 7)));
        assert!(!poly.contains(Point::new(13, 1)));
    }

    #[test]
    fn test_rect_union_contained_and_adjacent() {
        let outer = Rect::new(Point::new(0, 0), Point::new(10, 10));
        let inner = Rect::new(Point::new(2, 2), Point::new(5, 5));
        assert_eq!(outer.union(inner).unwrap().points.len(), 4);
        // Sharing a full edge merges into a plain rectangle outline.
        let left = Rect::new(Point::new(0, 0), Point::new(4, 6));
        let right = Rect::new(Point::new(4, 0), Point::new(9, 6));
        assert_eq!(left.union(right).unwrap().points.len(), 4);
    }

    #[test]
    fn test_rect_union_not_simple() {
        let a = Rect::new(Point::new(0, 0), Point::new(4, 4));
        // Disjoint rectangles have a disconnected union.
        assert!(a
            .union(Rect::new(Point::new(6, 0), Point::new(8, 4)))
            .is_none());
        // Corner contact pinches the boundary to a point.
        assert!(a
            .union(Rect::new(Point::new(4, 4), Point::new(8, 8)))
            .is_none());
    }

    #[test]
    fn test_dir_from_str() {
        assert_eq!(Dir::from_str("Horizontal"), Ok(Dir::Horiz));
        assert_eq!(" y ".parse(), Ok(Dir::Vert));
        assert!(Dir::from_str("diagonal").is_err());
    }
}
