//! Parametric shape constructors.
//!
//! Everything here produces [`Shape`]s in database units centered where the
//! caller asks, with curved outlines sampled into polygons at a fixed vertex
//! count so identical inputs always yield identical vertex lists. Parameter
//! validation happens before any geometry is built; a constructor either
//! returns a complete shape or an [`Error::InvalidGeometryParameter`].

use maskgeom::{Dims, Path, Point, Polygon, Rect, Shape};

use crate::error::{Error, Result};

/// Vertices used to sample a full ellipse.
pub(crate) const ELLIPSE_POINTS: usize = 32;

/// Vertices used to sample one rounded corner.
pub(crate) const CORNER_POINTS: usize = 8;

/// A plain axis-aligned rectangle centered at `center`.
pub fn rectangle(center: Point, dims: Dims) -> Shape {
    Shape::Rect(Rect::centered(center, dims))
}

/// A rectangle with all four corners rounded to the given radius.
///
/// The radius may not exceed half the shorter side.
pub fn rounded_rect(center: Point, dims: Dims, radius: i64) -> Result<Shape> {
    if radius < 0 || 2 * radius > dims.shorter() {
        return Err(Error::InvalidGeometryParameter {
            param: "corner_radius",
            value: radius,
            limit: dims.shorter() / 2,
        });
    }
    if radius == 0 {
        return Ok(rectangle(center, dims));
    }
    let r = Rect::centered(center, dims);
    let rf = radius as f64;
    // Corner arc centers, counterclockwise from the lower right, with the
    // starting angle of each 90-degree sweep.
    let corners = [
        (r.right() - radius, r.bottom() + radius, -90.0_f64),
        (r.right() - radius, r.top() - radius, 0.0),
        (r.left() + radius, r.top() - radius, 90.0),
        (r.left() + radius, r.bottom() + radius, 180.0),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_POINTS + 1));
    for (cx, cy, start) in corners {
        for k in 0..=CORNER_POINTS {
            let theta = (start + 90.0 * k as f64 / CORNER_POINTS as f64).to_radians();
            points.push(Point::new(
                cx + (rf * theta.cos()).round() as i64,
                cy + (rf * theta.sin()).round() as i64,
            ));
        }
    }
    Ok(Shape::Polygon(Polygon::new(points)))
}

/// A rectangle with all four corners chamfered at 45 degrees.
///
/// `chamfer` is the leg length of each corner cut and may not exceed half
/// the shorter side.
pub fn octagon(center: Point, dims: Dims, chamfer: i64) -> Result<Shape> {
    if chamfer < 0 || 2 * chamfer > dims.shorter() {
        return Err(Error::InvalidGeometryParameter {
            param: "chamfer",
            value: chamfer,
            limit: dims.shorter() / 2,
        });
    }
    if chamfer == 0 {
        return Ok(rectangle(center, dims));
    }
    let r = Rect::centered(center, dims);
    Ok(Shape::Polygon(Polygon::new(vec![
        Point::new(r.left() + chamfer, r.bottom()),
        Point::new(r.right() - chamfer, r.bottom()),
        Point::new(r.right(), r.bottom() + chamfer),
        Point::new(r.right(), r.top() - chamfer),
        Point::new(r.right() - chamfer, r.top()),
        Point::new(r.left() + chamfer, r.top()),
        Point::new(r.left(), r.top() - chamfer),
        Point::new(r.left(), r.bottom() + chamfer),
    ])))
}

/// An axis-aligned ellipse inscribed in the given dimensions.
pub fn ellipse(center: Point, dims: Dims) -> Shape {
    let (a, b) = (dims.w() as f64 / 2.0, dims.h() as f64 / 2.0);
    let points = (0..ELLIPSE_POINTS)
        .map(|k| {
            let theta = 2.0 * std::f64::consts::PI * k as f64 / ELLIPSE_POINTS as f64;
            Point::new(
                center.x + (a * theta.cos()).round() as i64,
                center.y + (b * theta.sin()).round() as i64,
            )
        })
        .collect();
    Shape::Polygon(Polygon::new(points))
}

/// A circle of the given radius.
pub fn circle(center: Point, radius: i64) -> Shape {
    ellipse(center, Dims::square(2 * radius))
}

/// Points along a circular arc from `start_deg` to `end_deg`, sampled at
/// `n + 1` evenly spaced angles.
pub fn arc_points(center: Point, radius: i64, start_deg: f64, end_deg: f64, n: usize) -> Vec<Point> {
    let rf = radius as f64;
    (0..=n)
        .map(|k| {
            let theta =
                (start_deg + (end_deg - start_deg) * k as f64 / n as f64).to_radians();
            Point::new(
                center.x + (rf * theta.cos()).round() as i64,
                center.y + (rf * theta.sin()).round() as i64,
            )
        })
        .collect()
}

/// A plus-shaped cross: two overlapping bars of length `size` and the given
/// stroke width.
pub fn cross(center: Point, size: i64, width: i64) -> Vec<Shape> {
    vec![
        Shape::Rect(Rect::centered(center, Dims::new(size, width))),
        Shape::Rect(Rect::centered(center, Dims::new(width, size))),
    ]
}

/// An L-shaped corner mark opening toward the upper right.
///
/// The inner corner of the L sits at `corner`; both legs have length `size`.
pub fn l_mark(corner: Point, size: i64, width: i64) -> Vec<Shape> {
    vec![
        Shape::Rect(Rect::new(
            Point::new(corner.x - size, corner.y - width),
            corner,
        )),
        Shape::Rect(Rect::new(
            Point::new(corner.x - width, corner.y - size),
            corner,
        )),
    ]
}

/// A T-shaped mark: a horizontal bar with a stem descending from its middle.
pub fn t_mark(center: Point, size: i64, width: i64) -> Vec<Shape> {
    vec![
        Shape::Rect(Rect::centered(
            Point::new(center.x, center.y + size / 2 - width / 2),
            Dims::new(size, width),
        )),
        Shape::Rect(Rect::centered(center, Dims::new(width, size))),
    ]
}

/// A diamond (square rotated 45 degrees) with vertices `size / 2` from the
/// center.
pub fn diamond(center: Point, size: i64) -> Shape {
    let half = size / 2;
    Shape::Polygon(Polygon::new(vec![
        Point::new(center.x, center.y - half),
        Point::new(center.x + half, center.y),
        Point::new(center.x, center.y + half),
        Point::new(center.x - half, center.y),
    ]))
}

/// Which way an isoceles [`triangle`] points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleDir {
    Up,
    Down,
    Left,
    Right,
}

/// An isoceles triangle inscribed in a `size` x `size` square, with its apex
/// toward `dir`.
pub fn triangle(center: Point, size: i64, dir: TriangleDir) -> Shape {
    let half = size / 2;
    let (cx, cy) = (center.x, center.y);
    let points = match dir {
        TriangleDir::Up => vec![
            Point::new(cx - half, cy - half),
            Point::new(cx + half, cy - half),
            Point::new(cx, cy + half),
        ],
        TriangleDir::Down => vec![
            Point::new(cx + half, cy + half),
            Point::new(cx - half, cy + half),
            Point::new(cx, cy - half),
        ],
        TriangleDir::Left => vec![
            Point::new(cx + half, cy - half),
            Point::new(cx + half, cy + half),
            Point::new(cx - half, cy),
        ],
        TriangleDir::Right => vec![
            Point::new(cx - half, cy + half),
            Point::new(cx - half, cy - half),
            Point::new(cx + half, cy),
        ],
    };
    Shape::Polygon(Polygon::new(points))
}

/// A straight wire of constant width between two points, at any angle.
pub fn straight_wire(a: Point, b: Point, width: i64) -> Result<Shape> {
    check_wire(a, b, width)?;
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    // Unit normal, scaled to the half-width.
    let (nx, ny) = (-dy / len * width as f64 / 2.0, dx / len * width as f64 / 2.0);
    let off = |p: Point, s: f64| {
        Point::new(
            p.x + (s * nx).round() as i64,
            p.y + (s * ny).round() as i64,
        )
    };
    Ok(Shape::Polygon(Polygon::new(vec![
        off(a, 1.0),
        off(b, 1.0),
        off(b, -1.0),
        off(a, -1.0),
    ])))
}

/// A constant-width wire along a quadratic Bezier from `a` to `b`, bowed
/// perpendicular to the chord by `bow` database units at its midpoint.
pub fn curved_wire(a: Point, b: Point, width: i64, bow: i64, samples: usize) -> Result<Shape> {
    check_wire(a, b, width)?;
    assert!(samples >= 2);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = (-dy / len, dx / len);
    // Control point: chord midpoint displaced along the normal. The curve
    // passes through the half-way point at half the control displacement,
    // so double the requested bow.
    let (cx, cy) = (
        (ax + bx) / 2.0 + 2.0 * bow as f64 * nx,
        (ay + by) / 2.0 + 2.0 * bow as f64 * ny,
    );
    let half = width as f64 / 2.0;
    let mut left = Vec::with_capacity(samples + 1);
    let mut right = Vec::with_capacity(samples + 1);
    for k in 0..=samples {
        let t = k as f64 / samples as f64;
        let u = 1.0 - t;
        let px = u * u * ax + 2.0 * u * t * cx + t * t * bx;
        let py = u * u * ay + 2.0 * u * t * cy + t * t * by;
        // Tangent of the Bezier at t, normalized for the offset normal.
        let tx = 2.0 * u * (cx - ax) + 2.0 * t * (bx - cx);
        let ty = 2.0 * u * (cy - ay) + 2.0 * t * (by - cy);
        let tlen = (tx * tx + ty * ty).sqrt().max(1e-9);
        let (onx, ony) = (-ty / tlen * half, tx / tlen * half);
        left.push(Point::new(
            (px + onx).round() as i64,
            (py + ony).round() as i64,
        ));
        right.push(Point::new(
            (px - onx).round() as i64,
            (py - ony).round() as i64,
        ));
    }
    right.reverse();
    left.extend(right);
    Ok(Shape::Polygon(Polygon::new(left)))
}

/// A Manhattan wire from `a` to `b` with one right-angle bend.
///
/// The first leg runs horizontally when `horiz_first` is set; collinear
/// endpoints degenerate to a single straight leg.
pub fn stepped_wire(a: Point, b: Point, width: i64, horiz_first: bool) -> Result<Shape> {
    check_wire(a, b, width)?;
    let corner = if horiz_first {
        Point::new(b.x, a.y)
    } else {
        Point::new(a.x, b.y)
    };
    let mut points = vec![a];
    if corner != a && corner != b {
        points.push(corner);
    }
    points.push(b);
    Ok(Shape::Path(Path { points, width }))
}

/// A trapezoidal taper between two parallel edge segments: from the edge
/// `a1`-`a2` to the edge `b1`-`b2`.
pub fn taper(a1: Point, a2: Point, b1: Point, b2: Point) -> Shape {
    Shape::Polygon(Polygon::new(vec![a1, a2, b2, b1]))
}

fn check_wire(a: Point, b: Point, width: i64) -> Result<()> {
    if width <= 0 {
        return Err(Error::InvalidGeometryParameter {
            param: "wire_width",
            value: width,
            limit: 1,
        });
    }
    if a == b {
        return Err(Error::InvalidGeometryParameter {
            param: "wire_length",
            value: 0,
            limit: 1,
        });
    }
    Ok(())
}
