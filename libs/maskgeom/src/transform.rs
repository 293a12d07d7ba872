//! Affine transformation types and traits.
//!
//! The composition order is fixed and documented: a [`Transformation`]
//! rotates (and optionally mirrors) about the local origin first, then
//! translates. Swapping that order silently changes device geometry, so
//! [`Transformation::with_loc_and_angle`] and friends all encode
//! rotate-then-translate, and the ordering is pinned by unit tests.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{Path, Point, Polygon, Rect};

/// A 2x2 rotation/mirror matrix and a translation vector.
///
/// Applied as `p' = A * p + b`: the matrix acts about the local origin,
/// the translation is applied afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// The transformation matrix, row-major.
    a: [[f64; 2]; 2],
    /// The x-y translation applied after the matrix.
    b: [f64; 2],
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }

    /// A pure translation by `p`.
    pub fn translate(p: Point) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [p.x as f64, p.y as f64],
        }
    }

    /// A rotation by `angle` degrees counterclockwise about the origin.
    pub fn rotate(angle: f64) -> Self {
        let sin = angle.to_radians().sin();
        let cos = angle.to_radians().cos();
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }

    /// A reflection about the x-axis.
    pub fn reflect_vert() -> Self {
        Self {
            a: [[1., 0.], [0., -1.]],
            b: [0., 0.],
        }
    }

    /// Rotation by `angle` degrees about the local origin, then translation
    /// to `loc`.
    ///
    /// This is the documented placement order for all device geometry.
    pub fn with_loc_and_angle(loc: Point, angle: f64) -> Self {
        Self::cascade(Self::translate(loc), Self::rotate(angle))
    }

    /// Rotation and optional vertical reflection about the local origin,
    /// then translation to `loc`.
    pub fn with_opts(loc: Point, reflect_vert: bool, angle: f64) -> Self {
        let mut m = Self::rotate(angle);
        if reflect_vert {
            m = Self::cascade(m, Self::reflect_vert());
        }
        Self::cascade(Self::translate(loc), m)
    }

    /// Composes `parent` and `child`: the result applies `child` first,
    /// then `parent`, matching layout-instance hierarchies where each level
    /// of instance nests its transform inside its parent's.
    ///
    /// Composition is associative but *not* commutative.
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }

    /// The translation component, rounded to database units.
    pub fn offset_point(&self) -> Point {
        Point {
            x: self.b[0].round() as i64,
            y: self.b[1].round() as i64,
        }
    }

    pub(crate) fn apply(&self, p: Point) -> Point {
        let xf = p.x as f64;
        let yf = p.y as f64;
        let x = self.a[0][0] * xf + self.a[0][1] * yf + self.b[0];
        let y = self.a[1][0] * xf + self.a[1][1] * yf + self.b[1];
        // The single rounding step for the whole chain of compositions.
        Point {
            x: x.round() as i64,
            y: y.round() as i64,
        }
    }
}

/// Multiplies two 2x2 matrices.
fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

/// Multiplies a 2x2 matrix by a 2-entry vector.
fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}

/// How an object is changed by a [`Transformation`].
///
/// Produces a new object; the source is never mutated.
#[enum_dispatch]
pub trait Transform {
    /// Creates a new object at the transformed location of `self`.
    fn transform(&self, trans: Transformation) -> Self;
}

impl Transform for Point {
    fn transform(&self, trans: Transformation) -> Self {
        trans.apply(*self)
    }
}

impl Transform for Rect {
    fn transform(&self, trans: Transformation) -> Self {
        let p0 = trans.apply(self.p0);
        let p1 = trans.apply(self.p1);
        Rect::new(p0, p1)
    }
}

impl Transform for Polygon {
    fn transform(&self, trans: Transformation) -> Self {
        Polygon {
            points: self.points.iter().map(|p| trans.apply(*p)).collect(),
        }
    }
}

impl Transform for Path {
    fn transform(&self, trans: Transformation) -> Self {
        Path {
            points: self.points.iter().map(|p| trans.apply(*p)).collect(),
            width: self.width,
        }
    }
}

/// How a shape is translated by a [`Point`], through mutation.
///
/// Pure translations stay in integer arithmetic; no rounding is involved.
#[enum_dispatch]
pub trait Translate {
    fn translate(&mut self, p: Point);
}

impl Translate for Point {
    fn translate(&mut self, p: Point) {
        self.x += p.x;
        self.y += p.y;
    }
}

impl Translate for Rect {
    fn translate(&mut self, p: Point) {
        self.p0.translate(p);
        self.p1.translate(p);
    }
}

impl Translate for Polygon {
    fn translate(&mut self, p: Point) {
        for pt in self.points.iter_mut() {
            pt.translate(p);
        }
    }
}

impl Translate for Path {
    fn translate(&mut self, p: Point) {
        for pt in self.points.iter_mut() {
            pt.translate(p);
        }
    }
}
