//! Alignment, measurement, orientation, and identification marks.
//!
//! A [`MarkPlacer`] resolves anchors to absolute points and refuses to put
//! two marks on the same point, so overlapping mark requests surface as
//! [`Error::MarkPlacementConflict`] instead of silently stacked geometry.

use serde::{Deserialize, Serialize};

use maskgeom::transform::{Transform, Transformation};
use maskgeom::{Corner, Point, Rect, Shape, ShapeTrait};

use crate::error::{Error, Result};
use crate::pdk::LayerKey;
use crate::shapes::{self, TriangleDir};

/// The geometric form of a mark.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MarkShape {
    Cross,
    Square,
    Circle,
    Diamond,
    Triangle,
    LShape,
    TShape,
}

/// What a mark is for. Determines default sizing only; any shape can serve
/// any purpose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MarkKind {
    /// Layer-to-layer registration.
    Alignment,
    /// Known-size features for post-fab metrology.
    Measurement,
    /// Asymmetric marks that disambiguate die orientation.
    Orientation,
    /// Marks identifying a die or array cell.
    Identification,
}

/// Where a mark goes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Anchor {
    /// An absolute canvas location.
    Canvas(Point),
    /// A corner of the reference frame passed to [`MarkPlacer::place`].
    FrameCorner(Corner),
    /// The center of the reference frame.
    FrameCenter,
}

/// A mark request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkSpec {
    pub kind: MarkKind,
    pub shape: MarkShape,
    pub anchor: Anchor,
    /// Overall extent of the mark.
    pub size: i64,
    /// Stroke width for open shapes (cross, L, T).
    pub stroke: i64,
}

/// Places marks while tracking occupied anchor points.
#[derive(Debug, Default)]
pub struct MarkPlacer {
    occupied: Vec<Point>,
    /// Extra scale factor (percent) applied to measurement marks.
    measurement_scale_pct: Option<i64>,
}

impl MarkPlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scales all measurement marks by `pct` percent.
    pub fn with_measurement_scale(mut self, pct: i64) -> Self {
        self.measurement_scale_pct = Some(pct);
        self
    }

    /// Resolves `spec` against `frame`, checks the anchor point, and emits
    /// the mark's shapes on `layer`.
    pub fn place(
        &mut self,
        spec: &MarkSpec,
        frame: Rect,
        layer: LayerKey,
    ) -> Result<Vec<(LayerKey, Shape)>> {
        let at = match spec.anchor {
            Anchor::Canvas(p) => p,
            Anchor::FrameCorner(c) => frame.corner(c),
            Anchor::FrameCenter => frame.center(),
        };
        if self.occupied.contains(&at) {
            return Err(Error::MarkPlacementConflict { x: at.x, y: at.y });
        }
        let size = match (spec.kind, self.measurement_scale_pct) {
            (MarkKind::Measurement, Some(pct)) => spec.size * pct / 100,
            _ => spec.size,
        };
        let shapes = render(spec.shape, at, size, spec.stroke)?;
        self.occupied.push(at);
        crate::log::trace!("placed {:?} {:?} mark at ({}, {})", spec.kind, spec.shape, at.x, at.y);
        Ok(shapes.into_iter().map(|s| (layer, s)).collect())
    }

    /// Places the four-corner registration group: an L mark at each corner
    /// of `frame`, rotated so every L opens toward the frame center.
    pub fn place_corner_group(
        &mut self,
        frame: Rect,
        size: i64,
        stroke: i64,
        layer: LayerKey,
    ) -> Result<Vec<(LayerKey, Shape)>> {
        let corners = [
            (Corner::UpperRight, 0.0),
            (Corner::UpperLeft, 90.0),
            (Corner::LowerLeft, 180.0),
            (Corner::LowerRight, 270.0),
        ];
        let mut out = Vec::with_capacity(4);
        for (corner, angle) in corners {
            let at = frame.corner(corner);
            if self.occupied.contains(&at) {
                return Err(Error::MarkPlacementConflict { x: at.x, y: at.y });
            }
            let t = Transformation::with_loc_and_angle(at, angle);
            for s in merge_parts(shapes::l_mark(Point::zero(), size, stroke)) {
                let poly = match s {
                    Shape::Rect(r) => r.to_poly(),
                    Shape::Polygon(p) => p,
                    Shape::Path(p) => p.to_poly(),
                };
                out.push((layer, Shape::Polygon(poly.transform(t))));
            }
            self.occupied.push(at);
        }
        Ok(out)
    }

    /// Places a regular grid of identical marks starting at `start` with the
    /// given pitch.
    pub fn place_array(
        &mut self,
        spec: &MarkSpec,
        start: Point,
        rows: usize,
        cols: usize,
        pitch_x: i64,
        pitch_y: i64,
        layer: LayerKey,
    ) -> Result<Vec<(LayerKey, Shape)>> {
        let mut out = Vec::new();
        // Anchors claimed by earlier iterations roll back with the error,
        // so a failed array leaves the placer untouched.
        let checkpoint = self.occupied.len();
        for r in 0..rows {
            for c in 0..cols {
                let at = Point::new(
                    start.x + c as i64 * pitch_x,
                    start.y + r as i64 * pitch_y,
                );
                let spec = MarkSpec {
                    anchor: Anchor::Canvas(at),
                    ..*spec
                };
                match self.place(&spec, Rect::from_point(at), layer) {
                    Ok(shapes) => out.extend(shapes),
                    Err(e) => {
                        self.occupied.truncate(checkpoint);
                        return Err(e);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Merges the two overlapping rectangles of a composite mark (cross, L, T)
/// into a single simple polygon.
fn merge_parts(parts: Vec<Shape>) -> Vec<Shape> {
    if let [Shape::Rect(a), Shape::Rect(b)] = parts.as_slice() {
        if let Some(p) = a.union(*b) {
            return vec![Shape::Polygon(p)];
        }
    }
    parts
}

/// The raw geometry of a mark shape centered (or cornered, for L marks) at
/// `at`.
fn render(shape: MarkShape, at: Point, size: i64, stroke: i64) -> Result<Vec<Shape>> {
    if size <= 0 {
        return Err(Error::InvalidGeometryParameter {
            param: "mark_size",
            value: size,
            limit: 1,
        });
    }
    Ok(match shape {
        MarkShape::Cross => merge_parts(shapes::cross(at, size, stroke)),
        MarkShape::Square => vec![shapes::rectangle(at, maskgeom::Dims::square(size))],
        MarkShape::Circle => vec![shapes::circle(at, size / 2)],
        MarkShape::Diamond => vec![shapes::diamond(at, size)],
        MarkShape::Triangle => vec![shapes::triangle(at, size, TriangleDir::Up)],
        MarkShape::LShape => merge_parts(shapes::l_mark(at, size, stroke)),
        MarkShape::TShape => merge_parts(shapes::t_mark(at, size, stroke)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdk::{Pdk, UM};
    use maskgeom::bbox::BoundBox;

    fn layer() -> LayerKey {
        Pdk::default_stack().layers.require("alignment_marks").unwrap()
    }

    fn spec(anchor: Anchor) -> MarkSpec {
        MarkSpec {
            kind: MarkKind::Alignment,
            shape: MarkShape::Cross,
            anchor,
            size: 20 * UM,
            stroke: 2 * UM,
        }
    }

    #[test]
    fn test_place_and_conflict() {
        let mut placer = MarkPlacer::new();
        let frame = Rect::new(Point::zero(), Point::new(100 * UM, 100 * UM));
        let s = spec(Anchor::Canvas(Point::new(10 * UM, 10 * UM)));
        let out = placer.place(&s, frame, layer()).unwrap();
        // The two bars of the cross merge into one simple polygon.
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0].1, Shape::Polygon(p) if p.points.len() == 12));
        assert_eq!(
            placer.place(&s, frame, layer()).unwrap_err(),
            Error::MarkPlacementConflict {
                x: 10 * UM,
                y: 10 * UM
            }
        );
    }

    #[test]
    fn test_frame_anchors() {
        let mut placer = MarkPlacer::new();
        let frame = Rect::new(Point::zero(), Point::new(100 * UM, 60 * UM));
        let s = spec(Anchor::FrameCenter);
        let out = placer.place(&s, frame, layer()).unwrap();
        let b = out
            .iter()
            .fold(maskgeom::bbox::Bbox::empty(), |acc, (_, s)| acc.union(s.bbox()))
            .into_rect();
        assert_eq!(b.center(), frame.center());

        // Same resolved point through a different anchor still conflicts.
        let s = spec(Anchor::Canvas(frame.center()));
        assert!(placer.place(&s, frame, layer()).is_err());
    }

    #[test]
    fn test_corner_group_opens_inward() {
        let mut placer = MarkPlacer::new();
        let frame = Rect::new(Point::zero(), Point::new(200 * UM, 200 * UM));
        let out = placer
            .place_corner_group(frame, 20 * UM, 2 * UM, layer())
            .unwrap();
        assert_eq!(out.len(), 4);
        // Every leg stays inside the frame.
        for (_, s) in &out {
            let b = s.brect();
            assert!(b.left() >= frame.left() && b.right() <= frame.right());
            assert!(b.bottom() >= frame.bottom() && b.top() <= frame.top());
        }
        // Re-registering any corner conflicts.
        let s = spec(Anchor::FrameCorner(Corner::LowerLeft));
        assert!(placer.place(&s, frame, layer()).is_err());
    }

    #[test]
    fn test_measurement_scale() {
        let mut placer = MarkPlacer::new().with_measurement_scale(200);
        let frame = Rect::from_point(Point::zero());
        let s = MarkSpec {
            kind: MarkKind::Measurement,
            shape: MarkShape::Square,
            anchor: Anchor::Canvas(Point::zero()),
            size: 10 * UM,
            stroke: UM,
        };
        let out = placer.place(&s, frame, layer()).unwrap();
        assert_eq!(out[0].1.brect().width(), 20 * UM);
    }

    #[test]
    fn test_mark_array_pitch_and_conflicts() {
        let mut placer = MarkPlacer::new();
        let s = spec(Anchor::Canvas(Point::zero()));
        let out = placer
            .place_array(&s, Point::zero(), 2, 3, 50 * UM, 40 * UM, layer())
            .unwrap();
        // One merged cross per grid site.
        assert_eq!(out.len(), 6);
        // A second overlapping array fails on the first shared site.
        assert!(placer
            .place_array(&s, Point::zero(), 1, 1, 50 * UM, 40 * UM, layer())
            .is_err());
    }

    #[test]
    fn test_mark_array_conflict_rolls_back() {
        let mut placer = MarkPlacer::new();
        let frame = Rect::from_point(Point::zero());
        // Occupy the second site of the upcoming row.
        placer
            .place(&spec(Anchor::Canvas(Point::new(50 * UM, 0))), frame, layer())
            .unwrap();
        let s = spec(Anchor::Canvas(Point::zero()));
        assert!(placer
            .place_array(&s, Point::zero(), 1, 3, 50 * UM, 40 * UM, layer())
            .is_err());
        // The failed array's earlier sites must not stay claimed.
        assert!(placer
            .place(&spec(Anchor::Canvas(Point::zero())), frame, layer())
            .is_ok());
    }

    #[test]
    fn test_invalid_mark_size() {
        let mut placer = MarkPlacer::new();
        let mut s = spec(Anchor::Canvas(Point::zero()));
        s.size = 0;
        assert!(matches!(
            placer.place(&s, Rect::from_point(Point::zero()), layer()),
            Err(Error::InvalidGeometryParameter { param: "mark_size", .. })
        ));
    }
}
