//! A monospaced stroke font for on-mask labels.
//!
//! Glyphs are defined as stroke segments on a 4x6 unit grid (baseline at
//! y = 0, cap height at y = 6) and scaled so the cap height equals the
//! style's nominal size. Every glyph advances by the same amount, so label
//! widths are a pure function of character count. Lowercase ASCII letters
//! render as their uppercase forms; anything outside the supported set is an
//! [`Error::UnsupportedGlyph`] naming the offending character and position.

use maskgeom::transform::{Transform, Transformation};
use maskgeom::{Point, Rect, Shape, ShapeTrait};

use crate::error::{Error, Result};
use crate::pdk::UM;

/// Grid units per em: glyphs are 4 units wide with a 2-unit gap.
const ADVANCE_UNITS: i64 = 6;
/// Grid units of cap height.
const CAP_UNITS: i64 = 6;

/// The label size presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    /// Device labels, 5 um cap height.
    #[default]
    Default,
    /// Array titles, 8 um cap height.
    Title,
    /// Parameter annotations, 3 um cap height.
    Small,
}

impl FontStyle {
    /// The cap height in database units.
    pub fn size(&self) -> i64 {
        match self {
            Self::Default => 5 * UM,
            Self::Title => 8 * UM,
            Self::Small => 3 * UM,
        }
    }

    /// The baseline-to-baseline pitch for multiline text.
    pub fn line_pitch(&self) -> i64 {
        self.size() * 3 / 2
    }

    /// The horizontal advance per character.
    pub fn advance(&self) -> i64 {
        self.size() / CAP_UNITS * ADVANCE_UNITS
    }
}

/// The width of `line` when rendered in `style`.
pub fn line_width(line: &str, style: FontStyle) -> i64 {
    line.chars().count() as i64 * style.advance()
}

/// Renders `text` with the baseline of its first line starting at `origin`.
///
/// Newlines stack subsequent lines downward at the style's line pitch.
pub fn render(text: &str, origin: Point, style: FontStyle) -> Result<Vec<Shape>> {
    let unit = style.size() / CAP_UNITS;
    let half = (unit / 2).max(1);
    let mut shapes = Vec::new();
    let mut cursor = origin;
    for (index, ch) in text.chars().enumerate() {
        if ch == '\n' {
            cursor = Point::new(origin.x, cursor.y - style.line_pitch());
            continue;
        }
        let segs = glyph(ch).ok_or(Error::UnsupportedGlyph { ch, index })?;
        for &(x0, y0, x1, y1) in segs {
            let a = Point::new(cursor.x + x0 as i64 * unit, cursor.y + y0 as i64 * unit);
            let b = Point::new(cursor.x + x1 as i64 * unit, cursor.y + y1 as i64 * unit);
            shapes.push(stroke(a, b, half)?);
        }
        cursor.x += style.advance();
    }
    Ok(shapes)
}

/// Renders `text` horizontally centered on `center`.
///
/// The first line is centered; following lines share its left edge.
pub fn render_centered(text: &str, center: Point, style: FontStyle) -> Result<Vec<Shape>> {
    let first = text.lines().next().unwrap_or("");
    let origin = Point::new(
        center.x - line_width(first, style) / 2,
        center.y - style.size() / 2,
    );
    render(text, origin, style)
}

/// Renders `text` rotated by `angle` degrees counterclockwise about `origin`.
pub fn render_rotated(text: &str, origin: Point, style: FontStyle, angle: f64) -> Result<Vec<Shape>> {
    let shapes = render(text, Point::zero(), style)?;
    let t = Transformation::with_loc_and_angle(origin, angle);
    Ok(shapes
        .into_iter()
        .map(|s| match s {
            // Rects must go through a polygon so rotation does not collapse
            // them back to their bounding box.
            Shape::Rect(r) => Shape::Polygon(r.to_poly().transform(t)),
            other => other.transform(t),
        })
        .collect())
}

/// Formats a database-unit length in microns with one decimal, e.g. `3.5`.
pub fn format_um(dbu: i64) -> String {
    format!("{:.1}", dbu as f64 / UM as f64)
}

/// One stroke of a glyph. Axis-aligned strokes (including dots) become
/// rects with square caps; diagonals become four-point polygons.
fn stroke(a: Point, b: Point, half: i64) -> Result<Shape> {
    if a.x == b.x || a.y == b.y {
        Ok(Shape::Rect(Rect::new(a, b).expand(half)))
    } else {
        crate::shapes::straight_wire(a, b, 2 * half)
    }
}

type Seg = (i8, i8, i8, i8);

/// Stroke segments for `ch` on the 4x6 glyph grid, or `None` if the
/// character is not in the font.
fn glyph(ch: char) -> Option<&'static [Seg]> {
    let ch = if ch.is_ascii_lowercase() {
        ch.to_ascii_uppercase()
    } else {
        ch
    };
    let segs: &'static [Seg] = match ch {
        ' ' => &[],
        '0' => &[(0, 0, 4, 0), (4, 0, 4, 6), (4, 6, 0, 6), (0, 6, 0, 0), (0, 0, 4, 6)],
        '1' => &[(2, 0, 2, 6), (1, 5, 2, 6), (0, 0, 4, 0)],
        '2' => &[(0, 6, 4, 6), (4, 6, 4, 3), (4, 3, 0, 3), (0, 3, 0, 0), (0, 0, 4, 0)],
        '3' => &[(0, 6, 4, 6), (4, 6, 4, 0), (4, 0, 0, 0), (1, 3, 4, 3)],
        '4' => &[(0, 6, 0, 3), (0, 3, 4, 3), (3, 6, 3, 0)],
        '5' => &[(4, 6, 0, 6), (0, 6, 0, 3), (0, 3, 4, 3), (4, 3, 4, 0), (4, 0, 0, 0)],
        '6' => &[(4, 6, 0, 6), (0, 6, 0, 0), (0, 0, 4, 0), (4, 0, 4, 3), (4, 3, 0, 3)],
        '7' => &[(0, 6, 4, 6), (4, 6, 2, 0)],
        '8' => &[(0, 0, 4, 0), (4, 0, 4, 6), (4, 6, 0, 6), (0, 6, 0, 0), (0, 3, 4, 3)],
        '9' => &[(4, 3, 0, 3), (0, 3, 0, 6), (0, 6, 4, 6), (4, 6, 4, 0), (4, 0, 0, 0)],
        'A' => &[(0, 0, 0, 4), (0, 4, 2, 6), (2, 6, 4, 4), (4, 4, 4, 0), (0, 2, 4, 2)],
        'B' => &[
            (0, 0, 0, 6),
            (0, 6, 3, 6),
            (3, 6, 4, 5),
            (4, 5, 3, 3),
            (0, 3, 3, 3),
            (3, 3, 4, 1),
            (4, 1, 3, 0),
            (3, 0, 0, 0),
        ],
        'C' => &[(4, 6, 0, 6), (0, 6, 0, 0), (0, 0, 4, 0)],
        'D' => &[(0, 0, 0, 6), (0, 6, 3, 6), (3, 6, 4, 4), (4, 4, 4, 2), (4, 2, 3, 0), (3, 0, 0, 0)],
        'E' => &[(4, 6, 0, 6), (0, 6, 0, 0), (0, 0, 4, 0), (0, 3, 3, 3)],
        'F' => &[(4, 6, 0, 6), (0, 6, 0, 0), (0, 3, 3, 3)],
        'G' => &[(4, 6, 0, 6), (0, 6, 0, 0), (0, 0, 4, 0), (4, 0, 4, 3), (4, 3, 2, 3)],
        'H' => &[(0, 0, 0, 6), (4, 0, 4, 6), (0, 3, 4, 3)],
        'I' => &[(0, 6, 4, 6), (2, 6, 2, 0), (0, 0, 4, 0)],
        'J' => &[(4, 6, 4, 1), (4, 1, 3, 0), (3, 0, 1, 0), (1, 0, 0, 1)],
        'K' => &[(0, 0, 0, 6), (4, 6, 0, 3), (0, 3, 4, 0)],
        'L' => &[(0, 6, 0, 0), (0, 0, 4, 0)],
        'M' => &[(0, 0, 0, 6), (0, 6, 2, 3), (2, 3, 4, 6), (4, 6, 4, 0)],
        'N' => &[(0, 0, 0, 6), (0, 6, 4, 0), (4, 0, 4, 6)],
        'O' => &[(0, 0, 4, 0), (4, 0, 4, 6), (4, 6, 0, 6), (0, 6, 0, 0)],
        'P' => &[(0, 0, 0, 6), (0, 6, 4, 6), (4, 6, 4, 3), (4, 3, 0, 3)],
        'Q' => &[(0, 0, 4, 0), (4, 0, 4, 6), (4, 6, 0, 6), (0, 6, 0, 0), (2, 2, 4, 0)],
        'R' => &[(0, 0, 0, 6), (0, 6, 4, 6), (4, 6, 4, 3), (4, 3, 0, 3), (1, 3, 4, 0)],
        'S' => &[(4, 6, 1, 6), (1, 6, 0, 5), (0, 5, 0, 3), (0, 3, 4, 3), (4, 3, 4, 1), (4, 1, 0, 0)],
        'T' => &[(0, 6, 4, 6), (2, 6, 2, 0)],
        'U' => &[(0, 6, 0, 1), (0, 1, 1, 0), (1, 0, 3, 0), (3, 0, 4, 1), (4, 1, 4, 6)],
        'V' => &[(0, 6, 2, 0), (2, 0, 4, 6)],
        'W' => &[(0, 6, 1, 0), (1, 0, 2, 3), (2, 3, 3, 0), (3, 0, 4, 6)],
        'X' => &[(0, 0, 4, 6), (0, 6, 4, 0)],
        'Y' => &[(0, 6, 2, 3), (4, 6, 2, 3), (2, 3, 2, 0)],
        'Z' => &[(0, 6, 4, 6), (4, 6, 0, 0), (0, 0, 4, 0)],
        '.' => &[(2, 0, 2, 0)],
        ',' => &[(2, 1, 1, -1)],
        ':' => &[(2, 1, 2, 1), (2, 4, 2, 4)],
        ';' => &[(2, 4, 2, 4), (2, 1, 1, -1)],
        '-' => &[(1, 3, 3, 3)],
        '+' => &[(2, 1, 2, 5), (0, 3, 4, 3)],
        '=' => &[(0, 2, 4, 2), (0, 4, 4, 4)],
        '/' => &[(0, 0, 4, 6)],
        '(' => &[(3, 6, 2, 4), (2, 4, 2, 2), (2, 2, 3, 0)],
        ')' => &[(1, 6, 2, 4), (2, 4, 2, 2), (2, 2, 1, 0)],
        '\u{d7}' => &[(0, 1, 4, 5), (0, 5, 4, 1)],
        '\u{b5}' | '\u{3bc}' => &[(0, 4, 0, -2), (0, 1, 1, 0), (1, 0, 3, 0), (4, 4, 4, 0)],
        _ => return None,
    };
    Some(segs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskgeom::bbox::{Bbox, BoundBox};

    fn extent(shapes: &[Shape]) -> Rect {
        shapes
            .iter()
            .fold(Bbox::empty(), |acc, s| acc.union(s.bbox()))
            .into_rect()
    }

    #[test]
    fn test_monospace_advance() {
        let style = FontStyle::Default;
        let one = render("W", Point::zero(), style).unwrap();
        let three = render("W=3", Point::zero(), style).unwrap();
        assert_eq!(line_width("W=3", style), 3 * style.advance());
        // The third glyph starts exactly two advances past the first.
        assert!(extent(&three).right() >= extent(&one).right() + 2 * style.advance());
    }

    #[test]
    fn test_unsupported_glyph_position() {
        let err = render("AB@C", Point::zero(), FontStyle::Default).unwrap_err();
        assert_eq!(err, Error::UnsupportedGlyph { ch: '@', index: 2 });
    }

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        let lower = render("um", Point::zero(), FontStyle::Small).unwrap();
        let upper = render("UM", Point::zero(), FontStyle::Small).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_multiline_stacks_downward() {
        let style = FontStyle::Small;
        let shapes = render("A\nB", Point::zero(), style).unwrap();
        let first = render("A", Point::zero(), style).unwrap();
        let r = extent(&shapes);
        // Second line sits one pitch below the first baseline.
        assert!(r.bottom() <= extent(&first).bottom() - style.line_pitch() + style.size());
        assert_eq!(r.left(), extent(&first).left());
    }

    #[test]
    fn test_render_centered() {
        let style = FontStyle::Default;
        let shapes = render_centered("HI", Point::new(10_000, 0), style).unwrap();
        let r = extent(&shapes);
        let mid = (r.left() + r.right()) / 2;
        // Centered to within a stroke width.
        assert!((mid - 10_000).abs() <= style.size() / CAP_UNITS);
    }

    #[test]
    fn test_render_rotated_vertical() {
        let style = FontStyle::Default;
        let flat = render("L", Point::zero(), style).unwrap();
        let rot = render_rotated("L", Point::zero(), style, 90.0).unwrap();
        let (fr, rr) = (extent(&flat), extent(&rot));
        assert_eq!(fr.width(), rr.height());
        assert_eq!(fr.height(), rr.width());
    }

    #[test]
    fn test_format_um() {
        assert_eq!(format_um(3_000), "3.0");
        assert_eq!(format_um(10_500), "10.5");
        assert_eq!(format_um(250), "0.2");
    }

    #[test]
    fn test_empty_and_space() {
        assert!(render("", Point::zero(), FontStyle::Default)
            .unwrap()
            .is_empty());
        assert!(render("   ", Point::zero(), FontStyle::Default)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_determinism() {
        let a = render("D1: W=3.0", Point::new(5, 5), FontStyle::Small).unwrap();
        let b = render("D1: W=3.0", Point::new(5, 5), FontStyle::Small).unwrap();
        assert_eq!(a, b);
    }
}
