//! QR-coded identifiers: machine-readable labels drawn as a matrix of
//! square pixels on the labels layer.
//!
//! The symbol is encoded with medium error correction, so a scan survives
//! the partial damage a processed die accumulates.

use arcstr::ArcStr;
use qrcode::{Color, EcLevel, QrCode};

use maskgeom::{Dims, Point, Shape};

use crate::error::{Error, Result};
use crate::pdk::UM;
use crate::shapes;

/// Default module (pixel) size.
pub const MODULE: i64 = 2 * UM;

/// Renders `text` as a QR symbol whose dark modules are `module`-sized
/// squares. `origin` is the lower-left corner of the symbol; the first
/// matrix row sits at the top.
pub fn render(text: &str, origin: Point, module: i64) -> Result<Vec<Shape>> {
    if module <= 0 {
        return Err(Error::InvalidGeometryParameter {
            param: "qr_module",
            value: module,
            limit: 1,
        });
    }
    let code = encode(text)?;
    let width = code.width();
    let mut out = Vec::new();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == Color::Dark {
            let col = (i % width) as i64;
            let row = (i / width) as i64;
            let center = Point::new(
                origin.x + col * module + module / 2,
                origin.y + (width as i64 - 1 - row) * module + module / 2,
            );
            out.push(shapes::rectangle(center, Dims::square(module)));
        }
    }
    crate::log::trace!("rendered QR identifier for {:?} ({} modules wide)", text, width);
    Ok(out)
}

/// The drawn extent of the symbol for `text` at the given module size.
pub fn symbol_dims(text: &str, module: i64) -> Result<Dims> {
    let width = encode(text)?.width() as i64;
    Ok(Dims::square(width * module))
}

fn encode(text: &str) -> Result<QrCode> {
    QrCode::with_error_correction_level(text, EcLevel::M).map_err(|_| {
        Error::IdentifierEncoding {
            text: ArcStr::from(text),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskgeom::bbox::BoundBox;

    #[test]
    fn test_render_modules() {
        let origin = Point::new(10 * UM, 20 * UM);
        let shapes = render("D1", origin, MODULE).unwrap();
        let dims = symbol_dims("D1", MODULE).unwrap();
        // Every dark module is one square of the module size, inside the
        // symbol extent.
        for s in &shapes {
            let r = s.brect();
            assert_eq!(r.dims(), Dims::square(MODULE));
            assert!(r.left() >= origin.x && r.right() <= origin.x + dims.w());
            assert!(r.bottom() >= origin.y && r.top() <= origin.y + dims.h());
        }
        // The finder pattern puts a dark module at the top-left corner.
        let top_left = Point::new(origin.x + MODULE / 2, origin.y + dims.h() - MODULE / 2);
        assert!(shapes.iter().any(|s| s.brect().center() == top_left));
    }

    #[test]
    fn test_render_deterministic() {
        let a = render("HALLBAR_D7", Point::zero(), MODULE).unwrap();
        let b = render("HALLBAR_D7", Point::zero(), MODULE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_module_size() {
        assert!(matches!(
            render("D1", Point::zero(), 0),
            Err(Error::InvalidGeometryParameter { param: "qr_module", .. })
        ));
    }

    #[test]
    fn test_oversize_text_rejected() {
        let text = "X".repeat(4000);
        assert!(matches!(
            render(&text, Point::zero(), MODULE),
            Err(Error::IdentifierEncoding { .. })
        ));
    }
}
