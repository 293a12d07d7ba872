//! Device assembly: parameter sets, device kinds, and the shared finishing
//! pass (labels, registration marks, pad fanout).

use std::collections::BTreeMap;

use arcstr::{format as arcformat, ArcStr};
use serde::{Deserialize, Serialize};

use maskgeom::bbox::{Bbox, BoundBox};
use maskgeom::{Dims, Point, Rect, Shape, Sides};

use crate::electrode::ElectrodeStyle;
use crate::error::{Error, Result};
use crate::marks::MarkPlacer;
use crate::pdk::{LayerKey, Pdk, UM};
use crate::qr;
use crate::route::{pad_ring, ChamferStyle, PadAssignment, Router, RouterConfig, Terminal};
use crate::text::{self, FontStyle};

pub mod fet;
pub mod hallbar;
pub mod tlm;

/// The device families the generator can assemble.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceKind {
    /// Bottom-gate field-effect transistor.
    Fet,
    /// FET with both bottom and top gates.
    DualGate,
    /// Hall bar with two current contacts and four voltage probes.
    HallBar,
    /// Transfer-length-method contact ladder.
    Tlm,
}

/// A named bag of device dimensions, in database units.
///
/// Assemblers read the dimensions they understand and fall back to their
/// defaults for everything absent; [`ParameterSet::require`] is for fields a
/// device cannot default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterSet {
    label: ArcStr,
    values: BTreeMap<ArcStr, i64>,
}

impl ParameterSet {
    pub fn new(label: impl Into<ArcStr>) -> Self {
        Self {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insertion.
    pub fn with(mut self, name: impl Into<ArcStr>, value: i64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<ArcStr>, value: i64) {
        self.values.insert(name.into(), value);
    }

    pub fn label(&self) -> &ArcStr {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<ArcStr>) {
        self.label = label.into();
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// The value of `name`, or `default` if absent.
    pub fn get_or(&self, name: &str, default: i64) -> i64 {
        self.get(name).unwrap_or(default)
    }

    /// The value of `name`, or [`Error::MissingParameter`].
    pub fn require(&self, name: &str) -> Result<i64> {
        self.get(name).ok_or_else(|| Error::MissingParameter {
            set: self.label.clone(),
            field: ArcStr::from(name),
        })
    }

    /// Checks that every name in `required` is present.
    pub fn check_contains<'a>(&self, required: impl IntoIterator<Item = &'a ArcStr>) -> Result<()> {
        for name in required {
            self.require(name)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArcStr, i64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}

/// Assembly options shared by all device kinds.
#[derive(Debug, Clone)]
pub struct DeviceOptions {
    pub electrode_style: ElectrodeStyle,
    /// Route terminals out to probe pads.
    pub fanout: bool,
    pub router: RouterConfig,
    pub pad_dims: Dims,
    /// Gap between the device outline and the pad ring.
    pub pad_standoff: i64,
    pub pad_chamfer: ChamferStyle,
    pub pad_chamfer_size: i64,
    /// Draw the device label and dimension annotation.
    pub labels: bool,
    /// Draw a QR-coded copy of the device label.
    pub qr_label: bool,
    /// Draw per-device corner registration marks.
    pub corner_marks: bool,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            electrode_style: ElectrodeStyle::Rectangle,
            fanout: true,
            // The fanout pad ring is built rank-matched to the terminal
            // exits, so positional assignment keeps its wires uncrossed.
            router: RouterConfig {
                assignment: PadAssignment::Positional,
                ..RouterConfig::default()
            },
            pad_dims: Dims::square(80 * UM),
            pad_standoff: 40 * UM,
            pad_chamfer: ChamferStyle::None,
            pad_chamfer_size: 0,
            labels: true,
            qr_label: false,
            corner_marks: true,
        }
    }
}

/// One fully assembled device, in its own local coordinate frame.
#[derive(Debug, Clone)]
pub struct AssembledDevice {
    pub cell_name: ArcStr,
    pub kind: DeviceKind,
    pub shapes: Vec<(LayerKey, Shape)>,
    pub terminals: Vec<Terminal>,
    /// The bounding rectangle of everything drawn.
    pub bbox: Rect,
}

/// Assembles a single device from a parameter set.
///
/// `index` distinguishes sibling devices within an array cell and feeds
/// default labels (`D1`, `D2`, ...).
pub fn assemble(
    kind: DeviceKind,
    params: &ParameterSet,
    index: usize,
    pdk: &Pdk,
    opts: &DeviceOptions,
) -> Result<AssembledDevice> {
    let device = match kind {
        DeviceKind::Fet => fet::assemble(params, index, pdk, opts, false),
        DeviceKind::DualGate => fet::assemble(params, index, pdk, opts, true),
        DeviceKind::HallBar => hallbar::assemble(params, index, pdk, opts),
        DeviceKind::Tlm => tlm::assemble(params, index, pdk, opts),
    }?;
    crate::log::info!(
        "assembled {} ({} shapes, {} terminals)",
        device.cell_name,
        device.shapes.len(),
        device.terminals.len()
    );
    Ok(device)
}

/// The display label for a parameter set: its own label, or `D{index + 1}`.
pub(crate) fn device_label(params: &ParameterSet, index: usize) -> ArcStr {
    if params.label().is_empty() {
        arcformat!("D{}", index + 1)
    } else {
        params.label().clone()
    }
}

/// The shared finishing pass: labels below the device, corner registration
/// marks around it, and pad fanout if enabled.
pub(crate) fn finish(
    cell_name: ArcStr,
    kind: DeviceKind,
    mut shapes: Vec<(LayerKey, Shape)>,
    terminals: Vec<Terminal>,
    core: Rect,
    label: &ArcStr,
    annotation: Option<ArcStr>,
    pdk: &Pdk,
    opts: &DeviceOptions,
) -> Result<AssembledDevice> {
    if opts.labels {
        let labels_layer = pdk.layers.require("labels")?;
        let style = FontStyle::Small;
        let at = Point::new(core.center().x, core.bottom() - 2 * style.size());
        for s in text::render_centered(label, at, style)? {
            shapes.push((labels_layer, s));
        }
        if let Some(note) = annotation {
            let at = Point::new(at.x, at.y - style.line_pitch());
            for s in text::render_centered(&note, at, style)? {
                shapes.push((labels_layer, s));
            }
        }
    }

    if opts.qr_label {
        let labels_layer = pdk.layers.require("labels")?;
        let dims = qr::symbol_dims(label, qr::MODULE)?;
        // Below the text labels, centered on the device.
        let origin = Point::new(
            core.center().x - dims.w() / 2,
            core.bottom() - 4 * FontStyle::Small.line_pitch() - dims.h(),
        );
        for s in qr::render(label, origin, qr::MODULE)? {
            shapes.push((labels_layer, s));
        }
    }

    if opts.corner_marks {
        let marks_layer = pdk.layers.require("alignment_marks")?;
        let frame = core.expand(10 * UM);
        let mut placer = MarkPlacer::new();
        shapes.extend(placer.place_corner_group(frame, 5 * UM, UM, marks_layer)?);
    }

    if opts.fanout && !terminals.is_empty() {
        fanout(&mut shapes, &terminals, core, pdk, opts)?;
    }

    let bbox = shapes_bbox(&shapes);
    Ok(AssembledDevice {
        cell_name,
        kind,
        shapes,
        terminals,
        bbox,
    })
}

/// Builds a pad ring sized to the terminal exits and routes every terminal
/// out to it.
fn fanout(
    shapes: &mut Vec<(LayerKey, Shape)>,
    terminals: &[Terminal],
    core: Rect,
    pdk: &Pdk,
    opts: &DeviceOptions,
) -> Result<()> {
    let mut counts = Sides::uniform(0usize);
    for t in terminals {
        counts[t.exit] += 1;
    }
    let pads: Vec<_> = pad_ring(core, counts, opts.pad_dims, opts.pad_standoff)
        .into_iter()
        .map(|p| p.with_chamfer(opts.pad_chamfer, opts.pad_chamfer_size))
        .collect();

    let mut router = Router::new(opts.router.clone());
    router.add_keepouts([core]);
    let routes = router.route(terminals, &pads)?;

    let pads_layer = pdk.layers.require("pads")?;
    let routing_layer = pdk.layers.require("routing")?;
    for route in &routes {
        shapes.push((pads_layer, pads[route.pad].outline()?));
        shapes.push((routing_layer, route.wire.clone()));
    }
    Ok(())
}

pub(crate) fn shapes_bbox(shapes: &[(LayerKey, Shape)]) -> Rect {
    shapes
        .iter()
        .fold(Bbox::empty(), |acc, (_, s)| acc.union(s.bbox()))
        .into_rect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_set_access() {
        let p = ParameterSet::new("D1")
            .with("channel_width", 3 * UM)
            .with("channel_length", 10 * UM);
        assert_eq!(p.get("channel_width"), Some(3 * UM));
        assert_eq!(p.get_or("gate_overlap", 2 * UM), 2 * UM);
        assert_eq!(p.require("channel_length"), Ok(10 * UM));
        assert_eq!(
            p.require("bar_width"),
            Err(Error::MissingParameter {
                set: ArcStr::from("D1"),
                field: ArcStr::from("bar_width"),
            })
        );
    }

    #[test]
    fn test_parameter_set_iteration_sorted() {
        let p = ParameterSet::new("x")
            .with("w", 1)
            .with("a", 2)
            .with("m", 3);
        let names: Vec<&str> = p.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["a", "m", "w"]);
    }

    #[test]
    fn test_device_label_fallback() {
        let named = ParameterSet::new("REF");
        assert_eq!(device_label(&named, 4).as_str(), "REF");
        let unnamed = ParameterSet::default();
        assert_eq!(device_label(&unnamed, 4).as_str(), "D5");
    }

    #[test]
    fn test_assemble_dispatch() {
        let pdk = Pdk::default_stack();
        let opts = DeviceOptions::default();
        let params = ParameterSet::new("D1");
        for kind in [
            DeviceKind::Fet,
            DeviceKind::DualGate,
            DeviceKind::HallBar,
            DeviceKind::Tlm,
        ] {
            let dev = assemble(kind, &params, 0, &pdk, &opts).unwrap();
            assert_eq!(dev.kind, kind);
            assert!(!dev.shapes.is_empty());
            assert!(!dev.terminals.is_empty());
        }
    }

    #[test]
    fn test_assemble_without_fanout_is_compact() {
        let pdk = Pdk::default_stack();
        let mut opts = DeviceOptions::default();
        opts.fanout = false;
        let compact = assemble(DeviceKind::Fet, &ParameterSet::default(), 0, &pdk, &opts).unwrap();
        let full = assemble(
            DeviceKind::Fet,
            &ParameterSet::default(),
            0,
            &pdk,
            &DeviceOptions::default(),
        )
        .unwrap();
        assert!(full.bbox.width() > compact.bbox.width());
        assert!(full.bbox.height() > compact.bbox.height());
    }

    #[test]
    fn test_qr_label_emitted() {
        let pdk = Pdk::default_stack();
        let mut opts = DeviceOptions::default();
        opts.fanout = false;
        opts.corner_marks = false;
        let plain = assemble(DeviceKind::Fet, &ParameterSet::new("D3"), 0, &pdk, &opts).unwrap();
        opts.qr_label = true;
        let coded = assemble(DeviceKind::Fet, &ParameterSet::new("D3"), 0, &pdk, &opts).unwrap();
        let labels = pdk.layers.require("labels").unwrap();
        let count =
            |d: &AssembledDevice| d.shapes.iter().filter(|(l, _)| *l == labels).count();
        assert!(count(&coded) > count(&plain));
        // The symbol sits below the device core.
        let core_bottom = -((5 * UM + 2 * 2 * UM) / 2);
        for (l, s) in &coded.shapes {
            if *l == labels {
                assert!(s.brect().top() < core_bottom);
            }
        }
    }

    #[test]
    fn test_assembly_determinism() {
        let pdk = Pdk::default_stack();
        let opts = DeviceOptions::default();
        let params = ParameterSet::new("D1").with("channel_width", 7 * UM);
        let a = assemble(DeviceKind::DualGate, &params, 0, &pdk, &opts).unwrap();
        let b = assemble(DeviceKind::DualGate, &params, 0, &pdk, &opts).unwrap();
        assert_eq!(a.shapes, b.shapes);
        assert_eq!(a.bbox, b.bbox);
    }
}
