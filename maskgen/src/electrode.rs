//! Layered electrode stacks: gate, channel etch, source/drain contacts,
//! dielectric, and optional top gate.
//!
//! The stack is built at the local origin with the channel length along x
//! and the channel width along y. Every dimension is validated against the
//! process minima before any shape is emitted, so a stack either builds
//! completely or returns the first violation.

use arcstr::{format as arcformat, ArcStr};
use serde::{Deserialize, Serialize};

use maskgeom::bbox::BoundBox;
use maskgeom::{Dims, Point, Rect, Shape, Side};

use crate::error::Result;
use crate::pdk::{LayerKey, Pdk, UM};
use crate::route::{Terminal, TerminalRole};
use crate::shapes;

/// The outline family used for gate electrodes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ElectrodeStyle {
    #[default]
    Rectangle,
    Rounded,
    Octagon,
    Ellipse,
}

/// Electrode stack dimensions, in database units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElectrodeParams {
    /// Channel extent along y.
    pub channel_width: i64,
    /// Channel extent along x, between the source and drain edges.
    pub channel_length: i64,
    /// How far the gate extends past the channel on every side.
    pub gate_overlap: i64,
    /// Source/drain contact extent along y.
    pub source_drain_width: i64,
    /// Source/drain contact extent along x.
    pub source_drain_length: i64,
    /// How far the channel etch opening extends past the channel.
    pub etch_margin: i64,
    /// How far the dielectric extends past the channel (top-gate stacks).
    pub dielectric_margin: i64,
    pub style: ElectrodeStyle,
    /// Adds the dielectric and top-gate layers.
    pub top_gate: bool,
}

impl Default for ElectrodeParams {
    fn default() -> Self {
        Self {
            channel_width: 5 * UM,
            channel_length: 20 * UM,
            gate_overlap: 2 * UM,
            source_drain_width: 8 * UM,
            source_drain_length: 10 * UM,
            etch_margin: UM / 2,
            dielectric_margin: 2 * UM,
            style: ElectrodeStyle::Rectangle,
            top_gate: false,
        }
    }
}

/// A fully built electrode stack.
#[derive(Debug, Clone)]
pub struct ElectrodeStack {
    pub shapes: Vec<(LayerKey, Shape)>,
    pub terminals: Vec<Terminal>,
    /// The channel region itself.
    pub channel: Rect,
    /// The bounding rectangle of all drawn layers.
    pub outline: Rect,
}

/// Builds the electrode stack for device `device`, named with prefix
/// `name` (terminals become `{name}.gate` and so on).
pub fn build(
    params: &ElectrodeParams,
    name: &str,
    device: usize,
    pdk: &Pdk,
) -> Result<ElectrodeStack> {
    validate(params, pdk)?;

    let p = &pdk.process;
    let layers = &pdk.layers;
    let w = params.channel_width;
    let l = params.channel_length;
    let ov = params.gate_overlap;

    let channel = Rect::centered(Point::zero(), Dims::new(l, w));
    let gate_dims = Dims::new(l + 2 * ov, w + 2 * ov);

    let mut out = Vec::new();
    let mut terminals = Vec::new();

    let bottom_gate = layers.require("bottom_gate")?;
    let gate_shape = electrode_shape(Point::zero(), gate_dims, params.style)?;
    let gate_rect = gate_shape.brect();
    out.push((bottom_gate, gate_shape));
    terminals.push(Terminal {
        name: arcformat!("{}.gate", name),
        role: TerminalRole::Gate,
        device,
        at: gate_rect.edge_center(Side::Bot),
        exit: Side::Bot,
        width: (gate_rect.width() / 2).max(p.min_feature_size),
    });

    let etch = layers.require("channel_etch")?;
    out.push((
        etch,
        shapes::rectangle(
            Point::zero(),
            Dims::new(l + 2 * params.etch_margin, w + 2 * params.etch_margin),
        ),
    ));

    let source_drain = layers.require("source_drain")?;
    let sd = Dims::new(params.source_drain_length, params.source_drain_width);
    let source = Rect::centered(
        Point::new(-(l + params.source_drain_length) / 2, 0),
        sd,
    );
    let drain = Rect::centered(Point::new((l + params.source_drain_length) / 2, 0), sd);
    out.push((source_drain, Shape::Rect(source)));
    out.push((source_drain, Shape::Rect(drain)));
    terminals.push(Terminal {
        name: arcformat!("{}.source", name),
        role: TerminalRole::Source,
        device,
        at: source.edge_center(Side::Left),
        exit: Side::Left,
        width: source.height(),
    });
    terminals.push(Terminal {
        name: arcformat!("{}.drain", name),
        role: TerminalRole::Drain,
        device,
        at: drain.edge_center(Side::Right),
        exit: Side::Right,
        width: drain.height(),
    });

    if params.top_gate {
        let dielectric = layers.require("dielectric")?;
        out.push((
            dielectric,
            shapes::rectangle(
                Point::zero(),
                Dims::new(
                    l + 2 * params.dielectric_margin,
                    w + 2 * params.dielectric_margin,
                ),
            ),
        ));
        let top = layers.require("top_gate")?;
        let top_shape = electrode_shape(Point::zero(), gate_dims, params.style)?;
        let top_rect = top_shape.brect();
        out.push((top, top_shape));
        terminals.push(Terminal {
            name: arcformat!("{}.top_gate", name),
            role: TerminalRole::Gate,
            device,
            at: top_rect.edge_center(Side::Top),
            exit: Side::Top,
            width: (top_rect.width() / 2).max(p.min_feature_size),
        });
    }

    let outline = out
        .iter()
        .fold(maskgeom::bbox::Bbox::empty(), |acc, (_, s)| {
            acc.union(s.bbox())
        })
        .into_rect();

    crate::log::debug!(
        "built electrode stack `{}`: {} shapes, {} terminals",
        name,
        out.len(),
        terminals.len()
    );

    Ok(ElectrodeStack {
        shapes: out,
        terminals,
        channel,
        outline,
    })
}

/// Produces a gate outline covering at least `dims` in the requested style.
///
/// Curved styles are sized so the rectangle `dims` is fully covered.
fn electrode_shape(center: Point, dims: Dims, style: ElectrodeStyle) -> Result<Shape> {
    match style {
        ElectrodeStyle::Rectangle => Ok(shapes::rectangle(center, dims)),
        ElectrodeStyle::Rounded => shapes::rounded_rect(
            center,
            Dims::new(dims.w() + dims.shorter() / 2, dims.h() + dims.shorter() / 2),
            dims.shorter() / 4,
        ),
        ElectrodeStyle::Octagon => shapes::octagon(
            center,
            Dims::new(dims.w() + dims.shorter() / 2, dims.h() + dims.shorter() / 2),
            dims.shorter() / 4,
        ),
        // An ellipse at 3/2 scale still covers the corners of `dims`.
        ElectrodeStyle::Ellipse => Ok(shapes::ellipse(
            center,
            Dims::new(dims.w() * 3 / 2, dims.h() * 3 / 2),
        )),
    }
}

fn validate(params: &ElectrodeParams, pdk: &Pdk) -> Result<()> {
    let p = &pdk.process;
    p.check_feature("channel_width", params.channel_width)?;
    p.check_feature("channel_length", params.channel_length)?;
    p.check_feature("source_drain_width", params.source_drain_width)?;
    p.check_feature("source_drain_length", params.source_drain_length)?;
    p.check("gate_overlap", params.gate_overlap, p.min_overlap)?;
    // The contact must land clear of the gate footprint below it.
    p.check(
        "source_drain_contact_clearance",
        params.source_drain_length,
        params.gate_overlap + p.min_spacing,
    )?;
    if params.top_gate {
        p.check(
            "dielectric_margin",
            params.dielectric_margin,
            p.min_overlap,
        )?;
    }
    Ok(())
}

/// A human-readable label line for an electrode stack, e.g. `W=5.0 L=20.0`.
pub fn dimension_label(params: &ElectrodeParams) -> ArcStr {
    arcformat!(
        "W={} L={}",
        crate::text::format_um(params.channel_width),
        crate::text::format_um(params.channel_length)
    )
}
