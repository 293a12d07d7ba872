//! Hall bars: a conductive bar with current contacts at both ends and two
//! pairs of voltage probe arms.

use arcstr::format as arcformat;

use maskgeom::{Dims, Point, Rect, Shape, Side};

use crate::error::{Error, Result};
use crate::pdk::{Pdk, UM};
use crate::route::{Terminal, TerminalRole};

use super::{device_label, finish, AssembledDevice, DeviceKind, DeviceOptions, ParameterSet};

/// Assembles a Hall bar.
///
/// Recognized parameters: `bar_width`, `bar_length`, `arm_width`,
/// `arm_length`, `probe_spacing` (center-to-center along the bar),
/// `contact_length`.
pub fn assemble(
    params: &ParameterSet,
    index: usize,
    pdk: &Pdk,
    opts: &DeviceOptions,
) -> Result<AssembledDevice> {
    let bar_width = params.get_or("bar_width", 10 * UM);
    let bar_length = params.get_or("bar_length", 60 * UM);
    let arm_width = params.get_or("arm_width", 4 * UM);
    let arm_length = params.get_or("arm_length", 10 * UM);
    let probe_spacing = params.get_or("probe_spacing", 20 * UM);
    let contact_length = params.get_or("contact_length", 10 * UM);

    let p = &pdk.process;
    p.check_feature("bar_width", bar_width)?;
    p.check_feature("bar_length", bar_length)?;
    p.check_feature("arm_width", arm_width)?;
    p.check_feature("contact_length", contact_length)?;
    // Probe arms must fit along the bar, clear of the current contacts.
    if probe_spacing + arm_width + 2 * p.min_spacing > bar_length {
        return Err(Error::InvalidGeometryParameter {
            param: "probe_spacing",
            value: probe_spacing,
            limit: bar_length - arm_width - 2 * p.min_spacing,
        });
    }

    let label = device_label(params, index);
    let etch = pdk.layers.require("channel_etch")?;
    let contacts = pdk.layers.require("source_drain")?;

    let mut out = Vec::new();
    let mut terminals = Vec::new();

    let bar = Rect::centered(Point::zero(), Dims::new(bar_length, bar_width));
    out.push((etch, Shape::Rect(bar)));

    // Current contacts overlap the bar ends slightly on all sides.
    let contact_dims = Dims::new(contact_length, bar_width + 4 * UM);
    let i_plus = Rect::centered(
        Point::new(-(bar_length + contact_length) / 2, 0),
        contact_dims,
    );
    let i_minus = Rect::centered(
        Point::new((bar_length + contact_length) / 2, 0),
        contact_dims,
    );
    out.push((contacts, Shape::Rect(i_plus)));
    out.push((contacts, Shape::Rect(i_minus)));
    terminals.push(Terminal {
        name: arcformat!("{}.i_plus", label),
        role: TerminalRole::Source,
        device: index,
        at: i_plus.edge_center(Side::Left),
        exit: Side::Left,
        width: i_plus.height(),
    });
    terminals.push(Terminal {
        name: arcformat!("{}.i_minus", label),
        role: TerminalRole::Drain,
        device: index,
        at: i_minus.edge_center(Side::Right),
        exit: Side::Right,
        width: i_minus.height(),
    });

    // Voltage probe pairs: (v1, v2) on top, (v3, v4) on the bottom, at
    // +- probe_spacing / 2 around the bar center.
    let probes = [
        (0u8, -probe_spacing / 2, Side::Top),
        (1, probe_spacing / 2, Side::Top),
        (2, -probe_spacing / 2, Side::Bot),
        (3, probe_spacing / 2, Side::Bot),
    ];
    for (k, x, side) in probes {
        let sign = side.sign().as_int();
        let inner = bar.side(side);
        let arm = Rect::new(
            Point::new(x - arm_width / 2, inner),
            Point::new(x + arm_width / 2, inner + sign * arm_length),
        );
        out.push((contacts, Shape::Rect(arm)));
        terminals.push(Terminal {
            name: arcformat!("{}.v{}", label, k + 1),
            role: TerminalRole::Contact(k),
            device: index,
            at: arm.edge_center(side),
            exit: side,
            width: arm.width(),
        });
    }

    let outline = super::shapes_bbox(&out);
    let annotation = arcformat!(
        "W={} L={}",
        crate::text::format_um(bar_width),
        crate::text::format_um(bar_length)
    );
    finish(
        arcformat!("HALLBAR_{}", label),
        DeviceKind::HallBar,
        out,
        terminals,
        outline,
        &label,
        Some(annotation),
        pdk,
        opts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_opts() -> DeviceOptions {
        DeviceOptions {
            fanout: false,
            labels: false,
            corner_marks: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_hallbar_structure() {
        let pdk = Pdk::default_stack();
        let dev = assemble(&ParameterSet::new("H1"), 0, &pdk, &bare_opts()).unwrap();
        // Bar, two current contacts, four arms.
        assert_eq!(dev.shapes.len(), 7);
        assert_eq!(dev.terminals.len(), 6);
        let contacts = dev
            .terminals
            .iter()
            .filter(|t| matches!(t.role, TerminalRole::Contact(_)))
            .count();
        assert_eq!(contacts, 4);
    }

    #[test]
    fn test_probe_arms_symmetric() {
        let pdk = Pdk::default_stack();
        let dev = assemble(&ParameterSet::new("H1"), 0, &pdk, &bare_opts()).unwrap();
        let v1 = dev.terminals.iter().find(|t| t.name.ends_with(".v1")).unwrap();
        let v2 = dev.terminals.iter().find(|t| t.name.ends_with(".v2")).unwrap();
        let v3 = dev.terminals.iter().find(|t| t.name.ends_with(".v3")).unwrap();
        assert_eq!(v1.at.x, -v2.at.x);
        assert_eq!(v1.at.x, v3.at.x);
        assert_eq!(v1.at.y, -v3.at.y);
        assert_eq!(v1.exit, Side::Top);
        assert_eq!(v3.exit, Side::Bot);
    }

    #[test]
    fn test_probe_spacing_limit() {
        let pdk = Pdk::default_stack();
        let params = ParameterSet::new("H1")
            .with("bar_length", 30 * UM)
            .with("probe_spacing", 28 * UM);
        let err = assemble(&params, 0, &pdk, &bare_opts()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidGeometryParameter {
                param: "probe_spacing",
                ..
            }
        ));
    }

    #[test]
    fn test_hallbar_routes_six_pads() {
        let pdk = Pdk::default_stack();
        let dev = assemble(&ParameterSet::new("H1"), 0, &pdk, &DeviceOptions::default()).unwrap();
        let pads_layer = pdk.layers.require("pads").unwrap();
        let pad_count = dev.shapes.iter().filter(|(l, _)| *l == pads_layer).count();
        assert_eq!(pad_count, 6);
    }
}
