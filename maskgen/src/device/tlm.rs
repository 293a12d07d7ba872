//! Transfer-length-method ladders: a contact row on a common strip, with
//! contact gaps growing arithmetically so contact resistance can be
//! extrapolated from the resistance-versus-gap line.

use arcstr::format as arcformat;

use maskgeom::{Dims, Point, Rect, Shape, Side};

use crate::error::{Error, Result};
use crate::pdk::{Pdk, UM};
use crate::route::{Terminal, TerminalRole};

use super::{device_label, finish, AssembledDevice, DeviceKind, DeviceOptions, ParameterSet};

/// Assembles a TLM ladder.
///
/// Recognized parameters: `channel_width` (strip extent along y),
/// `contact_width` (along x), `contact_height` (along y), `gap_start`,
/// `gap_step`, `num_contacts`. Gap `i` (between contacts `i` and `i + 1`)
/// is `gap_start + i * gap_step`.
pub fn assemble(
    params: &ParameterSet,
    index: usize,
    pdk: &Pdk,
    opts: &DeviceOptions,
) -> Result<AssembledDevice> {
    let channel_width = params.get_or("channel_width", 10 * UM);
    let contact_width = params.get_or("contact_width", 5 * UM);
    let contact_height = params.get_or("contact_height", 20 * UM);
    let gap_start = params.get_or("gap_start", 2 * UM);
    let gap_step = params.get_or("gap_step", 2 * UM);
    let num_contacts = params.get_or("num_contacts", 5);

    if !(2..=64).contains(&num_contacts) {
        return Err(Error::InvalidGeometryParameter {
            param: "num_contacts",
            value: num_contacts,
            limit: 2,
        });
    }
    let n = num_contacts as usize;

    let p = &pdk.process;
    p.check_feature("channel_width", channel_width)?;
    p.check_feature("contact_width", contact_width)?;
    p.check_feature("contact_height", contact_height)?;
    p.check("tlm_gap", gap_start, p.min_spacing)?;
    if gap_step < 0 {
        return Err(Error::InvalidGeometryParameter {
            param: "gap_step",
            value: gap_step,
            limit: 0,
        });
    }

    // Contact left edges, with gap i between contacts i and i + 1.
    let mut lefts = Vec::with_capacity(n);
    let mut x = 0;
    for i in 0..n {
        lefts.push(x);
        x += contact_width + gap_start + i as i64 * gap_step;
    }
    let total = lefts[n - 1] + contact_width;
    // Center the ladder on the local origin.
    let shift = -total / 2;

    let label = device_label(params, index);
    let etch = pdk.layers.require("channel_etch")?;
    let contacts_layer = pdk.layers.require("source_drain")?;

    let mut out = Vec::new();
    let mut terminals = Vec::new();

    let strip = Rect::new(
        Point::new(shift, -channel_width / 2),
        Point::new(shift + total, channel_width / 2),
    );
    out.push((etch, Shape::Rect(strip)));

    for (i, &left) in lefts.iter().enumerate() {
        let contact = Rect::centered(
            Point::new(shift + left + contact_width / 2, 0),
            Dims::new(contact_width, contact_height),
        );
        out.push((contacts_layer, Shape::Rect(contact)));
        // Alternate exits so fanout wires on each side stay sparse.
        let exit = if i % 2 == 0 { Side::Top } else { Side::Bot };
        terminals.push(Terminal {
            name: arcformat!("{}.c{}", label, i + 1),
            role: TerminalRole::Contact(i as u8),
            device: index,
            at: contact.edge_center(exit),
            exit,
            width: contact.width(),
        });
    }

    let outline = super::shapes_bbox(&out);
    let annotation = arcformat!(
        "W={} G={}+{}",
        crate::text::format_um(channel_width),
        crate::text::format_um(gap_start),
        crate::text::format_um(gap_step)
    );
    finish(
        arcformat!("TLM_{}", label),
        DeviceKind::Tlm,
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
    use maskgeom::bbox::BoundBox;

    fn bare_opts() -> DeviceOptions {
        DeviceOptions {
            fanout: false,
            labels: false,
            corner_marks: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_gap_progression() {
        let pdk = Pdk::default_stack();
        let params = ParameterSet::new("T1")
            .with("contact_width", 5 * UM)
            .with("gap_start", 2 * UM)
            .with("gap_step", 3 * UM)
            .with("num_contacts", 4);
        let dev = assemble(&params, 0, &pdk, &bare_opts()).unwrap();
        // Strip plus four contacts.
        assert_eq!(dev.shapes.len(), 5);
        let contacts: Vec<Rect> = dev.shapes[1..].iter().map(|(_, s)| s.brect()).collect();
        let gaps: Vec<i64> = contacts
            .windows(2)
            .map(|w| w[1].left() - w[0].right())
            .collect();
        assert_eq!(gaps, vec![2 * UM, 5 * UM, 8 * UM]);
    }

    #[test]
    fn test_strip_spans_ladder() {
        let pdk = Pdk::default_stack();
        let dev = assemble(&ParameterSet::new("T1"), 0, &pdk, &bare_opts()).unwrap();
        let strip = dev.shapes[0].1.brect();
        let first = dev.shapes[1].1.brect();
        let last = dev.shapes.last().unwrap().1.brect();
        assert_eq!(strip.left(), first.left());
        assert_eq!(strip.right(), last.right());
        // Ladder is centered on the origin.
        assert_eq!(strip.center().x, 0);
    }

    #[test]
    fn test_alternating_exits() {
        let pdk = Pdk::default_stack();
        let dev = assemble(&ParameterSet::new("T1"), 0, &pdk, &bare_opts()).unwrap();
        let exits: Vec<Side> = dev.terminals.iter().map(|t| t.exit).collect();
        assert_eq!(
            exits,
            vec![Side::Top, Side::Bot, Side::Top, Side::Bot, Side::Top]
        );
    }

    #[test]
    fn test_num_contacts_limit() {
        let pdk = Pdk::default_stack();
        let params = ParameterSet::new("T1").with("num_contacts", 1);
        assert!(matches!(
            assemble(&params, 0, &pdk, &bare_opts()),
            Err(Error::InvalidGeometryParameter {
                param: "num_contacts",
                ..
            })
        ));
    }

    #[test]
    fn test_gap_below_min_spacing() {
        let pdk = Pdk::default_stack();
        let params = ParameterSet::new("T1").with("gap_start", 10);
        assert!(matches!(
            assemble(&params, 0, &pdk, &bare_opts()),
            Err(Error::ProcessViolation {
                constraint: "tlm_gap",
                ..
            })
        ));
    }

    #[test]
    fn test_tlm_full_fanout() {
        let pdk = Pdk::default_stack();
        let dev = assemble(&ParameterSet::new("T1"), 0, &pdk, &DeviceOptions::default()).unwrap();
        let routing = pdk.layers.require("routing").unwrap();
        let wires = dev.shapes.iter().filter(|(l, _)| *l == routing).count();
        assert_eq!(wires, 5);
    }
}
