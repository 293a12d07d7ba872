//! Field-effect transistors, bottom-gate and dual-gate.

use arcstr::format as arcformat;

use crate::electrode::{self, ElectrodeParams};
use crate::error::Result;
use crate::pdk::Pdk;

use super::{device_label, finish, AssembledDevice, DeviceKind, DeviceOptions, ParameterSet};

/// Assembles a FET from `params`, with a top gate when `dual` is set.
///
/// Recognized parameters (all in database units): `channel_width`,
/// `channel_length`, `gate_overlap`, `source_drain_width`,
/// `source_drain_length`, `etch_margin`, `dielectric_margin`. Absent
/// parameters take the electrode defaults.
pub fn assemble(
    params: &ParameterSet,
    index: usize,
    pdk: &Pdk,
    opts: &DeviceOptions,
    dual: bool,
) -> Result<AssembledDevice> {
    let defaults = ElectrodeParams::default();
    let ep = ElectrodeParams {
        channel_width: params.get_or("channel_width", defaults.channel_width),
        channel_length: params.get_or("channel_length", defaults.channel_length),
        gate_overlap: params.get_or("gate_overlap", defaults.gate_overlap),
        source_drain_width: params.get_or("source_drain_width", defaults.source_drain_width),
        source_drain_length: params.get_or("source_drain_length", defaults.source_drain_length),
        etch_margin: params.get_or("etch_margin", defaults.etch_margin),
        dielectric_margin: params.get_or("dielectric_margin", defaults.dielectric_margin),
        style: opts.electrode_style,
        top_gate: dual,
    };

    let label = device_label(params, index);
    let stack = electrode::build(&ep, &label, index, pdk)?;
    let cell_name = if dual {
        arcformat!("DGFET_{}", label)
    } else {
        arcformat!("FET_{}", label)
    };
    let kind = if dual {
        DeviceKind::DualGate
    } else {
        DeviceKind::Fet
    };
    finish(
        cell_name,
        kind,
        stack.shapes,
        stack.terminals,
        stack.outline,
        &label,
        Some(electrode::dimension_label(&ep)),
        pdk,
        opts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pdk::UM;

    #[test]
    fn test_fet_respects_parameters() {
        let pdk = Pdk::default_stack();
        let mut opts = DeviceOptions::default();
        opts.fanout = false;
        opts.labels = false;
        opts.corner_marks = false;
        // Keep the gate the tallest layer so the height tracks the channel.
        let narrow = ParameterSet::new("N")
            .with("channel_width", 3 * UM)
            .with("source_drain_width", 4 * UM);
        let wide = ParameterSet::new("W")
            .with("channel_width", 7 * UM)
            .with("source_drain_width", 4 * UM);
        let a = assemble(&narrow, 0, &pdk, &opts, false).unwrap();
        let b = assemble(&wide, 1, &pdk, &opts, false).unwrap();
        assert_eq!(b.bbox.height() - a.bbox.height(), 4 * UM);
        assert_eq!(a.cell_name.as_str(), "FET_N");
    }

    #[test]
    fn test_dual_gate_has_four_terminals() {
        let pdk = Pdk::default_stack();
        let dev = assemble(
            &ParameterSet::default(),
            0,
            &pdk,
            &DeviceOptions::default(),
            true,
        )
        .unwrap();
        assert_eq!(dev.terminals.len(), 4);
        assert_eq!(dev.kind, DeviceKind::DualGate);
        assert!(dev.cell_name.starts_with("DGFET_"));
    }

    #[test]
    fn test_fet_propagates_process_violation() {
        let pdk = Pdk::default_stack();
        let params = ParameterSet::new("BAD").with("channel_length", 10);
        let err = assemble(&params, 0, &pdk, &DeviceOptions::default(), false).unwrap_err();
        assert!(matches!(err, Error::ProcessViolation { .. }));
    }
}
