//! Process description: the layer table and fabrication minima.
//!
//! Layers are identified by opaque [`LayerKey`]s allocated from a slotmap;
//! generators look layers up by name once and pass keys around thereafter,
//! so a typo'd layer name fails loudly at lookup time rather than producing
//! shapes on a silently misnumbered stream.

use std::collections::HashMap;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};

/// Database units per micron. One database unit is one nanometer.
pub const UM: i64 = 1_000;

new_key_type! {
    /// A unique identifier for a layer in a [`Layers`] table.
    pub struct LayerKey;
}

/// Metadata for a single mask layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerInfo {
    /// The layer name, e.g. `bottom_gate`.
    pub name: ArcStr,
    /// The stream number used when exporting.
    pub id: i16,
    /// A 24-bit display color.
    pub color: u32,
}

/// A registry of mask layers with lookup by name.
#[derive(Debug, Clone, Default)]
pub struct Layers {
    slots: SlotMap<LayerKey, LayerInfo>,
    by_name: HashMap<ArcStr, LayerKey>,
}

impl Layers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layer, returning its key.
    ///
    /// Re-registering an existing name replaces the previous entry.
    pub fn add(&mut self, name: impl Into<ArcStr>, id: i16, color: u32) -> LayerKey {
        let name = name.into();
        let key = self.slots.insert(LayerInfo {
            name: name.clone(),
            id,
            color,
        });
        if let Some(old) = self.by_name.insert(name, key) {
            self.slots.remove(old);
        }
        key
    }

    /// Looks up a layer by name.
    pub fn get(&self, name: &str) -> Option<LayerKey> {
        self.by_name.get(name).copied()
    }

    /// Looks up a layer by name, failing with [`Error::UnknownLayer`].
    pub fn require(&self, name: &str) -> Result<LayerKey> {
        self.get(name)
            .ok_or_else(|| Error::UnknownLayer(ArcStr::from(name)))
    }

    /// Retrieves the metadata associated with `key`.
    pub fn info(&self, key: LayerKey) -> &LayerInfo {
        &self.slots[key]
    }

    /// The number of registered layers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Minimum fabricable dimensions, in database units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessConfig {
    /// The smallest printable feature dimension.
    pub min_feature_size: i64,
    /// The smallest allowed gap between shapes on the same layer.
    pub min_spacing: i64,
    /// The smallest allowed inter-layer overlap (e.g. gate past channel).
    pub min_overlap: i64,
    /// The grid all emitted coordinates must land on.
    pub coordinate_quantum: i64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            min_feature_size: UM / 10,
            min_spacing: UM / 10,
            min_overlap: UM / 20,
            coordinate_quantum: 1,
        }
    }
}

impl ProcessConfig {
    /// Checks `requested >= minimum` for the named constraint.
    pub fn check(&self, constraint: &'static str, requested: i64, minimum: i64) -> Result<()> {
        if requested < minimum {
            return Err(Error::ProcessViolation {
                constraint,
                requested,
                minimum,
            });
        }
        Ok(())
    }

    /// Checks a drawn dimension against the minimum feature size.
    pub fn check_feature(&self, constraint: &'static str, requested: i64) -> Result<()> {
        self.check(constraint, requested, self.min_feature_size)
    }
}

/// A process kit: the layer table plus fabrication minima.
#[derive(Debug, Clone)]
pub struct Pdk {
    pub layers: Layers,
    pub process: ProcessConfig,
}

impl Pdk {
    /// The standard thin-film device stack.
    ///
    /// Stream numbers and drawing order follow the usual bottom-up
    /// fabrication sequence; generators address these by name.
    pub fn default_stack() -> Self {
        let mut layers = Layers::new();
        layers.add("bottom_gate", 1, 0x00_40a0ff);
        layers.add("channel_etch", 2, 0x00_30c060);
        layers.add("source_drain", 3, 0x00_f0b030);
        layers.add("dielectric", 4, 0x00_b070e0);
        layers.add("top_gate", 5, 0x00_e05050);
        layers.add("alignment_marks", 6, 0x00_808080);
        layers.add("labels", 7, 0x00_d0d0d0);
        layers.add("pads", 8, 0x00_c08030);
        layers.add("routing", 9, 0x00_60c0c0);
        Self {
            layers,
            process: ProcessConfig::default(),
        }
    }
}

impl Default for Pdk {
    fn default() -> Self {
        Self::default_stack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack_layers() {
        let pdk = Pdk::default_stack();
        assert_eq!(pdk.layers.len(), 9);
        let gate = pdk.layers.require("bottom_gate").unwrap();
        assert_eq!(pdk.layers.info(gate).id, 1);
        let routing = pdk.layers.require("routing").unwrap();
        assert_eq!(pdk.layers.info(routing).id, 9);
    }

    #[test]
    fn test_unknown_layer() {
        let pdk = Pdk::default_stack();
        assert!(matches!(
            pdk.layers.require("metal7"),
            Err(Error::UnknownLayer(_))
        ));
    }

    #[test]
    fn test_process_check() {
        let p = ProcessConfig::default();
        assert!(p.check_feature("channel_width", UM).is_ok());
        assert_eq!(
            p.check_feature("channel_width", 40),
            Err(Error::ProcessViolation {
                constraint: "channel_width",
                requested: 40,
                minimum: 100,
            })
        );
    }

    #[test]
    fn test_reregister_replaces() {
        let mut layers = Layers::new();
        layers.add("pads", 8, 0);
        let k = layers.add("pads", 18, 0);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.get("pads"), Some(k));
        assert_eq!(layers.info(k).id, 18);
    }
}
