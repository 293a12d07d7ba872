//! The array engine: instantiating a parameter sweep as a rectangular grid
//! of devices, with global registration marks, a title block, and a
//! parameter table.
//!
//! Generation is all-or-nothing up front: the sweep is enumerated and
//! checked against the grid capacity before any device is assembled, and
//! every device is assembled before anything is handed to the canvas, so a
//! failing parameter set can never leave a half-drawn array behind.
//! Cooperative cancellation is checked between devices; a cancelled run
//! still emits the devices completed so far.

use arcstr::{format as arcformat, ArcStr};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use maskgeom::bbox::{Bbox, BoundBox};
use maskgeom::{Point, Shape};

use crate::canvas::{Canvas, CellInstance};
use crate::device::{self, AssembledDevice, DeviceKind, DeviceOptions};
use crate::error::{Error, Result};
use crate::marks::MarkPlacer;
use crate::pdk::{LayerKey, Pdk, UM};
use crate::qr;
use crate::sweep::Sweep;
use crate::text::{self, FontStyle};

/// The grid a sweep is placed on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArrayConfig {
    rows: usize,
    cols: usize,
    /// Column-to-column pitch.
    spacing_x: i64,
    /// Row-to-row pitch.
    spacing_y: i64,
}

impl ArrayConfig {
    /// Creates a grid configuration, validating the dimensions.
    pub fn new(rows: usize, cols: usize, spacing_x: i64, spacing_y: i64) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArrayConfig(format!(
                "grid must be non-empty, got {rows} x {cols}"
            )));
        }
        if spacing_x <= 0 || spacing_y <= 0 {
            return Err(Error::InvalidArrayConfig(format!(
                "grid spacing must be positive, got ({spacing_x}, {spacing_y})"
            )));
        }
        Ok(Self {
            rows,
            cols,
            spacing_x,
            spacing_y,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The number of grid cells.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// The placement offset of device `index`, filling row-major from the
    /// lower left.
    pub fn offset(&self, index: usize) -> Point {
        let row = index / self.cols;
        let col = index % self.cols;
        Point::new(col as i64 * self.spacing_x, row as i64 * self.spacing_y)
    }
}

/// Statistics from one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    /// Devices assembled and placed.
    pub devices: usize,
    pub rows: usize,
    pub cols: usize,
    /// Set when a cancellation request stopped the run early.
    pub cancelled: bool,
    /// The extent of everything placed; empty if nothing was.
    pub bbox: Bbox,
}

/// Generates a device array from a sweep onto a canvas.
#[derive(Debug, Clone, Builder)]
pub struct ArrayEngine {
    pdk: Pdk,
    array: ArrayConfig,
    sweep: Sweep,
    kind: DeviceKind,
    #[builder(default)]
    options: DeviceOptions,
    /// Title text drawn above the array.
    #[builder(default, setter(strip_option, into))]
    title: Option<ArcStr>,
    /// Maximum number of lines in the parameter table.
    #[builder(default = "16")]
    table_limit: usize,
}

impl From<ArrayEngineBuilderError> for Error {
    fn from(e: ArrayEngineBuilderError) -> Self {
        Error::InvalidArrayConfig(e.to_string())
    }
}

impl ArrayEngine {
    pub fn builder() -> ArrayEngineBuilder {
        ArrayEngineBuilder::default()
    }

    /// Generates the full array.
    pub fn generate(&self, canvas: &mut dyn Canvas) -> Result<GenerationStats> {
        self.generate_with_cancel(canvas, || false)
    }

    /// Generates the array, polling `cancel` between devices.
    ///
    /// A cancellation stops assembly but still places the devices completed
    /// so far, so the output is a consistent prefix of the full array.
    pub fn generate_with_cancel(
        &self,
        canvas: &mut dyn Canvas,
        mut cancel: impl FnMut() -> bool,
    ) -> Result<GenerationStats> {
        let sets = self.sweep.enumerate()?;
        if sets.len() > self.array.capacity() {
            return Err(Error::ArrayCapacityExceeded {
                combinations: sets.len(),
                capacity: self.array.capacity(),
            });
        }
        crate::log::info!(
            "generating {} devices on a {} x {} grid",
            sets.len(),
            self.array.rows,
            self.array.cols
        );

        // Assemble everything before the canvas sees anything.
        let mut devices: Vec<AssembledDevice> = Vec::with_capacity(sets.len());
        let mut cancelled = false;
        for (i, set) in sets.iter().enumerate() {
            if cancel() {
                crate::log::warn!("generation cancelled after {} devices", i);
                cancelled = true;
                break;
            }
            let mut set = set.clone();
            if set.label().is_empty() {
                set.set_label(arcformat!("D{}", i + 1));
            }
            let dev = device::assemble(self.kind, &set, i, &self.pdk, &self.options)?;
            self.check_fits(&dev)?;
            devices.push(dev);
        }

        let mut extent = Bbox::empty();
        let mut instances = Vec::with_capacity(devices.len());
        for (i, dev) in devices.iter().enumerate() {
            let at = self.array.offset(i);
            let mut cell_bbox: Bbox = dev.bbox.into();
            cell_bbox.p0 += at;
            cell_bbox.p1 += at;
            extent = extent.union(cell_bbox);
            instances.push(CellInstance {
                cell: dev.cell_name.clone(),
                at,
            });
        }

        // Top-level decorations around the full extent.
        let mut globals: Vec<(LayerKey, Shape)> = Vec::new();
        if !extent.is_empty() {
            self.draw_globals(&sets[..devices.len()], extent.into_rect(), &mut globals)?;
            for (_, s) in &globals {
                extent = extent.union(s.bbox());
            }
        }

        for dev in &devices {
            canvas.place_cell(dev.cell_name.clone(), group_by_layer(&self.pdk, &dev.shapes), vec![])?;
        }
        if !devices.is_empty() {
            canvas.place_cell(
                self.top_name(),
                group_by_layer(&self.pdk, &globals),
                instances,
            )?;
        }

        Ok(GenerationStats {
            devices: devices.len(),
            rows: self.array.rows,
            cols: self.array.cols,
            cancelled,
            bbox: extent,
        })
    }

    fn top_name(&self) -> ArcStr {
        self.title
            .clone()
            .unwrap_or_else(|| ArcStr::from("DEVICE_ARRAY"))
    }

    /// Checks that a device fits its grid cell.
    fn check_fits(&self, dev: &AssembledDevice) -> Result<()> {
        if self.array.cols > 1 && dev.bbox.width() > self.array.spacing_x {
            return Err(Error::InvalidArrayConfig(format!(
                "device `{}` is {} wide but the column pitch is {}",
                dev.cell_name,
                dev.bbox.width(),
                self.array.spacing_x
            )));
        }
        if self.array.rows > 1 && dev.bbox.height() > self.array.spacing_y {
            return Err(Error::InvalidArrayConfig(format!(
                "device `{}` is {} tall but the row pitch is {}",
                dev.cell_name,
                dev.bbox.height(),
                self.array.spacing_y
            )));
        }
        Ok(())
    }

    /// Corner registration marks, the title block, and the parameter table.
    fn draw_globals(
        &self,
        sets: &[crate::device::ParameterSet],
        extent: maskgeom::Rect,
        out: &mut Vec<(LayerKey, Shape)>,
    ) -> Result<()> {
        let marks_layer = self.pdk.layers.require("alignment_marks")?;
        let labels_layer = self.pdk.layers.require("labels")?;

        let mut placer = MarkPlacer::new();
        out.extend(placer.place_corner_group(extent.expand(50 * UM), 20 * UM, 2 * UM, marks_layer)?);

        // Title block above the upper-left corner.
        let mut cursor = Point::new(extent.left(), extent.top() + 30 * UM);
        if let Some(title) = &self.title {
            let at = Point::new(cursor.x, cursor.y + FontStyle::Title.line_pitch());
            for s in text::render(title, at, FontStyle::Title)? {
                out.push((labels_layer, s));
            }
        }
        let info = arcformat!("ARRAY {}X{} N={}", self.array.rows, self.array.cols, sets.len());
        for s in text::render(&info, cursor, FontStyle::Default)? {
            out.push((labels_layer, s));
        }

        // Parameter table to the right of the array, top down.
        cursor = Point::new(extent.right() + 30 * UM, extent.top());
        let lines: Vec<String> = sets
            .iter()
            .take(self.table_limit)
            .enumerate()
            .map(|(i, set)| {
                let label = device::device_label(set, i);
                let fields: Vec<String> = set
                    .iter()
                    .map(|(name, value)| format!("{}={}", short_name(name), format_value(name, value)))
                    .collect();
                format!("{}: {}", label, fields.join(" "))
            })
            .collect();
        if !lines.is_empty() {
            for s in text::render(&lines.join("\n"), cursor, FontStyle::Small)? {
                out.push((labels_layer, s));
            }
        }

        // Machine-readable array identifier, left of the upper-left corner.
        let name = self.top_name();
        let dims = qr::symbol_dims(&name, qr::MODULE)?;
        let at = Point::new(extent.left() - 30 * UM - dims.w(), extent.top() - dims.h());
        for s in qr::render(&name, at, qr::MODULE)? {
            out.push((labels_layer, s));
        }
        Ok(())
    }
}

/// Abbreviates a parameter name to the initials of its words, so
/// `channel_width` renders as `CW`.
fn short_name(name: &str) -> String {
    name.split('_')
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Dimension parameters print in microns; count-like parameters print raw.
fn format_value(name: &str, value: i64) -> String {
    if name.ends_with("contacts") {
        value.to_string()
    } else {
        text::format_um(value)
    }
}

/// Groups a flat shape list by layer, ordered by stream id.
fn group_by_layer(pdk: &Pdk, shapes: &[(LayerKey, Shape)]) -> Vec<(LayerKey, Vec<Shape>)> {
    let mut grouped: std::collections::BTreeMap<i16, (LayerKey, Vec<Shape>)> =
        std::collections::BTreeMap::new();
    for (layer, shape) in shapes {
        grouped
            .entry(pdk.layers.info(*layer).id)
            .or_insert_with(|| (*layer, Vec::new()))
            .1
            .push(shape.clone());
    }
    grouped.into_values().collect()
}
