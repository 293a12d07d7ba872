//! The canvas abstraction: where generated cells go.
//!
//! The generator core is format-agnostic; a [`Canvas`] implementation owns
//! persistence and display. [`CellLibrary`] is the in-memory implementation
//! used by tests and by callers that post-process geometry themselves.

use std::path::Path;

use arcstr::ArcStr;

use maskgeom::bbox::{Bbox, BoundBox};
use maskgeom::{Point, Shape};

use crate::error::Result;
use crate::pdk::LayerKey;

/// A placed reference to a previously defined cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInstance {
    pub cell: ArcStr,
    pub at: Point,
}

/// A sink for generated layout.
pub trait Canvas {
    /// Defines a cell with the given shapes (grouped per layer) and child
    /// instances. Layer groups arrive in drawing order.
    fn place_cell(
        &mut self,
        name: ArcStr,
        shapes: Vec<(LayerKey, Vec<Shape>)>,
        instances: Vec<CellInstance>,
    ) -> Result<()>;

    /// Persists everything placed so far.
    fn save(&mut self, path: &Path) -> Result<()>;

    /// Presents the current contents interactively, if supported.
    fn display(&mut self) -> Result<()>;
}

/// One cell held by a [`CellLibrary`].
#[derive(Debug, Clone)]
pub struct LibraryCell {
    pub name: ArcStr,
    pub shapes: Vec<(LayerKey, Vec<Shape>)>,
    pub instances: Vec<CellInstance>,
}

impl LibraryCell {
    /// The shapes drawn on `layer`.
    pub fn on_layer(&self, layer: LayerKey) -> &[Shape] {
        self.shapes
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, s)| s.as_slice())
            .unwrap_or(&[])
    }

    /// The total number of shapes across all layers.
    pub fn shape_count(&self) -> usize {
        self.shapes.iter().map(|(_, s)| s.len()).sum()
    }

    /// The bounding box of all shapes in the cell.
    pub fn bbox(&self) -> Bbox {
        self.shapes
            .iter()
            .flat_map(|(_, s)| s.iter())
            .fold(Bbox::empty(), |acc, s| acc.union(s.bbox()))
    }
}

/// An in-memory cell store.
#[derive(Debug, Clone, Default)]
pub struct CellLibrary {
    pub cells: Vec<LibraryCell>,
}

impl CellLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a cell by name.
    pub fn cell(&self, name: &str) -> Option<&LibraryCell> {
        self.cells.iter().find(|c| c.name.as_str() == name)
    }
}

impl Canvas for CellLibrary {
    fn place_cell(
        &mut self,
        name: ArcStr,
        shapes: Vec<(LayerKey, Vec<Shape>)>,
        instances: Vec<CellInstance>,
    ) -> Result<()> {
        crate::log::debug!(
            "placing cell {} ({} layers, {} instances)",
            name,
            shapes.len(),
            instances.len()
        );
        self.cells.push(LibraryCell {
            name,
            shapes,
            instances,
        });
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        // Persistence belongs to exporting canvases; the in-memory library
        // just records the request.
        crate::log::info!("cell library: save to {:?} ({} cells)", path, self.cells.len());
        Ok(())
    }

    fn display(&mut self) -> Result<()> {
        crate::log::info!("cell library: {} cells", self.cells.len());
        Ok(())
    }
}
