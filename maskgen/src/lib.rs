//! Parametric layout generation for semiconductor test devices.
//!
//! `maskgen` assembles photolithography mask layouts for device
//! characterization: field-effect transistors, dual-gate stacks, Hall bars,
//! and transfer-length-method ladders, each built from a parameter set and
//! fanned out to probe pads. The [`array`] engine expands a parameter
//! [`sweep`](crate::sweep) onto a labeled grid of devices with global
//! registration marks and a title block.
//!
//! All coordinates are integer database units; [`pdk::UM`] converts from
//! microns. Output goes to a [`canvas::Canvas`], which owns persistence.

pub mod array;
pub mod canvas;
pub mod device;
pub mod electrode;
pub mod error;
pub(crate) mod log;
pub mod marks;
pub mod pdk;
pub mod qr;
pub mod route;
pub mod shapes;
pub mod sweep;
pub mod text;

pub use array::{ArrayConfig, ArrayEngine, GenerationStats};
pub use canvas::{Canvas, CellLibrary};
pub use device::{AssembledDevice, DeviceKind, DeviceOptions, ParameterSet};
pub use error::{Error, Result};
pub use pdk::{Pdk, UM};
pub use sweep::{NamedRange, Sweep};
