//! The crate-wide error taxonomy.
//!
//! All errors are raised synchronously at the point of detection and abort
//! only the current device or array-cell instantiation; no partially built
//! shape set is ever handed to the canvas. Every failure here stems from a
//! deterministic input or configuration problem, so nothing is retried.

use arcstr::ArcStr;
use thiserror::Error;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// A shape parameter is outside the shape's valid domain.
    #[error("invalid geometry parameter `{param}`: value {value} violates limit {limit}")]
    InvalidGeometryParameter {
        param: &'static str,
        value: i64,
        limit: i64,
    },

    /// A requested dimension violates a configured process minimum.
    #[error("process violation: `{constraint}` requires at least {minimum}, requested {requested}")]
    ProcessViolation {
        constraint: &'static str,
        requested: i64,
        minimum: i64,
    },

    /// Text contains a character outside the supported font set.
    #[error("unsupported glyph {ch:?} at character index {index}")]
    UnsupportedGlyph { ch: char, index: usize },

    /// The fanout router cannot connect a terminal under any configured style.
    #[error("routing conflict: no conflict-free route for terminal `{terminal}`")]
    RoutingConflict { terminal: ArcStr },

    /// Two marks collide at the same anchor point.
    #[error("mark placement conflict at ({x}, {y})")]
    MarkPlacementConflict { x: i64, y: i64 },

    /// Array or sweep configuration is inconsistent.
    #[error("invalid array config: {0}")]
    InvalidArrayConfig(String),

    /// The sweep produced more parameter sets than the grid can hold.
    #[error("array capacity exceeded: {combinations} parameter sets for {capacity} grid cells")]
    ArrayCapacityExceeded {
        combinations: usize,
        capacity: usize,
    },

    /// Text cannot be encoded as a QR identifier (too long for the symbol).
    #[error("cannot encode `{text}` as a QR identifier")]
    IdentifierEncoding { text: ArcStr },

    /// A parameter set is missing a field a consumer requires.
    #[error("parameter set `{set}` is missing required field `{field}`")]
    MissingParameter { set: ArcStr, field: ArcStr },

    /// A layer name has no entry in the layer table.
    #[error("unknown layer `{0}`")]
    UnknownLayer(ArcStr),
}
