//! Error types for pattern expansion

use crate::grid::ColorId;
use std::fmt;
use thiserror::Error;

/// Which dimension of a pattern a size check concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row heights
    Row,
    /// Column widths
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

impl Axis {
    fn measure(self) -> &'static str {
        match self {
            Axis::Row => "H",
            Axis::Column => "W",
        }
    }
}

/// Error raised while expanding a color.
///
/// Every variant aborts the whole `at_depth` / `shape_at` call; nothing
/// computed by a failing call is cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// A non-background id that was never registered
    #[error("{}", unknown_message(*id, *referenced_by))]
    UnknownColor { id: ColorId, referenced_by: Option<ColorId> },
    /// Two cells sharing a row (column) expand to different heights (widths)
    #[error("Cell {cell}@({row},{col}) in pattern {color} expands to {m}={found} at depth {depth}, but a previous cell in that {axis} expanded to {m}={expected}", m = axis.measure())]
    DimensionConflict {
        color: ColorId,
        cell: ColorId,
        row: usize,
        col: usize,
        axis: Axis,
        depth: usize,
        expected: usize,
        found: usize,
    },
    /// A row (column) with only background cells, so nothing fixes its size
    #[error("Pattern {color} has no non-background cell in {axis} {index}; its size is undetermined")]
    UnderspecifiedDimension { color: ColorId, axis: Axis, index: usize },
    /// The expansion would exceed the configured cell budget, or overflow
    #[error("Color {color} at depth {depth} would be {height}x{width}, over the limit of {limit} cells")]
    TooLarge { color: ColorId, depth: usize, height: usize, width: usize, limit: usize },
    /// A planned intermediate expansion was not available when assembling
    #[error("Internal error: expansion of color {color} at depth {depth} missing during assembly")]
    MissingExpansion { color: ColorId, depth: usize },
}

fn unknown_message(id: ColorId, referenced_by: Option<ColorId>) -> String {
    match referenced_by {
        Some(parent) => format!("Unknown color {} referenced by pattern {}", id, parent),
        None => format!("Unknown color {}", id),
    }
}
